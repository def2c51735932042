use async_trait::async_trait;
use uuid::Uuid;

use crate::command::{CreateOrderCommand, UpdateOrderCommand};
use crate::exception::CertResult;
use crate::model::entity::Order;
use crate::model::vo::{CreatedOrder, OrderPage, OrderQuery};

/// Pedidos sheet operations.
#[async_trait]
pub trait OrderService: Send + Sync {
    async fn list(&self, query: OrderQuery) -> CertResult<OrderPage>;
    async fn get(&self, uuid: Uuid) -> CertResult<Order>;
    /// Assigns a ticket and approves, or records a denied duplicate; see
    /// [`CreatedOrder`](crate::model::vo::CreatedOrder).
    async fn create(&self, cmd: CreateOrderCommand) -> CertResult<CreatedOrder>;
    async fn update(&self, uuid: Uuid, patch: UpdateOrderCommand) -> CertResult<Order>;
    async fn delete(&self, uuid: Uuid) -> CertResult<()>;
}
