use async_trait::async_trait;

use crate::exception::CertResult;
use crate::model::entity::Ticket;

/// Tickets sheet operations.
///
/// Reads go through the snapshot cache. Every write runs inside the tickets
/// write queue and resolves its row from a fresh, cache-bypassing read
/// immediately before mutating.
#[async_trait]
pub trait TicketService: Send + Sync {
    async fn list(&self) -> CertResult<Vec<Ticket>>;
    async fn get(&self, ticket: &str) -> CertResult<Ticket>;
    /// Fails with `DuplicateTicket` when the value already exists.
    async fn create(&self, ticket: &str) -> CertResult<Ticket>;
    /// Changes the ticket value, keeping the status cell.
    async fn rename(&self, old: &str, new: &str) -> CertResult<Ticket>;
    async fn delete(&self, ticket: &str) -> CertResult<()>;
}
