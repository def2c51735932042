use std::sync::Arc;

use async_trait::async_trait;
use chrono::{FixedOffset, Utc};
use domain_certification::command::{CreateOrderCommand, UpdateOrderCommand};
use domain_certification::exception::{CertResult, CertificationException};
use domain_certification::model::entity::order::{STATUS_APPROVED, STATUS_DENIED};
use domain_certification::model::entity::Order;
use domain_certification::model::vo::{CreatedOrder, OabConflict, OrderPage, OrderQuery};
use domain_certification::repository::SheetStoreRepo;
use domain_certification::service::{OrderService, TicketAllocationService};
use typed_builder::TypedBuilder;
use uuid::Uuid;

use crate::cache::SnapshotCache;
use crate::write_lock::WriteLock;

#[derive(TypedBuilder)]
pub struct OrderServiceImpl {
    store: Arc<dyn SheetStoreRepo>,
    cache: Arc<SnapshotCache<Order>>,
    lock: Arc<WriteLock>,
    allocator: Arc<dyn TicketAllocationService>,
    sheet: String,
}

/// Request/release dates are displayed in the operators' timezone.
/// America/Sao_Paulo is a fixed UTC-3 since Brazil dropped DST in 2019.
fn now_stamp() -> String {
    let sao_paulo = FixedOffset::west_opt(3 * 3600).expect("static UTC-3 offset");
    Utc::now().with_timezone(&sao_paulo).format("%d/%m/%Y %H:%M:%S").to_string()
}

/// Cache-bypassing read of every order row. Rows that don't decode (the
/// occasional hand-edited one) are skipped.
async fn fetch_all(store: &dyn SheetStoreRepo, sheet: &str) -> CertResult<Vec<Order>> {
    let rows = store.read_rows(sheet, Order::READ_RANGE).await?;
    Ok(rows.iter().filter_map(|row| Order::from_row(row)).collect())
}

/// Resolve an order and its current 1-based sheet row from a fresh read.
/// The index is only valid until the next mutation of the sheet.
async fn resolve(store: &dyn SheetStoreRepo, sheet: &str, uuid: Uuid) -> CertResult<(u32, Order)> {
    let rows = store.read_rows(sheet, Order::READ_RANGE).await?;
    rows.iter()
        .enumerate()
        .find_map(|(nth, row)| {
            Order::from_row(row)
                .filter(|order| order.uuid == uuid)
                .map(|order| (Order::FIRST_DATA_ROW + nth as u32, order))
        })
        .ok_or(CertificationException::OrderNotFound { uuid })
}

#[async_trait]
impl OrderService for OrderServiceImpl {
    async fn list(&self, query: OrderQuery) -> CertResult<OrderPage> {
        let orders = match self.cache.read().await {
            Some(orders) => orders,
            None => {
                let orders = fetch_all(&*self.store, &self.sheet).await?;
                self.cache.store(orders.clone()).await;
                orders
            }
        };
        let filtered: Vec<Order> = orders.into_iter().filter(|order| query.matches(order)).collect();
        let total = filtered.len();
        let offset = query.offset.unwrap_or(0);
        let orders = match query.limit {
            Some(limit) => filtered.into_iter().skip(offset).take(limit).collect(),
            None if offset > 0 => filtered.into_iter().skip(offset).collect(),
            None => filtered,
        };
        Ok(OrderPage { total, orders })
    }

    async fn get(&self, uuid: Uuid) -> CertResult<Order> {
        self.list(OrderQuery::default())
            .await?
            .orders
            .into_iter()
            .find(|order| order.uuid == uuid)
            .ok_or(CertificationException::OrderNotFound { uuid })
    }

    async fn create(&self, cmd: CreateOrderCommand) -> CertResult<CreatedOrder> {
        let store = self.store.clone();
        let cache = self.cache.clone();
        let allocator = self.allocator.clone();
        let sheet = self.sheet.clone();
        self.lock
            .run(move || async move {
                cache.invalidate().await;
                let oab = cmd.numero_oab.trim().to_string();
                // an empty OAB number is never a duplicate key
                let prior = if oab.is_empty() {
                    None
                } else {
                    fetch_all(&*store, &sheet).await?.into_iter().find(|order| {
                        order.numero_oab.trim().to_lowercase() == oab.to_lowercase()
                    })
                };

                let stamp = now_stamp();
                let mut order = Order {
                    uuid: Uuid::new_v4(),
                    ticket: String::new(),
                    numero_oab: oab,
                    nome_completo: cmd.nome_completo,
                    subsecao: cmd.subsecao,
                    data_solicitacao: stamp.clone(),
                    data_liberacao: stamp,
                    status: STATUS_DENIED.to_string(),
                    anotacoes: cmd.anotacoes,
                };
                let conflict = prior.map(|existing| OabConflict {
                    ticket: existing.ticket,
                    data_solicitacao: existing.data_solicitacao,
                });
                if conflict.is_none() {
                    // NoTicketsAvailable is terminal here: nothing appended
                    order.ticket = allocator.assign_available_ticket().await?;
                    order.status = STATUS_APPROVED.to_string();
                }

                let appended = store.append_row(&sheet, Order::APPEND_RANGE, &order.to_row()).await;
                cache.invalidate().await;
                appended?;
                Ok(match conflict {
                    Some(existing) => CreatedOrder::Conflicted { order, existing },
                    None => CreatedOrder::Approved { order },
                })
            })
            .await
    }

    async fn update(&self, uuid: Uuid, patch: UpdateOrderCommand) -> CertResult<Order> {
        let store = self.store.clone();
        let cache = self.cache.clone();
        let sheet = self.sheet.clone();
        self.lock
            .run(move || async move {
                cache.invalidate().await;
                let (row_index, mut order) = resolve(&*store, &sheet, uuid).await?;
                patch.apply_to(&mut order);
                let updated = store.update_row(&sheet, row_index, &order.to_row()).await;
                cache.invalidate().await;
                updated?;
                Ok(order)
            })
            .await
    }

    async fn delete(&self, uuid: Uuid) -> CertResult<()> {
        let store = self.store.clone();
        let cache = self.cache.clone();
        let sheet = self.sheet.clone();
        self.lock
            .run(move || async move {
                cache.invalidate().await;
                let (row_index, _) = resolve(&*store, &sheet, uuid).await?;
                let deleted = store.delete_row(&sheet, row_index).await;
                cache.invalidate().await;
                deleted?;
                Ok(())
            })
            .await
    }
}
