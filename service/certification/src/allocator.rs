use std::sync::Arc;

use async_trait::async_trait;
use domain_certification::exception::{CertResult, CertificationException};
use domain_certification::model::entity::ticket::STATUS_ASSIGNED;
use domain_certification::model::entity::Ticket;
use domain_certification::repository::SheetStoreRepo;
use domain_certification::service::TicketAllocationService;
use typed_builder::TypedBuilder;

use crate::cache::SnapshotCache;

/// Scan-then-mark allocation over the tickets sheet.
///
/// Callers hold the orders write queue, so at most one scan-then-mark is in
/// flight at a time and a ticket can never be handed to two orders. Direct
/// ticket writes that bypass that queue are outside this guarantee.
#[derive(TypedBuilder)]
pub struct TicketAllocationServiceImpl {
    store: Arc<dyn SheetStoreRepo>,
    tickets_cache: Arc<SnapshotCache<Ticket>>,
    sheet: String,
}

#[async_trait]
impl TicketAllocationService for TicketAllocationServiceImpl {
    async fn assign_available_ticket(&self) -> CertResult<String> {
        let rows = self.store.read_rows(&self.sheet, Ticket::READ_RANGE).await?;
        let (nth, mut ticket) = rows
            .iter()
            .map(|row| Ticket::from_row(row))
            .enumerate()
            .find(|(_, ticket)| ticket.is_available())
            .ok_or(CertificationException::NoTicketsAvailable)?;

        ticket.status = STATUS_ASSIGNED.to_string();
        let row_index = Ticket::FIRST_DATA_ROW + nth as u32;
        let marked = self.store.update_row(&self.sheet, row_index, &ticket.to_row()).await;
        self.tickets_cache.invalidate().await;
        marked?;
        Ok(ticket.ticket)
    }
}
