use std::sync::Arc;

use async_trait::async_trait;
use domain_certification::exception::{CertResult, CertificationException};
use domain_certification::model::entity::Ticket;
use domain_certification::repository::SheetStoreRepo;
use domain_certification::service::TicketService;
use typed_builder::TypedBuilder;

use crate::cache::SnapshotCache;
use crate::write_lock::WriteLock;

#[derive(TypedBuilder)]
pub struct TicketServiceImpl {
    store: Arc<dyn SheetStoreRepo>,
    cache: Arc<SnapshotCache<Ticket>>,
    lock: Arc<WriteLock>,
    sheet: String,
}

/// Cache-bypassing read of every ticket row.
async fn fetch_all(store: &dyn SheetStoreRepo, sheet: &str) -> CertResult<Vec<Ticket>> {
    let rows = store.read_rows(sheet, Ticket::READ_RANGE).await?;
    Ok(rows.iter().map(|row| Ticket::from_row(row)).collect())
}

#[async_trait]
impl TicketService for TicketServiceImpl {
    async fn list(&self) -> CertResult<Vec<Ticket>> {
        if let Some(tickets) = self.cache.read().await {
            return Ok(tickets);
        }
        let tickets = fetch_all(&*self.store, &self.sheet).await?;
        self.cache.store(tickets.clone()).await;
        Ok(tickets)
    }

    async fn get(&self, ticket: &str) -> CertResult<Ticket> {
        self.list()
            .await?
            .into_iter()
            .find(|known| known.ticket == ticket)
            .ok_or_else(|| CertificationException::TicketNotFound {
                ticket: ticket.to_string(),
            })
    }

    async fn create(&self, ticket: &str) -> CertResult<Ticket> {
        let store = self.store.clone();
        let cache = self.cache.clone();
        let sheet = self.sheet.clone();
        let value = ticket.to_string();
        self.lock
            .run(move || async move {
                cache.invalidate().await;
                // duplicate check against a fresh read, not the cache, so a
                // racing create can't slip the same value in twice
                let tickets = fetch_all(&*store, &sheet).await?;
                if tickets.iter().any(|known| known.ticket == value) {
                    return Err(CertificationException::DuplicateTicket { ticket: value });
                }
                let created = Ticket::new(value);
                let appended =
                    store.append_row(&sheet, Ticket::APPEND_RANGE, &created.to_row()).await;
                cache.invalidate().await;
                appended?;
                Ok(created)
            })
            .await
    }

    async fn rename(&self, old: &str, new: &str) -> CertResult<Ticket> {
        let store = self.store.clone();
        let cache = self.cache.clone();
        let sheet = self.sheet.clone();
        let (old, new) = (old.to_string(), new.to_string());
        self.lock
            .run(move || async move {
                cache.invalidate().await;
                let tickets = fetch_all(&*store, &sheet).await?;
                let nth = tickets
                    .iter()
                    .position(|known| known.ticket == old)
                    .ok_or(CertificationException::TicketNotFound { ticket: old })?;
                if new != tickets[nth].ticket
                    && tickets.iter().any(|known| known.ticket == new)
                {
                    return Err(CertificationException::DuplicateTicket { ticket: new });
                }
                let renamed = Ticket {
                    ticket: new,
                    status: tickets[nth].status.clone(),
                };
                let row_index = Ticket::FIRST_DATA_ROW + nth as u32;
                let updated = store.update_row(&sheet, row_index, &renamed.to_row()).await;
                cache.invalidate().await;
                updated?;
                Ok(renamed)
            })
            .await
    }

    async fn delete(&self, ticket: &str) -> CertResult<()> {
        let store = self.store.clone();
        let cache = self.cache.clone();
        let sheet = self.sheet.clone();
        let value = ticket.to_string();
        self.lock
            .run(move || async move {
                cache.invalidate().await;
                let tickets = fetch_all(&*store, &sheet).await?;
                let nth = tickets
                    .iter()
                    .position(|known| known.ticket == value)
                    .ok_or(CertificationException::TicketNotFound { ticket: value })?;
                let row_index = Ticket::FIRST_DATA_ROW + nth as u32;
                let deleted = store.delete_row(&sheet, row_index).await;
                cache.invalidate().await;
                deleted?;
                Ok(())
            })
            .await
    }
}
