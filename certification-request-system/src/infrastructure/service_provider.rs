use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use domain_certification::model::entity::{Order, Ticket};
use domain_certification::repository::SheetStoreRepo;
use domain_certification::service::{OrderService, TicketAllocationService, TicketService};
use service_certification::{
    OrderServiceImpl, SnapshotCache, TicketAllocationServiceImpl, TicketServiceImpl, WriteLock,
};

use super::config::DeskConfig;
use super::repository::SheetsRepo;

/// Hand-wired composition root: owns the per-resource singletons (snapshot
/// caches, write queues) and the service graph built over them, so tests and
/// the server construct the whole thing from one config value.
pub struct ServiceProvider {
    config: DeskConfig,
    ticket_service: Arc<dyn TicketService>,
    order_service: Arc<dyn OrderService>,
}

impl ServiceProvider {
    pub fn build(config: config::Config) -> anyhow::Result<Self> {
        let config: DeskConfig =
            config.try_deserialize().context("configuration doesn't deserialize")?;

        let http_client = Arc::new(
            reqwest::Client::builder().timeout(Duration::from_secs(20)).build()?,
        );
        let store: Arc<dyn SheetStoreRepo> = Arc::new(
            SheetsRepo::builder()
                .client(http_client)
                .endpoint(config.sheets.endpoint.clone())
                .spreadsheet_id(config.sheets.spreadsheet_id.clone())
                .access_token(config.sheets.access_token.clone())
                .build(),
        );

        let ttl = Duration::from_secs(config.cache_ttl_secs);
        let write_timeout = Duration::from_secs(config.write_timeout_secs);
        let tickets_cache = Arc::new(SnapshotCache::<Ticket>::new(ttl));
        let orders_cache = Arc::new(SnapshotCache::<Order>::new(ttl));

        let allocator: Arc<dyn TicketAllocationService> = Arc::new(
            TicketAllocationServiceImpl::builder()
                .store(store.clone())
                .tickets_cache(tickets_cache.clone())
                .sheet(config.sheets.tickets_sheet.clone())
                .build(),
        );
        let ticket_service = Arc::new(
            TicketServiceImpl::builder()
                .store(store.clone())
                .cache(tickets_cache)
                .lock(Arc::new(WriteLock::new("tickets", write_timeout)))
                .sheet(config.sheets.tickets_sheet.clone())
                .build(),
        );
        let order_service = Arc::new(
            OrderServiceImpl::builder()
                .store(store)
                .cache(orders_cache)
                .lock(Arc::new(WriteLock::new("pedidos", write_timeout)))
                .allocator(allocator)
                .sheet(config.sheets.orders_sheet.clone())
                .build(),
        );

        Ok(Self {
            config,
            ticket_service,
            order_service,
        })
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    pub fn ticket_service(&self) -> Arc<dyn TicketService> {
        self.ticket_service.clone()
    }

    pub fn order_service(&self) -> Arc<dyn OrderService> {
        self.order_service.clone()
    }
}
