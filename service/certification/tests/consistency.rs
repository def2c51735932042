use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain_certification::command::{CreateOrderCommand, UpdateOrderCommand};
use domain_certification::exception::{CertResult, CertificationException};
use domain_certification::mock::MockSheetStoreRepo;
use domain_certification::model::entity::order::{STATUS_APPROVED, STATUS_DENIED};
use domain_certification::model::entity::ticket::STATUS_ASSIGNED;
use domain_certification::model::entity::{Order, Ticket};
use domain_certification::model::vo::{CreatedOrder, OrderQuery};
use domain_certification::repository::SheetStoreRepo;
use domain_certification::service::{OrderService, TicketService};
use service_certification::{
    OrderServiceImpl, SnapshotCache, TicketAllocationServiceImpl, TicketServiceImpl, WriteLock,
};
use tokio::sync::Mutex;
use uuid::Uuid;

const TICKETS: &str = "tickets";
const ORDERS: &str = "pedidos";

/// In-memory double of the external store with a small artificial latency,
/// so racing writers would actually interleave if nothing serialized them.
struct FakeSheetStore {
    sheets: Mutex<HashMap<String, Vec<Vec<String>>>>,
    latency: Duration,
}

impl FakeSheetStore {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            sheets: Mutex::new(HashMap::new()),
            latency: Duration::from_millis(5),
        })
    }

    async fn seed_tickets(&self, values: &[(&str, &str)]) {
        let rows = values
            .iter()
            .map(|(ticket, status)| vec![ticket.to_string(), status.to_string()])
            .collect();
        self.sheets.lock().await.insert(TICKETS.to_string(), rows);
    }

    async fn rows(&self, sheet: &str) -> Vec<Vec<String>> {
        self.sheets.lock().await.get(sheet).cloned().unwrap_or_default()
    }

    fn nth(row_index: u32, len: usize) -> CertResult<usize> {
        let nth = (row_index as usize)
            .checked_sub(Ticket::FIRST_DATA_ROW as usize)
            .ok_or(CertificationException::RowIndexInvalid { index: row_index })?;
        if nth >= len {
            return Err(CertificationException::RowIndexInvalid { index: row_index });
        }
        Ok(nth)
    }
}

#[async_trait]
impl SheetStoreRepo for FakeSheetStore {
    async fn read_rows(&self, sheet: &str, _range: &str) -> CertResult<Vec<Vec<String>>> {
        tokio::time::sleep(self.latency).await;
        Ok(self.rows(sheet).await)
    }

    async fn append_row(&self, sheet: &str, _range: &str, row: &[String]) -> CertResult<()> {
        tokio::time::sleep(self.latency).await;
        self.sheets.lock().await.entry(sheet.to_string()).or_default().push(row.to_vec());
        Ok(())
    }

    async fn update_row(&self, sheet: &str, row_index: u32, row: &[String]) -> CertResult<()> {
        tokio::time::sleep(self.latency).await;
        let mut sheets = self.sheets.lock().await;
        let rows = sheets.get_mut(sheet).ok_or(CertificationException::SheetNotFound {
            sheet: sheet.to_string(),
        })?;
        let nth = Self::nth(row_index, rows.len())?;
        rows[nth] = row.to_vec();
        Ok(())
    }

    async fn delete_row(&self, sheet: &str, row_index: u32) -> CertResult<()> {
        tokio::time::sleep(self.latency).await;
        let mut sheets = self.sheets.lock().await;
        let rows = sheets.get_mut(sheet).ok_or(CertificationException::SheetNotFound {
            sheet: sheet.to_string(),
        })?;
        let nth = Self::nth(row_index, rows.len())?;
        rows.remove(nth);
        Ok(())
    }
}

struct Stack {
    store: Arc<FakeSheetStore>,
    tickets: Arc<TicketServiceImpl>,
    orders: Arc<OrderServiceImpl>,
}

fn stack() -> Stack {
    let store = FakeSheetStore::new();
    let tickets_cache = Arc::new(SnapshotCache::new(Duration::from_secs(300)));
    let orders_cache = Arc::new(SnapshotCache::new(Duration::from_secs(300)));
    let allocator = Arc::new(
        TicketAllocationServiceImpl::builder()
            .store(store.clone())
            .tickets_cache(tickets_cache.clone())
            .sheet(TICKETS.to_string())
            .build(),
    );
    let tickets = Arc::new(
        TicketServiceImpl::builder()
            .store(store.clone())
            .cache(tickets_cache)
            .lock(Arc::new(WriteLock::new("tickets", Duration::from_secs(5))))
            .sheet(TICKETS.to_string())
            .build(),
    );
    let orders = Arc::new(
        OrderServiceImpl::builder()
            .store(store.clone())
            .cache(orders_cache)
            .lock(Arc::new(WriteLock::new("pedidos", Duration::from_secs(5))))
            .allocator(allocator)
            .sheet(ORDERS.to_string())
            .build(),
    );
    Stack {
        store,
        tickets,
        orders,
    }
}

fn request(nome: &str, oab: &str) -> CreateOrderCommand {
    CreateOrderCommand {
        numero_oab: oab.to_string(),
        nome_completo: nome.to_string(),
        subsecao: String::new(),
        anotacoes: String::new(),
    }
}

fn approved(outcome: &CreatedOrder) -> Option<&Order> {
    match outcome {
        CreatedOrder::Approved { order } => Some(order),
        CreatedOrder::Conflicted { .. } => None,
    }
}

#[tokio::test]
async fn concurrent_writes_apply_in_enqueue_order() {
    let stack = stack();

    // join_all polls in creation order, so this is the enqueue order; with
    // the fake store's latency the appends would interleave arbitrarily
    // without the write queue.
    let creates: Vec<_> = ["111", "222", "333", "444"]
        .into_iter()
        .map(|value| {
            let tickets = stack.tickets.clone();
            async move { tickets.create(value).await }
        })
        .collect();
    let outcomes = futures::future::join_all(creates).await;
    assert!(outcomes.iter().all(|outcome| outcome.is_ok()));

    let stored: Vec<String> =
        stack.store.rows(TICKETS).await.into_iter().map(|row| row[0].clone()).collect();
    assert_eq!(stored, vec!["111", "222", "333", "444"]);
}

#[tokio::test]
async fn racing_duplicate_ticket_creates_write_one_row() {
    let stack = stack();

    let (first, second) = tokio::join!(stack.tickets.create("555"), stack.tickets.create("555"));
    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    assert!(outcomes.iter().any(|outcome| matches!(
        outcome,
        Err(CertificationException::DuplicateTicket { ticket }) if ticket == "555"
    )));
    assert_eq!(stack.store.rows(TICKETS).await.len(), 1);
}

#[tokio::test]
async fn a_ticket_is_never_assigned_twice() {
    let stack = stack();
    stack.store.seed_tickets(&[("t1", ""), ("t2", ""), ("t3", "")]).await;

    let creates: Vec<_> = (0..5)
        .map(|nth| {
            let orders = stack.orders.clone();
            tokio::spawn(async move { orders.create(request(&format!("Operator {nth}"), "")).await })
        })
        .collect();
    let mut assigned = Vec::new();
    let mut exhausted = 0;
    for handle in creates {
        match handle.await.unwrap() {
            Ok(outcome) => {
                let order = approved(&outcome).expect("empty OAB can't conflict").clone();
                assert_eq!(order.status, STATUS_APPROVED);
                assigned.push(order.ticket);
            }
            Err(CertificationException::NoTicketsAvailable) => exhausted += 1,
            Err(other) => panic!("unexpected failure: {other}"),
        }
    }

    assert_eq!(assigned.len(), 3);
    assert_eq!(exhausted, 2);
    assert_eq!(assigned.iter().collect::<HashSet<_>>().len(), 3);
    assert_eq!(stack.store.rows(ORDERS).await.len(), 3);
    assert!(stack
        .store
        .rows(TICKETS)
        .await
        .iter()
        .all(|row| row[1] == STATUS_ASSIGNED));
}

#[tokio::test]
async fn racing_duplicate_oab_yields_one_approved_one_denied() {
    let stack = stack();
    stack.store.seed_tickets(&[("t1", ""), ("t2", "")]).await;

    let first = {
        let orders = stack.orders.clone();
        tokio::spawn(async move { orders.create(request("Ana", "123")).await })
    };
    let second = {
        let orders = stack.orders.clone();
        tokio::spawn(async move { orders.create(request("Breno", " 123 ")).await })
    };
    let outcomes = [
        first.await.unwrap().unwrap(),
        second.await.unwrap().unwrap(),
    ];

    let winners: Vec<_> = outcomes.iter().filter_map(approved).collect();
    assert_eq!(winners.len(), 1);
    assert!(!winners[0].ticket.is_empty());

    let (denied, existing) = outcomes
        .iter()
        .find_map(|outcome| match outcome {
            CreatedOrder::Conflicted { order, existing } => Some((order, existing)),
            CreatedOrder::Approved { .. } => None,
        })
        .expect("one of the two must be denied");
    assert_eq!(denied.status, STATUS_DENIED);
    assert!(denied.ticket.is_empty());
    assert_eq!(existing.ticket, winners[0].ticket);

    // both attempts are recorded, only one ticket was consumed
    assert_eq!(stack.store.rows(ORDERS).await.len(), 2);
    let tickets = stack.store.rows(TICKETS).await;
    assert_eq!(tickets.iter().filter(|row| row[1] == STATUS_ASSIGNED).count(), 1);
}

#[tokio::test]
async fn empty_oab_is_never_a_duplicate_key() {
    let stack = stack();
    stack.store.seed_tickets(&[("68637750800", ""), ("99999999999", "")]).await;

    let first = stack.orders.create(request("João", "")).await.unwrap();
    let first = approved(&first).expect("no conflict on empty OAB").clone();
    assert_eq!(first.ticket, "68637750800");
    assert_eq!(first.status, STATUS_APPROVED);
    assert!(!first.uuid.is_nil());

    let second = stack.orders.create(request("João", "")).await.unwrap();
    let second = approved(&second).expect("no conflict on empty OAB").clone();
    assert_eq!(second.ticket, "99999999999");
    assert_ne!(second.uuid, first.uuid);
}

#[tokio::test]
async fn exhausted_tickets_fail_the_create_without_writing() {
    let stack = stack();
    stack.store.seed_tickets(&[("t1", STATUS_ASSIGNED)]).await;

    let outcome = stack.orders.create(request("Ana", "")).await;
    assert!(matches!(
        outcome,
        Err(CertificationException::NoTicketsAvailable)
    ));
    assert!(stack.store.rows(ORDERS).await.is_empty());
}

#[tokio::test]
async fn conflict_references_the_prior_order() {
    let stack = stack();
    stack.store.seed_tickets(&[("t1", ""), ("t2", "")]).await;

    let prior = stack.orders.create(request("Ana", "4321")).await.unwrap();
    let prior = approved(&prior).unwrap().clone();

    let outcome = stack.orders.create(request("Breno", "4321")).await.unwrap();
    match outcome {
        CreatedOrder::Conflicted { order, existing } => {
            assert_eq!(order.status, STATUS_DENIED);
            assert!(order.ticket.is_empty());
            assert_eq!(existing.ticket, prior.ticket);
            assert_eq!(existing.data_solicitacao, prior.data_solicitacao);
        }
        CreatedOrder::Approved { .. } => panic!("repeated OAB must conflict"),
    }
    // the prior order keeps its ticket
    let rows = stack.store.rows(ORDERS).await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][1], prior.ticket);
}

#[tokio::test]
async fn a_created_order_is_readable_right_after() {
    let stack = stack();
    stack.store.seed_tickets(&[("t1", "")]).await;

    // warm the cache with the pre-write state
    assert_eq!(stack.orders.list(OrderQuery::default()).await.unwrap().total, 0);

    let created = stack.orders.create(request("Ana", "77")).await.unwrap();
    let created = approved(&created).unwrap().clone();

    let fetched = stack.orders.get(created.uuid).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(stack.orders.list(OrderQuery::default()).await.unwrap().total, 1);
}

#[tokio::test]
async fn update_touches_only_the_patched_cells() {
    let stack = stack();
    stack.store.seed_tickets(&[("t1", "")]).await;

    let created = stack
        .orders
        .create(CreateOrderCommand {
            numero_oab: "123".to_string(),
            nome_completo: "Ana".to_string(),
            subsecao: "Niterói".to_string(),
            anotacoes: "ligar antes".to_string(),
        })
        .await
        .unwrap();
    let uuid = created.order().uuid;
    let before = stack.store.rows(ORDERS).await[0].clone();

    stack
        .orders
        .update(
            uuid,
            UpdateOrderCommand {
                status: Some("Em análise".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let after = stack.store.rows(ORDERS).await[0].clone();
    for (nth, (old, new)) in before.iter().zip(&after).enumerate() {
        if nth == 7 {
            assert_eq!(new, "Em análise");
        } else {
            assert_eq!(new, old, "cell {nth} must stay byte-identical");
        }
    }
}

#[tokio::test]
async fn deleting_one_row_never_shifts_a_write_onto_another() {
    let stack = stack();
    stack.store.seed_tickets(&[("t1", ""), ("t2", ""), ("t3", "")]).await;

    let first = stack.orders.create(request("Ana", "1")).await.unwrap().order().clone();
    let second = stack.orders.create(request("Breno", "2")).await.unwrap().order().clone();
    let third = stack.orders.create(request("Carla", "3")).await.unwrap().order().clone();

    // racing delete + update: the update must re-resolve after the shift
    let delete = {
        let orders = stack.orders.clone();
        tokio::spawn(async move { orders.delete(first.uuid).await })
    };
    let update = {
        let orders = stack.orders.clone();
        tokio::spawn(async move {
            orders
                .update(
                    third.uuid,
                    UpdateOrderCommand {
                        anotacoes: Some("liberado".to_string()),
                        ..Default::default()
                    },
                )
                .await
        })
    };
    delete.await.unwrap().unwrap();
    update.await.unwrap().unwrap();

    let rows = stack.store.rows(ORDERS).await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], second.uuid.to_string());
    assert_eq!(rows[0][8], "");
    assert_eq!(rows[1][0], third.uuid.to_string());
    assert_eq!(rows[1][8], "liberado");
}

#[tokio::test]
async fn missing_records_surface_not_found() {
    let stack = stack();

    let unknown = Uuid::new_v4();
    assert!(matches!(
        stack.orders.get(unknown).await,
        Err(CertificationException::OrderNotFound { uuid }) if uuid == unknown
    ));
    assert!(matches!(
        stack.orders.update(unknown, UpdateOrderCommand::default()).await,
        Err(CertificationException::OrderNotFound { .. })
    ));
    assert!(matches!(
        stack.orders.delete(unknown).await,
        Err(CertificationException::OrderNotFound { .. })
    ));
    assert!(matches!(
        stack.tickets.rename("nope", "other").await,
        Err(CertificationException::TicketNotFound { .. })
    ));
    assert!(matches!(
        stack.tickets.delete("nope").await,
        Err(CertificationException::TicketNotFound { .. })
    ));
}

#[tokio::test]
async fn list_filters_and_paginates_in_memory() {
    let stack = stack();
    stack
        .store
        .seed_tickets(&[("t1", ""), ("t2", ""), ("t3", ""), ("t4", "")])
        .await;

    for (nome, oab) in [("Ana", "1"), ("Breno", "2"), ("Carla", "3"), ("Dani", "4")] {
        stack.orders.create(request(nome, oab)).await.unwrap();
    }

    let by_status = stack
        .orders
        .list(OrderQuery {
            status: Some("aprovado".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_status.total, 4);

    let by_ticket = stack
        .orders
        .list(OrderQuery {
            ticket: Some("T2".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_ticket.total, 1);
    assert_eq!(by_ticket.orders[0].nome_completo, "Breno");

    let by_oab = stack
        .orders
        .list(OrderQuery {
            numero_oab: Some(" 3 ".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_oab.total, 1);
    assert_eq!(by_oab.orders[0].nome_completo, "Carla");

    let page = stack
        .orders
        .list(OrderQuery {
            limit: Some(2),
            offset: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 4);
    assert_eq!(page.orders.len(), 2);
    assert_eq!(page.orders[0].nome_completo, "Breno");
    assert_eq!(page.orders[1].nome_completo, "Carla");
}

#[tokio::test]
async fn reads_are_served_from_cache_within_ttl() {
    let mut store = MockSheetStoreRepo::new();
    store
        .expect_read_rows()
        .times(1)
        .returning(|_, _| Ok(vec![vec!["t1".to_string(), String::new()]]));

    let tickets = TicketServiceImpl::builder()
        .store(Arc::new(store))
        .cache(Arc::new(SnapshotCache::new(Duration::from_secs(300))))
        .lock(Arc::new(WriteLock::new("tickets", Duration::from_secs(5))))
        .sheet(TICKETS.to_string())
        .build();

    assert_eq!(tickets.list().await.unwrap().len(), 1);
    // second read hits the snapshot; the mock would panic on a second call
    assert_eq!(tickets.get("t1").await.unwrap().ticket, "t1");
}

#[tokio::test]
async fn a_failed_append_still_invalidates_the_cache() {
    let mut store = MockSheetStoreRepo::new();
    // list, create's fresh duplicate check, then list again after the
    // failure-path invalidation
    store
        .expect_read_rows()
        .times(3)
        .returning(|_, _| Ok(vec![vec!["t1".to_string(), String::new()]]));
    store.expect_append_row().times(1).returning(|_, _, _| {
        Err(CertificationException::StoreUnavailable {
            source: anyhow::anyhow!("api down"),
        })
    });

    let tickets = TicketServiceImpl::builder()
        .store(Arc::new(store))
        .cache(Arc::new(SnapshotCache::new(Duration::from_secs(300))))
        .lock(Arc::new(WriteLock::new("tickets", Duration::from_secs(5))))
        .sheet(TICKETS.to_string())
        .build();

    assert_eq!(tickets.list().await.unwrap().len(), 1);
    assert!(matches!(
        tickets.create("t2").await,
        Err(CertificationException::StoreUnavailable { .. })
    ));
    assert_eq!(tickets.list().await.unwrap().len(), 1);
}
