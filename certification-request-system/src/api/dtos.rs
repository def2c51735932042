use domain_certification::model::entity::Order;
use domain_certification::model::vo::{OabConflict, OrderQuery};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct CreateTicketRequest {
    pub ticket: String,
}

#[derive(Deserialize)]
pub struct RenameTicketRequest {
    pub ticket: String,
}

#[derive(Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
    pub ticket: Option<String>,
    pub numero_oab: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ListOrdersQuery {
    pub fn is_paged(&self) -> bool {
        self.limit.is_some() || self.offset.is_some()
    }
}

impl From<ListOrdersQuery> for OrderQuery {
    fn from(query: ListOrdersQuery) -> Self {
        OrderQuery {
            status: query.status,
            ticket: query.ticket,
            numero_oab: query.numero_oab,
            limit: query.limit,
            offset: query.offset,
        }
    }
}

#[derive(Serialize)]
pub struct ListResponse<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

#[derive(Serialize)]
pub struct PagedResponse<T> {
    pub count: usize,
    pub data: Vec<T>,
    pub total: usize,
    pub limit: Option<usize>,
    pub offset: usize,
}

/// 409 body on a duplicate-OAB create: the recorded (denied) order plus a
/// reference to the order already holding the number.
#[derive(Serialize)]
pub struct ConflictResponse {
    pub code: &'static str,
    pub message: String,
    pub data: Order,
    pub existing: OabConflict,
}
