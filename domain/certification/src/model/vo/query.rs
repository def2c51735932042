use serde::{Deserialize, Serialize};

use crate::model::entity::Order;

/// In-memory filters and optional pagination for listing orders.
///
/// Filters are equality checks: case-insensitive for `status` and `ticket`,
/// trimmed and case-insensitive for `numero_oab`. Pagination applies over
/// the filtered set.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct OrderQuery {
    pub status: Option<String>,
    pub ticket: Option<String>,
    pub numero_oab: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl OrderQuery {
    pub fn is_paged(&self) -> bool {
        self.limit.is_some() || self.offset.is_some()
    }

    pub fn matches(&self, order: &Order) -> bool {
        let eq_fold = |filter: &Option<String>, value: &str| match filter {
            Some(wanted) => wanted.to_lowercase() == value.to_lowercase(),
            None => true,
        };
        eq_fold(&self.status, &order.status)
            && eq_fold(&self.ticket, &order.ticket)
            && match &self.numero_oab {
                Some(wanted) => {
                    wanted.trim().to_lowercase() == order.numero_oab.trim().to_lowercase()
                }
                None => true,
            }
    }
}

/// One page of orders plus the total filtered count.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPage {
    pub total: usize,
    pub orders: Vec<Order>,
}
