use serde::{Deserialize, Serialize};

use crate::model::entity::Order;

/// Outcome of an order creation.
///
/// A repeated OAB number is create-but-flag, not a hard rejection: the
/// denied order is persisted and the conflict is reported alongside it, so
/// callers must branch on the variant instead of treating it as a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome")]
pub enum CreatedOrder {
    /// A ticket was assigned and the order was approved.
    Approved { order: Order },
    /// The OAB number already belongs to another order; the new order was
    /// recorded denied, without consuming a ticket.
    Conflicted { order: Order, existing: OabConflict },
}

impl CreatedOrder {
    pub fn order(&self) -> &Order {
        match self {
            CreatedOrder::Approved { order } => order,
            CreatedOrder::Conflicted { order, .. } => order,
        }
    }
}

/// Reference to the order already holding the conflicting OAB number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OabConflict {
    pub ticket: String,
    pub data_solicitacao: String,
}
