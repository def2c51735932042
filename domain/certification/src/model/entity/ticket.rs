use serde::{Deserialize, Serialize};

/// Status cell the allocator writes when a ticket is handed out to an order.
pub const STATUS_ASSIGNED: &str = "Atribuído";

/// An available certification slot, one row in the `tickets` sheet.
///
/// An empty status means the ticket can still be assigned; any non-empty
/// value means it is taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket: String,
    #[serde(default)]
    pub status: String,
}

impl Ticket {
    /// A1 range covering all data rows; row 1 is the header.
    pub const READ_RANGE: &'static str = "A2:B";
    /// A1 range of the table new rows are appended after.
    pub const APPEND_RANGE: &'static str = "A1:B1";
    /// Sheet row of the first data row.
    pub const FIRST_DATA_ROW: u32 = 2;

    pub fn new(ticket: impl Into<String>) -> Self {
        Self {
            ticket: ticket.into(),
            status: String::new(),
        }
    }

    /// Decode one sheet row. The store omits trailing empty cells.
    pub fn from_row(row: &[String]) -> Self {
        let mut cells = row.iter().cloned();
        Self {
            ticket: cells.next().unwrap_or_default(),
            status: cells.next().unwrap_or_default(),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![self.ticket.clone(), self.status.clone()]
    }

    pub fn is_available(&self) -> bool {
        !self.ticket.trim().is_empty() && self.status.trim().is_empty()
    }
}
