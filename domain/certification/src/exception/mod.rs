use uuid::Uuid;

pub type CertResult<T> = Result<T, CertificationException>;

#[derive(Debug, thiserror::Error)]
pub enum CertificationException {
    #[error("Ticket {ticket} can't be found.")]
    TicketNotFound { ticket: String },

    #[error("Order {uuid} can't be found.")]
    OrderNotFound { uuid: Uuid },

    #[error("Ticket {ticket} already exists.")]
    DuplicateTicket { ticket: String },

    #[error("No ticket row is left with an empty status.")]
    NoTicketsAvailable,

    #[error("Timed out after {waited_secs}s waiting for the {resource} write queue.")]
    WriteTimeout {
        resource: &'static str,
        waited_secs: u64,
    },

    #[error("The sheet store can't be reached: {source}")]
    StoreUnavailable {
        #[source]
        source: anyhow::Error,
    },

    #[error("Sheet {sheet} doesn't resolve to a sheet id.")]
    SheetNotFound { sheet: String },

    #[error("Row index {index} doesn't address a data row.")]
    RowIndexInvalid { index: u32 },

    #[error("Certification internal error: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for CertificationException {
    fn from(e: anyhow::Error) -> Self {
        CertificationException::InternalError { source: e }
    }
}

impl CertificationException {
    /// Stable machine-readable kind; the HTTP layer puts it in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TicketNotFound { .. } | Self::OrderNotFound { .. } => "not_found",
            Self::DuplicateTicket { .. } => "conflict",
            Self::NoTicketsAvailable => "no_tickets_available",
            Self::WriteTimeout { .. } => "write_timeout",
            Self::StoreUnavailable { .. } => "store_unavailable",
            Self::SheetNotFound { .. } => "sheet_not_found",
            Self::RowIndexInvalid { .. } => "row_index_invalid",
            Self::InternalError { .. } => "internal_error",
        }
    }
}
