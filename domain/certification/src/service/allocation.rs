use async_trait::async_trait;

use crate::exception::CertResult;

/// Hands out an available ticket to exactly one caller.
#[async_trait]
pub trait TicketAllocationService: Send + Sync {
    /// Fresh-read the tickets sheet, mark the first available row as
    /// assigned and return its ticket value, or fail with
    /// `NoTicketsAvailable`.
    ///
    /// Must be called only from inside the orders write queue: that queue is
    /// what serializes the scan-then-mark sequence against other order
    /// creations. A direct ticket write bypassing it is not protected.
    async fn assign_available_ticket(&self) -> CertResult<String>;
}
