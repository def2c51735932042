use async_trait::async_trait;

use crate::exception::CertResult;

/// Row-level access to one sheet of the external store.
///
/// Row indices are 1-based and include the header at index 1, mirroring the
/// store's own addressing. An index is transient: `delete_row` shifts every
/// subsequent row up by one, so callers must re-resolve from a fresh
/// `read_rows` immediately before each mutating call and never reuse an
/// index across two writes.
#[async_trait]
pub trait SheetStoreRepo: Send + Sync {
    /// All populated rows in `range`, in sheet order. The store may omit
    /// trailing empty cells of a row.
    async fn read_rows(&self, sheet: &str, range: &str) -> CertResult<Vec<Vec<String>>>;

    /// Append `row` after the last populated row of the table at `range`.
    async fn append_row(&self, sheet: &str, range: &str, row: &[String]) -> CertResult<()>;

    /// Overwrite the full row at `row_index`.
    async fn update_row(&self, sheet: &str, row_index: u32, row: &[String]) -> CertResult<()>;

    /// Remove the row at `row_index`, shifting subsequent rows up by one.
    async fn delete_row(&self, sheet: &str, row_index: u32) -> CertResult<()>;
}
