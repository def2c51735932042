use async_trait::async_trait;
use mockall::mock;

use crate::exception::CertResult;
use crate::repository::SheetStoreRepo;
use crate::service::TicketAllocationService;

mock! {
    pub SheetStoreRepo {}
    #[async_trait]
    impl SheetStoreRepo for SheetStoreRepo {
        async fn read_rows(&self, sheet: &str, range: &str) -> CertResult<Vec<Vec<String>>>;
        async fn append_row(&self, sheet: &str, range: &str, row: &[String]) -> CertResult<()>;
        async fn update_row(&self, sheet: &str, row_index: u32, row: &[String]) -> CertResult<()>;
        async fn delete_row(&self, sheet: &str, row_index: u32) -> CertResult<()>;
    }
}

mock! {
    pub TicketAllocationService {}
    #[async_trait]
    impl TicketAllocationService for TicketAllocationService {
        async fn assign_available_ticket(&self) -> CertResult<String>;
    }
}
