use std::str::FromStr;

use uuid::Uuid;

pub mod dtos;
pub mod orders;
pub mod tickets;

mod responder;
pub use responder::{ApiError, ApiResult};

fn extract_uuid(s: &str) -> Result<Uuid, ApiError> {
    Uuid::from_str(s).map_err(|e| {
        ApiError::bad_request(format!(r#"error when parse uuid from "{s}": {e}"#))
    })
}
