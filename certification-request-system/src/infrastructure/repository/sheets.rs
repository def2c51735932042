use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use dashmap::DashMap;
use domain_certification::exception::{CertResult, CertificationException};
use domain_certification::repository::SheetStoreRepo;
use serde::Deserialize;
use serde_json::json;
use typed_builder::TypedBuilder;

/// `SheetStoreRepo` over the Google Sheets v4 REST interface.
///
/// The credential provider hands this a ready-to-use bearer token and the
/// spreadsheet id; no auth flow lives here.
#[derive(TypedBuilder)]
pub struct SheetsRepo {
    client: Arc<reqwest::Client>,
    endpoint: String,
    spreadsheet_id: String,
    access_token: String,
    /// Sheet title → numeric sheet id. The id never changes for the
    /// lifetime of a sheet, so it is resolved once and kept.
    #[builder(default)]
    sheet_ids: DashMap<String, i64>,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    #[serde(rename = "sheetId")]
    sheet_id: i64,
    title: String,
}

/// Letter of the last column a row of `width` cells spans.
fn last_column(width: usize) -> char {
    (b'A' + (width.saturating_sub(1) as u8).min(25)) as char
}

impl SheetsRepo {
    fn values_url(&self, sheet: &str, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}!{}",
            self.endpoint, self.spreadsheet_id, sheet, range
        )
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> CertResult<reqwest::Response> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| CertificationException::StoreUnavailable { source: e.into() })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CertificationException::StoreUnavailable {
                source: anyhow!("sheets api returned {status}: {body}"),
            });
        }
        Ok(response)
    }

    async fn sheet_id(&self, sheet: &str) -> CertResult<i64> {
        if let Some(id) = self.sheet_ids.get(sheet) {
            return Ok(*id);
        }
        let url = format!(
            "{}/v4/spreadsheets/{}?fields=sheets.properties",
            self.endpoint, self.spreadsheet_id
        );
        let meta: SpreadsheetMeta = self
            .send(self.client.get(url))
            .await?
            .json()
            .await
            .map_err(|e| CertificationException::StoreUnavailable { source: e.into() })?;
        for entry in meta.sheets {
            self.sheet_ids.insert(entry.properties.title, entry.properties.sheet_id);
        }
        self.sheet_ids
            .get(sheet)
            .map(|id| *id)
            .ok_or_else(|| CertificationException::SheetNotFound {
                sheet: sheet.to_string(),
            })
    }
}

#[async_trait]
impl SheetStoreRepo for SheetsRepo {
    async fn read_rows(&self, sheet: &str, range: &str) -> CertResult<Vec<Vec<String>>> {
        let response = self.send(self.client.get(self.values_url(sheet, range))).await?;
        // an empty sheet answers without a `values` field at all
        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| CertificationException::StoreUnavailable { source: e.into() })?;
        Ok(range.values)
    }

    async fn append_row(&self, sheet: &str, range: &str, row: &[String]) -> CertResult<()> {
        let url = format!("{}:append", self.values_url(sheet, range));
        self.send(
            self.client
                .post(url)
                .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
                .json(&json!({ "values": [row] })),
        )
        .await?;
        Ok(())
    }

    async fn update_row(&self, sheet: &str, row_index: u32, row: &[String]) -> CertResult<()> {
        if row_index < 2 {
            return Err(CertificationException::RowIndexInvalid { index: row_index });
        }
        let range = format!("A{row_index}:{}{row_index}", last_column(row.len()));
        self.send(
            self.client
                .put(self.values_url(sheet, &range))
                .query(&[("valueInputOption", "RAW")])
                .json(&json!({ "values": [row] })),
        )
        .await?;
        Ok(())
    }

    async fn delete_row(&self, sheet: &str, row_index: u32) -> CertResult<()> {
        if row_index < 2 {
            return Err(CertificationException::RowIndexInvalid { index: row_index });
        }
        let sheet_id = self.sheet_id(sheet).await?;
        let url =
            format!("{}/v4/spreadsheets/{}:batchUpdate", self.endpoint, self.spreadsheet_id);
        // the dimension range is 0-based and end-exclusive
        self.send(self.client.post(url).json(&json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": sheet_id,
                        "dimension": "ROWS",
                        "startIndex": row_index - 1,
                        "endIndex": row_index,
                    }
                }
            }]
        })))
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_column_spans_the_row_width() {
        assert_eq!(last_column(2), 'B');
        assert_eq!(last_column(9), 'I');
        assert_eq!(last_column(1), 'A');
    }
}
