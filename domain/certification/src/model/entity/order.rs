use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status written on a create that got a ticket.
pub const STATUS_APPROVED: &str = "Aprovado";
/// Status written on a create whose OAB number already belongs to another
/// order.
pub const STATUS_DENIED: &str = "Recusado";

/// A certification request, one row in the `pedidos` sheet.
///
/// The assignment to a ticket is represented by the `ticket` cell alone;
/// there is no relation object. Statuses are free text with the canonical
/// values above; operators write other values by hand and those rows stay
/// valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub uuid: Uuid,
    #[serde(default)]
    pub ticket: String,
    #[serde(default)]
    pub numero_oab: String,
    pub nome_completo: String,
    #[serde(default)]
    pub subsecao: String,
    #[serde(default)]
    pub data_solicitacao: String,
    #[serde(default)]
    pub data_liberacao: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub anotacoes: String,
}

impl Order {
    /// A1 range covering all data rows; row 1 is the header.
    pub const READ_RANGE: &'static str = "A2:I";
    /// A1 range of the table new rows are appended after.
    pub const APPEND_RANGE: &'static str = "A1:I1";
    /// Sheet row of the first data row.
    pub const FIRST_DATA_ROW: u32 = 2;

    /// Decode one sheet row in column order
    /// `[uuid, ticket, numero_oab, nome_completo, subsecao,
    /// data_solicitacao, data_liberacao, status, anotacoes]`.
    ///
    /// Rows whose uuid cell doesn't parse are not orders and are skipped by
    /// callers; their physical position still counts for row addressing.
    pub fn from_row(row: &[String]) -> Option<Self> {
        let uuid = Uuid::parse_str(row.first()?.trim()).ok()?;
        let cell = |nth: usize| row.get(nth).cloned().unwrap_or_default();
        Some(Self {
            uuid,
            ticket: cell(1),
            numero_oab: cell(2),
            nome_completo: cell(3),
            subsecao: cell(4),
            data_solicitacao: cell(5),
            data_liberacao: cell(6),
            status: cell(7),
            anotacoes: cell(8),
        })
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.uuid.to_string(),
            self.ticket.clone(),
            self.numero_oab.clone(),
            self.nome_completo.clone(),
            self.subsecao.clone(),
            self.data_solicitacao.clone(),
            self.data_liberacao.clone(),
            self.status.clone(),
            self.anotacoes.clone(),
        ]
    }
}
