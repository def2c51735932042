use serde::{Deserialize, Serialize};

use crate::model::entity::Order;

/// Payload for creating an order. The server assigns the uuid, both dates,
/// the status and the ticket.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateOrderCommand {
    #[serde(default)]
    pub numero_oab: String,
    pub nome_completo: String,
    #[serde(default)]
    pub subsecao: String,
    #[serde(default)]
    pub anotacoes: String,
}

/// Partial patch over an existing order; absent fields stay untouched.
///
/// The uuid is immutable and therefore not part of the patch.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateOrderCommand {
    pub ticket: Option<String>,
    pub numero_oab: Option<String>,
    pub nome_completo: Option<String>,
    pub subsecao: Option<String>,
    pub data_solicitacao: Option<String>,
    pub data_liberacao: Option<String>,
    pub status: Option<String>,
    pub anotacoes: Option<String>,
}

impl UpdateOrderCommand {
    pub fn apply_to(&self, order: &mut Order) {
        let fields = [
            (&self.ticket, &mut order.ticket),
            (&self.numero_oab, &mut order.numero_oab),
            (&self.nome_completo, &mut order.nome_completo),
            (&self.subsecao, &mut order.subsecao),
            (&self.data_solicitacao, &mut order.data_solicitacao),
            (&self.data_liberacao, &mut order.data_liberacao),
            (&self.status, &mut order.status),
            (&self.anotacoes, &mut order.anotacoes),
        ];
        for (patch, cell) in fields {
            if let Some(value) = patch {
                *cell = value.clone();
            }
        }
    }
}
