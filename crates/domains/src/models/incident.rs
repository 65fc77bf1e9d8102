use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{address::Address, is_blank};
use crate::error::{DomainError, Result};

/// Flood and landslide reports share one shape and differ only in the
/// upstream collection they live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncidentKind {
    Flood,
    Landslide,
}

impl IncidentKind {
    pub const ALL: [IncidentKind; 2] = [IncidentKind::Flood, IncidentKind::Landslide];

    /// Collection name, used both upstream and in the gateway's own routes.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Flood => "alagamentos",
            Self::Landslide => "deslizamentos",
        }
    }

    /// Singular noun for user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Flood => "alagamento",
            Self::Landslide => "deslizamento",
        }
    }
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

/// Positive integer identifier of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IncidentId(u64);

impl IncidentId {
    pub fn parse(raw: &str) -> Result<Self> {
        raw.trim()
            .parse::<u64>()
            .ok()
            .filter(|id| *id > 0)
            .map(Self)
            .ok_or_else(|| DomainError::invalid("ID inválido", "ID deve ser um número positivo"))
    }
}

impl fmt::Display for IncidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An incident as stored by the upstream service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: u64,

    #[serde(rename = "usuarioId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,

    #[serde(rename = "descricao", default)]
    pub description: Option<String>,

    #[serde(rename = "dataOcorrencia")]
    pub occurred_at: NaiveDateTime,

    #[serde(rename = "endereco")]
    pub address: Address,
}

/// Body of a create or update request, as submitted by the browser.
///
/// Fields the gateway does not know about are kept in `extra` and forwarded
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentDraft {
    #[serde(rename = "descricao", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "dataOcorrencia", default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<String>,

    #[serde(rename = "endereco", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IncidentDraft {
    /// Minimum shape the upstream needs to place the report on a map.
    pub fn validate(&self) -> Result<()> {
        let address = self
            .address
            .as_ref()
            .ok_or_else(|| DomainError::invalid("Endereço é obrigatório", "endereco não pode ser nulo"))?;

        if is_blank(address.street.as_deref()) {
            return Err(DomainError::invalid(
                "Logradouro é obrigatório",
                "logradouro não pode ser vazio",
            ));
        }

        if is_blank(address.neighborhood.as_deref()) {
            return Err(DomainError::invalid(
                "Bairro é obrigatório",
                "bairro não pode ser vazio",
            ));
        }

        Ok(())
    }
}
