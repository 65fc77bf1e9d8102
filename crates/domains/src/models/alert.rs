use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{blank_as_none, is_blank};
use crate::error::{DomainError, Result};

wire_enum! {
    /// Severity of a civil-defense alert.
    AlertLevel {
        Low => "BAIXO",
        Medium => "MEDIO" | "MÉDIO",
        High => "ALTO",
    }
}

/// A civil-defense alert as stored by the upstream service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: u64,

    #[serde(rename = "titulo")]
    pub title: String,

    #[serde(rename = "descricao", default)]
    pub description: Option<String>,

    #[serde(rename = "nivelAlerta")]
    pub level: AlertLevel,

    #[serde(rename = "bairrosAfetados", default)]
    pub affected_neighborhoods: Option<String>,

    #[serde(rename = "dataInicio")]
    pub starts_at: NaiveDateTime,

    #[serde(rename = "ativo")]
    pub active: bool,
}

/// Body of an alert creation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertDraft {
    #[serde(rename = "titulo", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "descricao", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(
        rename = "nivelAlerta",
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub level: Option<AlertLevel>,

    #[serde(rename = "bairrosAfetados", default, skip_serializing_if = "Option::is_none")]
    pub affected_neighborhoods: Option<String>,

    #[serde(rename = "dataInicio", default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<String>,

    #[serde(rename = "ativo", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AlertDraft {
    pub const MAX_TITLE_CHARS: usize = 200;

    pub fn validate(&self) -> Result<()> {
        if is_blank(self.title.as_deref()) {
            return Err(DomainError::invalid(
                "Título é obrigatório",
                "titulo não pode ser vazio",
            ));
        }

        let length = self.title.as_deref().map_or(0, |t| t.chars().count());
        if length > Self::MAX_TITLE_CHARS {
            return Err(DomainError::invalid(
                "Título muito longo",
                format!("titulo deve ter no máximo {} caracteres", Self::MAX_TITLE_CHARS),
            ));
        }

        Ok(())
    }
}

/// Query filters of the alert listing.
///
/// The upstream exposes each filter as its own endpoint, so at most one is
/// applied: `ativos=true` wins over `nivel`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertFilter {
    pub active_only: Option<String>,
    pub level: Option<String>,
}

impl AlertFilter {
    /// Reads `ativos` and `nivel` from decoded query pairs. A repeated key
    /// keeps its first value; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut filter = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "ativos" => &mut filter.active_only,
                "nivel" => &mut filter.level,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        filter
    }

    /// Upstream path segments selected by the filter. A level of `.` or `..`
    /// would be resolved as a relative path, so it counts as no level.
    pub fn segments(&self) -> Vec<String> {
        if self.active_only.as_deref() == Some("true") {
            return vec!["alertas".into(), "ativos".into()];
        }

        match self.level.as_deref().map(str::trim) {
            Some(level) if !level.is_empty() && level != "." && level != ".." => {
                vec!["alertas".into(), "nivel".into(), level.to_string()]
            }
            _ => vec!["alertas".into()],
        }
    }
}
