//! # Domain Models
//!
//! Records exchanged with the upstream service. Field names on the wire are
//! the upstream's Portuguese names; the Rust names describe the data.
//!
//! Entities are created and mutated exclusively by the upstream service. The
//! gateway only reads them when relaying, and validates the drafts that the
//! browser submits.

use std::{fmt::Display, str::FromStr};

use serde::{de, Deserialize, Deserializer};

/// Declares an upper-case wire enum that parses case-insensitively.
///
/// Browsers submit `"vegetacao"` or `"VEGETACAO"` depending on the form; the
/// upstream only accepts the upper-case spelling, so serialization always
/// emits it.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal $(| $alias:literal)*),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
                match raw.trim().to_uppercase().as_str() {
                    $($wire $(| $alias)* => Ok(Self::$variant),)+
                    other => Err(format!(
                        "valor inválido para {}: {other:?}",
                        stringify!($name)
                    )),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub mod account;
pub mod address;
pub mod alert;
pub mod incident;

pub use account::*;
pub use address::*;
pub use alert::*;
pub use incident::*;

/// Deserializes an optional enum-like field, treating `null`, a missing key
/// and a blank string alike.
pub(crate) fn blank_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
