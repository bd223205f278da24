//! Typed view over the loosely typed attribute bag attached to every idea.
//!
//! The service reports each idea as a list of `(kind, value)` entries. We fold
//! them into an [`AttributeBag`] keyed by a closed set of [`AttributeKind`]s and
//! resolve value types at decode time. A missing or mistyped keyword text, or a
//! mistyped optional metric, is an [`AttributeError`] rather than a default.
use crate::estimate::{IdeaEstimate, Money, MonthlySearchVolume};
use crate::service::TargetingIdea;
use kwopt_common::KeywordOptimizerError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Attribute kinds requested on every idea query.
pub const REQUESTED_ATTRIBUTE_KINDS: [AttributeKind; 5] = [
    AttributeKind::KeywordText,
    AttributeKind::SearchVolume,
    AttributeKind::AverageCpc,
    AttributeKind::Competition,
    AttributeKind::TargetedMonthlySearches,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeKind {
    KeywordText,
    SearchVolume,
    AverageCpc,
    Competition,
    TargetedMonthlySearches,
    /// Anything the service added after this enum was written. Dropped when
    /// the bag is built.
    #[serde(other)]
    Unknown,
}

const KNOWN_VALUE_TYPES: [&str; 5] = ["STRING", "LONG", "DOUBLE", "MONEY", "MONTHLY_SEARCH_VOLUMES"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeValue {
    String(String),
    Long(i64),
    Double(f64),
    Money(Money),
    MonthlySearchVolumes(Vec<MonthlySearchVolume>),
    /// A value type this crate does not model; only the type name is kept.
    #[serde(skip_deserializing)]
    Other(String),
}

impl AttributeValue {
    pub fn type_name(&self) -> &str {
        match self {
            AttributeValue::String(_) => "STRING",
            AttributeValue::Long(_) => "LONG",
            AttributeValue::Double(_) => "DOUBLE",
            AttributeValue::Money(_) => "MONEY",
            AttributeValue::MonthlySearchVolumes(_) => "MONTHLY_SEARCH_VOLUMES",
            AttributeValue::Other(type_name) => type_name,
        }
    }
}

/// One `(kind, value)` pair as it appears on the wire.
///
/// An unrecognized value type decodes to [`AttributeValue::Other`] so a
/// schema addition on the service side does not fail the page. A known value
/// type with a malformed payload is still a decode error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireEntry")]
pub struct AttributeEntry {
    pub key: AttributeKind,
    pub value: AttributeValue,
}

#[derive(Deserialize)]
struct WireEntry {
    key: AttributeKind,
    value: WireValue,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireValue {
    Known(AttributeValue),
    Unrecognized {
        #[serde(rename = "type")]
        type_name: String,
    },
}

impl TryFrom<WireEntry> for AttributeEntry {
    type Error = String;

    fn try_from(wire: WireEntry) -> Result<Self, Self::Error> {
        let value = match wire.value {
            WireValue::Known(value) => value,
            WireValue::Unrecognized { type_name } if KNOWN_VALUE_TYPES.contains(&type_name.as_str()) => {
                return Err(format!("malformed {type_name} value for attribute {:?}", wire.key));
            }
            WireValue::Unrecognized { type_name } => AttributeValue::Other(type_name),
        };
        Ok(Self { key: wire.key, value })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    #[error("required attribute {0:?} is missing")]
    Missing(AttributeKind),
    #[error("attribute {kind:?} has type {found}, expected {expected}")]
    TypeMismatch {
        kind: AttributeKind,
        expected: &'static str,
        found: String,
    },
}

impl From<AttributeError> for KeywordOptimizerError {
    fn from(e: AttributeError) -> Self {
        KeywordOptimizerError::Contract {
            source: Box::new(e),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeBag(HashMap<AttributeKind, AttributeValue>);

impl AttributeBag {
    /// Later entries for the same kind replace earlier ones.
    pub fn from_entries(entries: &[AttributeEntry]) -> Self {
        let map = entries
            .iter()
            .filter(|e| e.key != AttributeKind::Unknown)
            .map(|e| (e.key, e.value.clone()))
            .collect();
        Self(map)
    }

    pub fn get(&self, kind: AttributeKind) -> Option<&AttributeValue> {
        self.0.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn required_string(&self, kind: AttributeKind) -> Result<&str, AttributeError> {
        self.string(kind)?.ok_or(AttributeError::Missing(kind))
    }

    pub fn string(&self, kind: AttributeKind) -> Result<Option<&str>, AttributeError> {
        self.typed(kind, "STRING", |v| match v {
            AttributeValue::String(s) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn long(&self, kind: AttributeKind) -> Result<Option<i64>, AttributeError> {
        self.typed(kind, "LONG", |v| match v {
            AttributeValue::Long(n) => Some(*n),
            _ => None,
        })
    }

    pub fn double(&self, kind: AttributeKind) -> Result<Option<f64>, AttributeError> {
        self.typed(kind, "DOUBLE", |v| match v {
            AttributeValue::Double(x) => Some(*x),
            _ => None,
        })
    }

    pub fn money(&self, kind: AttributeKind) -> Result<Option<Money>, AttributeError> {
        self.typed(kind, "MONEY", |v| match v {
            AttributeValue::Money(m) => Some(*m),
            _ => None,
        })
    }

    pub fn monthly_searches(
        &self,
        kind: AttributeKind,
    ) -> Result<Option<&[MonthlySearchVolume]>, AttributeError> {
        self.typed(kind, "MONTHLY_SEARCH_VOLUMES", |v| match v {
            AttributeValue::MonthlySearchVolumes(vols) => Some(vols.as_slice()),
            _ => None,
        })
    }

    fn typed<'a, T>(
        &'a self,
        kind: AttributeKind,
        expected: &'static str,
        pick: impl FnOnce(&'a AttributeValue) -> Option<T>,
    ) -> Result<Option<T>, AttributeError> {
        let Some(value) = self.0.get(&kind) else {
            return Ok(None);
        };
        pick(value).map(Some).ok_or_else(|| AttributeError::TypeMismatch {
            kind,
            expected,
            found: value.type_name().to_string(),
        })
    }
}

/// Decode one idea into its keyword text and estimate.
///
/// Pure: the same idea always decodes to the same pair.
pub fn decode_idea(idea: &TargetingIdea) -> Result<(String, IdeaEstimate), AttributeError> {
    let bag = AttributeBag::from_entries(&idea.data);
    let text = bag.required_string(AttributeKind::KeywordText)?.to_string();
    let estimate = IdeaEstimate::from_attributes(&bag)?;
    Ok((text, estimate))
}
