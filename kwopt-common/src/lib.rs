//! Common types shared across the kwopt crates.
//!
//! This crate holds the campaign-level value types that both configuration
//! loading and the keyword idea core need, the single domain error type, and
//! the logging initializer used by binaries and tests.
//!
//! # Overview
//!
//! - [`MatchType`]: How a keyword text is qualified when it is materialized
//! - [`Criterion`] and [`CampaignConfiguration`]: Filter criteria inherited
//!   from a campaign and forwarded to the idea service
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`KeywordOptimizerError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use kwopt_common::{CampaignConfiguration, Criterion};
//!
//! let campaign = CampaignConfiguration::default()
//!     .with_criterion(Criterion::Language { id: 1000 })
//!     .with_criterion(Criterion::Location { id: 2840 });
//! assert_eq!(campaign.additional_criteria.len(), 2);
//! ```
use serde::{Deserialize, Serialize};

pub mod observability;

/// Boxed cause carried by [`KeywordOptimizerError`] variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Qualifier under which a keyword text is represented.
///
/// Ordered so that sets of match types iterate deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchType {
    Exact,
    Phrase,
    Broad,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchType::Exact => "EXACT",
            MatchType::Phrase => "PHRASE",
            MatchType::Broad => "BROAD",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for MatchType {
    type Err = KeywordOptimizerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EXACT" => Ok(MatchType::Exact),
            "PHRASE" => Ok(MatchType::Phrase),
            "BROAD" => Ok(MatchType::Broad),
            other => Err(KeywordOptimizerError::Config(format!(
                "unknown match type: {other}"
            ))),
        }
    }
}

/// Additional filter criterion inherited from a campaign.
///
/// Each criterion becomes one search parameter on the idea request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Criterion {
    /// Restrict ideas to a language (service-specific criterion id).
    Language { id: u64 },
    /// Restrict ideas to a geographic target (service-specific criterion id).
    Location { id: u64 },
    /// Restrict ideas to traffic from the given networks.
    Network {
        #[serde(default)]
        google_search: bool,
        #[serde(default)]
        search_network: bool,
    },
}

/// Campaign-level settings that scope a keyword retrieval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignConfiguration {
    /// Criteria forwarded, in order, as extra search parameters.
    #[serde(default)]
    pub additional_criteria: Vec<Criterion>,
}

impl CampaignConfiguration {
    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.additional_criteria.push(criterion);
        self
    }
}

/// Error raised by keyword retrieval and its supporting crates.
#[derive(thiserror::Error, Debug)]
pub enum KeywordOptimizerError {
    /// The idea service answered, but reported an application error.
    #[error("Problem while querying the keyword idea service: {message}")]
    Service {
        message: String,
        #[source]
        source: BoxError,
    },

    /// The idea service could not be reached or spoke an unexpected protocol.
    #[error("Problem while connecting to the keyword idea service")]
    Connection {
        #[source]
        source: BoxError,
    },

    /// A returned idea broke the attribute contract (e.g. no keyword text).
    #[error("Idea service returned malformed attributes")]
    Contract {
        #[source]
        source: BoxError,
    },

    /// A campaign criterion could not be translated into a search parameter.
    #[error("Unsupported campaign criterion: {0}")]
    Criteria(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`KeywordOptimizerError`].
pub type Result<T> = std::result::Result<T, KeywordOptimizerError>;
