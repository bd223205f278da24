//! Keyword idea retrieval.
//!
//! Seeds a keyword idea search with existing keyword texts and campaign
//! criteria, pages through every result, keeps the last estimate seen for each
//! keyword text, and expands the texts across the requested match types.
//!
//! - [`selector`]: builds the [`IdeaSelector`] for a [`SeedSet`]
//! - [`collector`]: offset-based pagination into [`KeywordEstimates`]
//! - [`finder`]: the [`AlternativesFinder::derive`] entry point and expansion
//! - [`service`]: the [`IdeaService`] contract and its HTTP client
//! - [`attributes`] / [`estimate`]: typed decoding of idea attribute bags
//!
//! # Examples
//! ```no_run
//! use kwopt_common::{CampaignConfiguration, MatchType, Result};
//! use kwopt_ideas::{AlternativesFinder, HttpIdeaService, IdeaAlternativesFinder, SeedSet};
//!
//! # async fn run() -> Result<()> {
//! let service = HttpIdeaService::new("https://ideas.example.com", "token")
//!     .map_err(|e| kwopt_common::KeywordOptimizerError::Config(e.to_string()))?;
//! let finder = IdeaAlternativesFinder::new(service);
//! let seeds = SeedSet::new(
//!     CampaignConfiguration::default(),
//!     ["running shoes"],
//!     [MatchType::Exact, MatchType::Broad],
//! );
//! let alternatives = finder.derive(&seeds).await?;
//! println!("{} alternatives", alternatives.len());
//! # Ok(())
//! # }
//! ```
pub mod attributes;
pub mod collector;
pub mod estimate;
pub mod finder;
pub mod model;
pub mod selector;
pub mod service;

pub use attributes::{AttributeBag, AttributeError, AttributeKind, AttributeValue, decode_idea};
pub use collector::{KeywordEstimates, PAGE_SIZE, collect_keyword_estimates};
pub use estimate::{IdeaEstimate, Money, MonthlySearchVolume};
pub use finder::{AlternativesFinder, IdeaAlternativesFinder, expand};
pub use model::{Keyword, KeywordCollection, KeywordRecord, SeedSet};
pub use selector::{IdeaSelector, SearchParameter, build_selector};
pub use service::{HttpIdeaService, IdeaPage, IdeaService, IdeaServiceError, TargetingIdea};
