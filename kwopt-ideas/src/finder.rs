//! Turns seed keywords into match-type-qualified alternatives.
use crate::collector::{KeywordEstimates, collect_keyword_estimates};
use crate::model::{Keyword, KeywordCollection, KeywordRecord, SeedSet};
use crate::selector::build_selector;
use crate::service::IdeaService;
use async_trait::async_trait;
use kwopt_common::Result;

/// Derives new keyword candidates from an existing set.
#[async_trait]
pub trait AlternativesFinder: Send + Sync {
    /// Each call is an independent retrieval. On failure nothing is returned.
    async fn derive(&self, seeds: &SeedSet) -> Result<KeywordCollection>;
}

/// [`AlternativesFinder`] backed by the keyword idea service.
pub struct IdeaAlternativesFinder<S> {
    service: S,
}

impl<S: IdeaService> IdeaAlternativesFinder<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S: IdeaService> AlternativesFinder for IdeaAlternativesFinder<S> {
    async fn derive(&self, seeds: &SeedSet) -> Result<KeywordCollection> {
        let selector = build_selector(seeds)?;
        tracing::debug!(
            seeds = seeds.keyword_texts.len(),
            criteria = seeds.campaign.additional_criteria.len(),
            "ideas.derive.start"
        );
        let estimates = collect_keyword_estimates(&self.service, selector).await?;
        let alternatives = expand(&estimates, seeds);
        tracing::info!(
            keywords = estimates.len(),
            records = alternatives.len(),
            "ideas.derive.done"
        );
        Ok(alternatives)
    }
}

/// One record per (keyword text, requested match type) pair, stamped with
/// the seeds' campaign.
pub fn expand(estimates: &KeywordEstimates, seeds: &SeedSet) -> KeywordCollection {
    let mut alternatives = KeywordCollection::new(seeds.campaign.clone());
    for (text, estimate) in estimates.iter() {
        for &match_type in &seeds.match_types {
            alternatives.push(KeywordRecord::new(
                Keyword::new(text, match_type),
                estimate.clone(),
            ));
        }
    }
    alternatives
}
