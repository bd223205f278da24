//! Paginated retrieval of keyword texts and their estimates.
use crate::attributes::decode_idea;
use crate::estimate::IdeaEstimate;
use crate::selector::IdeaSelector;
use crate::service::IdeaService;
use kwopt_common::{KeywordOptimizerError, Result};
use std::collections::BTreeMap;

/// Results per fetch. Every page is consumed, so this only trades request
/// count against payload size.
pub const PAGE_SIZE: u32 = 100;

/// Finished keyword text to estimate mapping. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordEstimates(BTreeMap<String, IdeaEstimate>);

impl KeywordEstimates {
    pub fn get(&self, keyword_text: &str) -> Option<&IdeaEstimate> {
        self.0.get(keyword_text)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keyword_texts(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IdeaEstimate)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, IdeaEstimate)> for KeywordEstimates {
    /// Later pairs for the same text replace earlier ones.
    fn from_iter<I: IntoIterator<Item = (String, IdeaEstimate)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Drive `selector` through every page of results.
///
/// Pages are fetched strictly one after another. The declared total from the
/// first page bounds the loop; a later page reporting a different total is
/// logged and otherwise ignored. Any failure aborts the whole retrieval.
pub async fn collect_keyword_estimates<S>(
    service: &S,
    mut selector: IdeaSelector,
) -> Result<KeywordEstimates>
where
    S: IdeaService + ?Sized,
{
    let mut estimates = BTreeMap::new();
    let mut offset: u32 = 0;
    let mut declared_total: Option<u32> = None;

    loop {
        selector.set_paging(offset, PAGE_SIZE);
        let page = service.get(&selector).await.map_err(|e| {
            tracing::warn!(offset, error = %e, "ideas.page.failed");
            KeywordOptimizerError::from(e)
        })?;

        let total = *declared_total.get_or_insert(page.total_num_entries);
        if page.total_num_entries != total {
            tracing::warn!(
                offset,
                first_total = total,
                page_total = page.total_num_entries,
                "ideas.page.total_changed"
            );
        }

        let entries = page.entries.unwrap_or_default();
        tracing::debug!(offset, entries = entries.len(), total, "ideas.page");
        for idea in &entries {
            let (text, estimate) = decode_idea(idea)?;
            estimates.insert(text, estimate);
        }

        offset = offset.saturating_add(PAGE_SIZE);
        if offset >= total {
            break;
        }
    }

    tracing::info!(keywords = estimates.len(), pages = offset / PAGE_SIZE, "ideas.collected");
    Ok(KeywordEstimates(estimates))
}
