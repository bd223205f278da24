//! Keyword records and the collections that flow in and out of `derive`.
use crate::estimate::IdeaEstimate;
use kwopt_common::{CampaignConfiguration, MatchType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keyword {
    pub text: String,
    pub match_type: MatchType,
}

impl Keyword {
    pub fn new(text: impl Into<String>, match_type: MatchType) -> Self {
        Self {
            text: text.into(),
            match_type,
        }
    }
}

/// A keyword together with its estimate.
///
/// `score` and `quality_score` are filled in by later evaluation stages and are
/// always `None` when a record comes out of idea retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub keyword: Keyword,
    pub estimate: IdeaEstimate,
    pub score: Option<f64>,
    pub quality_score: Option<f64>,
}

impl KeywordRecord {
    pub fn new(keyword: Keyword, estimate: IdeaEstimate) -> Self {
        Self {
            keyword,
            estimate,
            score: None,
            quality_score: None,
        }
    }
}

/// Insertion-ordered keyword records scoped to one campaign configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCollection {
    campaign: CampaignConfiguration,
    records: Vec<KeywordRecord>,
}

impl KeywordCollection {
    pub fn new(campaign: CampaignConfiguration) -> Self {
        Self {
            campaign,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: KeywordRecord) {
        self.records.push(record);
    }

    pub fn campaign(&self) -> &CampaignConfiguration {
        &self.campaign
    }

    pub fn records(&self) -> &[KeywordRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeywordRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct keyword texts across all records.
    pub fn containing_keyword_texts(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.keyword.text.clone()).collect()
    }

    /// Distinct match types across all records.
    pub fn containing_match_types(&self) -> BTreeSet<MatchType> {
        self.records.iter().map(|r| r.keyword.match_type).collect()
    }
}

impl<'a> IntoIterator for &'a KeywordCollection {
    type Item = &'a KeywordRecord;
    type IntoIter = std::slice::Iter<'a, KeywordRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Input to a retrieval: seed texts, the match types to materialize, and the
/// campaign whose criteria filter the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSet {
    pub campaign: CampaignConfiguration,
    pub keyword_texts: BTreeSet<String>,
    pub match_types: BTreeSet<MatchType>,
}

impl SeedSet {
    pub fn new<T, M>(campaign: CampaignConfiguration, keyword_texts: T, match_types: M) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        M: IntoIterator<Item = MatchType>,
    {
        Self {
            campaign,
            keyword_texts: keyword_texts.into_iter().map(Into::into).collect(),
            match_types: match_types.into_iter().collect(),
        }
    }

    /// Seed a new round from the records of an earlier one.
    pub fn from_collection(collection: &KeywordCollection) -> Self {
        Self {
            campaign: collection.campaign().clone(),
            keyword_texts: collection.containing_keyword_texts(),
            match_types: collection.containing_match_types(),
        }
    }
}
