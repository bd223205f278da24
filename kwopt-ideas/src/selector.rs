//! Request descriptor sent to the idea service and the builder that derives
//! it from a [`SeedSet`].
use crate::attributes::{AttributeKind, REQUESTED_ATTRIBUTE_KINDS};
use crate::model::SeedSet;
use kwopt_common::{Criterion, KeywordOptimizerError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    Ideas,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdeaType {
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchParameter {
    RelatedToQuery {
        queries: Vec<String>,
    },
    Language {
        #[serde(rename = "languageIds")]
        language_ids: Vec<u64>,
    },
    Location {
        #[serde(rename = "locationIds")]
        location_ids: Vec<u64>,
    },
    Network {
        #[serde(rename = "targetGoogleSearch")]
        target_google_search: bool,
        #[serde(rename = "targetSearchNetwork")]
        target_search_network: bool,
    },
}

/// Slice of the result set a single fetch returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    pub start_index: u32,
    pub number_results: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaSelector {
    pub request_type: RequestType,
    pub idea_type: IdeaType,
    pub requested_attribute_types: Vec<AttributeKind>,
    pub search_parameters: Vec<SearchParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

impl IdeaSelector {
    pub fn set_paging(&mut self, start_index: u32, number_results: u32) {
        self.paging = Some(Paging {
            start_index,
            number_results,
        });
    }
}

/// Build the keyword idea selector for `seeds`.
///
/// The related-to-query parameter comes first and carries every seed text,
/// followed by one parameter per campaign criterion in the order supplied.
/// Paging is left unset.
pub fn build_selector(seeds: &SeedSet) -> Result<IdeaSelector> {
    let mut search_parameters = vec![SearchParameter::RelatedToQuery {
        queries: seeds.keyword_texts.iter().cloned().collect(),
    }];
    search_parameters.extend(to_search_parameters(&seeds.campaign.additional_criteria)?);

    Ok(IdeaSelector {
        request_type: RequestType::Ideas,
        idea_type: IdeaType::Keyword,
        requested_attribute_types: REQUESTED_ATTRIBUTE_KINDS.to_vec(),
        search_parameters,
        paging: None,
    })
}

/// Translate campaign criteria into search parameters, one each, in order.
pub fn to_search_parameters(criteria: &[Criterion]) -> Result<Vec<SearchParameter>> {
    criteria.iter().map(to_search_parameter).collect()
}

fn to_search_parameter(criterion: &Criterion) -> Result<SearchParameter> {
    match *criterion {
        Criterion::Language { id: 0 } => Err(KeywordOptimizerError::Criteria(
            "language criterion needs a non-zero id".into(),
        )),
        Criterion::Language { id } => Ok(SearchParameter::Language {
            language_ids: vec![id],
        }),
        Criterion::Location { id: 0 } => Err(KeywordOptimizerError::Criteria(
            "location criterion needs a non-zero id".into(),
        )),
        Criterion::Location { id } => Ok(SearchParameter::Location {
            location_ids: vec![id],
        }),
        Criterion::Network {
            google_search: false,
            search_network: false,
        } => Err(KeywordOptimizerError::Criteria(
            "network criterion must target at least one network".into(),
        )),
        Criterion::Network {
            google_search,
            search_network,
        } => Ok(SearchParameter::Network {
            target_google_search: google_search,
            target_search_network: search_network,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kwopt_common::{CampaignConfiguration, MatchType};
    use serde_json::json;

    fn seeds(texts: &[&str], campaign: CampaignConfiguration) -> SeedSet {
        SeedSet::new(campaign, texts.iter().copied(), [MatchType::Exact])
    }

    #[test]
    fn related_query_comes_first_then_criteria_in_order() {
        let campaign = CampaignConfiguration::default()
            .with_criterion(Criterion::Location { id: 2840 })
            .with_criterion(Criterion::Language { id: 1000 });
        let selector = build_selector(&seeds(&["shoe", "boot"], campaign)).unwrap();

        assert_eq!(selector.request_type, RequestType::Ideas);
        assert_eq!(selector.idea_type, IdeaType::Keyword);
        assert_eq!(selector.requested_attribute_types, REQUESTED_ATTRIBUTE_KINDS.to_vec());
        assert_eq!(
            selector.search_parameters,
            vec![
                SearchParameter::RelatedToQuery {
                    queries: vec!["boot".into(), "shoe".into()]
                },
                SearchParameter::Location {
                    location_ids: vec![2840]
                },
                SearchParameter::Language {
                    language_ids: vec![1000]
                },
            ]
        );
        assert!(selector.paging.is_none());
    }

    #[test]
    fn empty_seed_set_builds_an_empty_related_query() {
        let selector = build_selector(&seeds(&[], CampaignConfiguration::default())).unwrap();
        assert_eq!(
            selector.search_parameters,
            vec![SearchParameter::RelatedToQuery { queries: vec![] }]
        );
    }

    #[test]
    fn untranslatable_criteria_fail_the_build() {
        let campaign = CampaignConfiguration::default().with_criterion(Criterion::Network {
            google_search: false,
            search_network: false,
        });
        let err = build_selector(&seeds(&["shoe"], campaign)).unwrap_err();
        assert!(matches!(err, KeywordOptimizerError::Criteria(_)));

        let err = to_search_parameters(&[Criterion::Language { id: 0 }]).unwrap_err();
        assert!(err.to_string().contains("non-zero"));
    }

    #[test]
    fn serializes_in_wire_shape() {
        let mut selector = build_selector(&seeds(
            &["shoe"],
            CampaignConfiguration::default().with_criterion(Criterion::Network {
                google_search: true,
                search_network: false,
            }),
        ))
        .unwrap();
        selector.set_paging(200, 100);

        assert_eq!(
            serde_json::to_value(&selector).unwrap(),
            json!({
                "requestType": "IDEAS",
                "ideaType": "KEYWORD",
                "requestedAttributeTypes": [
                    "KEYWORD_TEXT", "SEARCH_VOLUME", "AVERAGE_CPC", "COMPETITION",
                    "TARGETED_MONTHLY_SEARCHES"
                ],
                "searchParameters": [
                    {"type": "RELATED_TO_QUERY", "queries": ["shoe"]},
                    {"type": "NETWORK", "targetGoogleSearch": true, "targetSearchNetwork": false}
                ],
                "paging": {"startIndex": 200, "numberResults": 100}
            })
        );
    }
}
