//! Contract with the external keyword idea service and its HTTP client.
//!
//! The collector only sees [`IdeaService`]; [`HttpIdeaService`] is the
//! production implementation and tests substitute in-memory fakes.
use crate::attributes::AttributeEntry;
use crate::selector::IdeaSelector;
use async_trait::async_trait;
use kwopt_common::KeywordOptimizerError;
use kwopt_http::{Auth, HttpClient, HttpError, RequestOpts};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const IDEAS_PATH: &str = "v1/targetingIdeas:get";

/// One idea: an attribute bag in wire form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetingIdea {
    #[serde(default)]
    pub data: Vec<AttributeEntry>,
}

/// One page of results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaPage {
    /// Absent on empty result sets and sometimes on the final page.
    #[serde(default)]
    pub entries: Option<Vec<TargetingIdea>>,
    #[serde(default)]
    pub total_num_entries: u32,
}

/// Failure surfaced by an [`IdeaService`].
#[derive(Debug, thiserror::Error)]
pub enum IdeaServiceError {
    /// The service answered and rejected the request (bad parameters, quota,
    /// auth, ...).
    #[error("{message}")]
    Api { message: String, status: Option<u16> },

    /// The call could not be completed.
    #[error(transparent)]
    Transport(HttpError),
}

impl From<HttpError> for IdeaServiceError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::Api {
                status, message, ..
            } => IdeaServiceError::Api {
                message,
                status: Some(status.as_u16()),
            },
            other => IdeaServiceError::Transport(other),
        }
    }
}

/// Application failures keep the service's message; transport failures get
/// the fixed connectivity message. Both keep the original as their source.
impl From<IdeaServiceError> for KeywordOptimizerError {
    fn from(e: IdeaServiceError) -> Self {
        match e {
            IdeaServiceError::Api { .. } => KeywordOptimizerError::Service {
                message: e.to_string(),
                source: Box::new(e),
            },
            IdeaServiceError::Transport(_) => KeywordOptimizerError::Connection {
                source: Box::new(e),
            },
        }
    }
}

#[async_trait]
pub trait IdeaService: Send + Sync {
    /// Fetch the page described by `selector`, including its paging window.
    async fn get(&self, selector: &IdeaSelector) -> Result<IdeaPage, IdeaServiceError>;
}

/// [`IdeaService`] over JSON/HTTP with bearer authentication.
///
/// Transport retries are disabled: a failed page fails the retrieval.
#[derive(Clone)]
pub struct HttpIdeaService {
    http: HttpClient,
    auth_token: String,
}

impl HttpIdeaService {
    pub fn new(endpoint: &str, auth_token: impl Into<String>) -> Result<Self, HttpError> {
        let base = if endpoint.ends_with('/') {
            endpoint.to_string()
        } else {
            format!("{endpoint}/")
        };
        Ok(Self {
            http: HttpClient::new(&base)?.with_retries(0),
            auth_token: auth_token.into(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }
}

#[async_trait]
impl IdeaService for HttpIdeaService {
    async fn get(&self, selector: &IdeaSelector) -> Result<IdeaPage, IdeaServiceError> {
        let page: IdeaPage = self
            .http
            .post_json(
                IDEAS_PATH,
                selector,
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.auth_token)),
                    retries: Some(0),
                    ..Default::default()
                },
            )
            .await?;
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kwopt_http::StatusCode;

    #[test]
    fn api_failures_stay_application_level() {
        let err = IdeaServiceError::from(HttpError::Api {
            status: StatusCode::FORBIDDEN,
            message: "quota exhausted".into(),
            request_id: "-".into(),
        });
        assert!(matches!(
            err,
            IdeaServiceError::Api { ref message, status: Some(403) } if message == "quota exhausted"
        ));
    }

    #[test]
    fn everything_else_is_transport() {
        let err = IdeaServiceError::from(HttpError::Network("connection refused".into()));
        assert!(matches!(err, IdeaServiceError::Transport(HttpError::Network(_))));
        assert_eq!(err.to_string(), "network error: connection refused");
    }

    #[test]
    fn page_with_an_unrecognized_attribute_type_still_decodes() {
        let raw = r#"{
            "entries": [{"data": [
                {"key": "KEYWORD_TEXT", "value": {"type": "STRING", "value": "trail shoes"}},
                {"key": "IDEA_TYPE", "value": {"type": "IDEA_TYPE", "value": "KEYWORD"}}
            ]}],
            "totalNumEntries": 1
        }"#;
        let page: IdeaPage = serde_json::from_str(raw).unwrap();
        let entries = page.entries.unwrap();
        let (text, _) = crate::attributes::decode_idea(&entries[0]).unwrap();
        assert_eq!(text, "trail shoes");
    }

    #[test]
    fn missing_entries_decode_as_none() {
        let page: IdeaPage = serde_json::from_str(r#"{"totalNumEntries": 0}"#).unwrap();
        assert!(page.entries.is_none());
        assert_eq!(page.total_num_entries, 0);
    }
}
