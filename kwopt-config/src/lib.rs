//! Loader for `kwopt.yaml` with environment overlays.
//!
//! Sources are merged in the order they are added; `KWOPT__`-prefixed
//! environment variables are applied last (`KWOPT__SERVICE__AUTH_TOKEN`
//! overrides `service.auth_token`). Environment values stay strings, so an
//! all-digit token keeps its leading zeros; numeric fields parse them. After
//! merging, `${VAR}` placeholders in any string are expanded from the process
//! environment.
//!
//! ```yaml
//! version: "1"
//! service:
//!   endpoint: "https://ideas.example.com"
//!   auth_token: "${KWOPT_TOKEN}"
//!   timeout_secs: 30
//! campaign:
//!   additional_criteria:
//!     - kind: language
//!       id: 1000
//!     - kind: network
//!       google_search: true
//! seeds:
//!   keywords: ["running shoes"]
//!   match_types: [EXACT, BROAD]
//! logging:
//!   format: json
//!   emit_stderr: true
//! ```
use config::{Config, ConfigError, Environment, File};
use kwopt_common::observability::LogConfig;
use kwopt_common::{CampaignConfiguration, MatchType};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "KWOPT";

#[derive(Debug, Clone, Deserialize)]
pub struct KwoptConfig {
    pub version: Option<String>,
    pub service: ServiceConfig,
    #[serde(default)]
    pub campaign: CampaignConfiguration,
    #[serde(default)]
    pub seeds: SeedConfig,
    #[serde(default)]
    pub logging: LogConfig,
}

/// Where the keyword idea service lives and how to authenticate.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(deserialize_with = "lenient_string")]
    pub endpoint: String,
    #[serde(deserialize_with = "lenient_string")]
    pub auth_token: String,
    #[serde(default = "default_timeout_secs", deserialize_with = "lenient_u64")]
    pub timeout_secs: u64,
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedConfig {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_match_types")]
    pub match_types: Vec<MatchType>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            match_types: default_match_types(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_match_types() -> Vec<MatchType> {
    vec![MatchType::Broad]
}

/// Accepts a string or a bare YAML number for string fields.
fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string, found {other}"
        ))),
    }
}

/// Accepts a number or a numeric string, as environment values arrive.
fn lenient_u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    match Value::deserialize(d)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("expected an unsigned integer, found {n}"))),
        Value::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        other => Err(serde::de::Error::custom(format!(
            "expected an unsigned integer, found {other}"
        ))),
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) if s.contains('$') => {
            let mut cur = std::mem::take(s);
            for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                let expanded =
                    shellexpand::env_with_context_no_errors(&cur, |name| std::env::var(name).ok())
                        .into_owned();
                if expanded == cur {
                    break;
                }
                cur = expanded;
            }
            *s = cur;
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

fn validate(cfg: &KwoptConfig) -> Result<(), ConfigError> {
    if cfg.service.endpoint.trim().is_empty() {
        return Err(ConfigError::Message("service.endpoint must not be empty".into()));
    }
    let token = cfg.service.auth_token.trim();
    if token.is_empty() || token.contains("${") {
        return Err(ConfigError::Message(
            "service.auth_token is empty or references an unset variable".into(),
        ));
    }
    if cfg.seeds.match_types.is_empty() {
        return Err(ConfigError::Message(
            "seeds.match_types needs at least one match type".into(),
        ));
    }
    Ok(())
}

/// Builder over the `config` crate wiring.
pub struct KwoptConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for KwoptConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl KwoptConfigLoader {
    /// ```
    /// use kwopt_config::KwoptConfigLoader;
    ///
    /// let config = KwoptConfigLoader::new()
    ///     .with_yaml_str("service:\n  endpoint: http://localhost:8080\n  auth_token: t")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.service.timeout_secs, 30);
    /// assert!(config.seeds.keywords.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent, e.g. a per-user override.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge all sources plus the environment and deserialize.
    ///
    /// ```
    /// use kwopt_common::{Criterion, MatchType};
    /// use kwopt_config::KwoptConfigLoader;
    ///
    /// unsafe { std::env::set_var("DOC_IDEAS_TOKEN", "from-env"); }
    ///
    /// let config = KwoptConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// service:
    ///   endpoint: "https://ideas.example.com"
    ///   auth_token: "${DOC_IDEAS_TOKEN}"
    /// campaign:
    ///   additional_criteria:
    ///     - kind: location
    ///       id: 2840
    /// seeds:
    ///   match_types: [EXACT, PHRASE]
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.service.auth_token, "from-env");
    /// assert_eq!(config.campaign.additional_criteria, vec![Criterion::Location { id: 2840 }]);
    /// assert_eq!(config.seeds.match_types, vec![MatchType::Exact, MatchType::Phrase]);
    ///
    /// unsafe { std::env::remove_var("DOC_IDEAS_TOKEN"); }
    /// ```
    pub fn load(self) -> Result<KwoptConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("seeds.keywords")
                    .with_list_parse_key("seeds.match_types"),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: KwoptConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        validate(&typed)?;
        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_nested_placeholders() {
        temp_env::with_vars([("REGION", Some("us")), ("HOST", Some("ideas-${REGION}"))], || {
            let mut v = json!({"endpoint": "https://${HOST}.example.com", "ids": ["$REGION", 7]});
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!({"endpoint": "https://ideas-us.example.com", "ids": ["us", 7]})
            );
        });
    }

    #[test]
    fn known_vars_expand_next_to_unknown_ones() {
        temp_env::with_var("KWOPT_KNOWN_REGION", Some("eu"), || {
            let mut v = json!("${KWOPT_KNOWN_REGION}-${KWOPT_DOES_NOT_EXIST}");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("eu-${KWOPT_DOES_NOT_EXIST}"));
        });
    }

    #[test]
    fn cycles_terminate() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}");
            expand_env_in_value(&mut v);
            assert!(v.as_str().unwrap().starts_with("x="));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("token-${KWOPT_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("token-${KWOPT_DOES_NOT_EXIST}"));
    }

    #[test]
    fn unresolved_token_fails_validation() {
        let err = KwoptConfigLoader::new()
            .with_yaml_str(
                "service:\n  endpoint: http://localhost\n  auth_token: \"${KWOPT_DOES_NOT_EXIST}\"",
            )
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("auth_token"));
    }

    #[test]
    fn missing_service_section_is_an_error() {
        assert!(KwoptConfigLoader::new().with_yaml_str("version: \"1\"").load().is_err());
    }
}
