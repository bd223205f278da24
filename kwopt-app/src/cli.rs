//! Command line arguments for `kwopt`.
use clap::Parser;
use kwopt_common::MatchType;
use kwopt_config::SeedConfig;
use std::path::PathBuf;

/// Derive alternative keywords from seed keywords via the keyword idea service
#[derive(Parser, Debug, Clone)]
#[command(name = "kwopt")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct KwoptArgs {
    /// Configuration file
    #[arg(short, long, env = "KWOPT_CONFIG", default_value = "kwopt.yaml")]
    pub config: PathBuf,

    /// Seed keyword text, added to the configured seeds (repeatable)
    #[arg(short, long = "seed")]
    pub seeds: Vec<String>,

    /// Match type to expand into; replaces the configured list when given (repeatable)
    #[arg(short, long = "match-type")]
    pub match_types: Vec<MatchType>,

    /// Also write logs to stderr
    #[arg(long)]
    pub log_stderr: bool,
}

impl KwoptArgs {
    /// Merge CLI seeds over the configured ones.
    pub fn merge_seeds(&self, configured: &SeedConfig) -> SeedConfig {
        let mut keywords = configured.keywords.clone();
        keywords.extend(self.seeds.iter().cloned());
        let match_types = if self.match_types.is_empty() {
            configured.match_types.clone()
        } else {
            self.match_types.clone()
        };
        SeedConfig {
            keywords,
            match_types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> SeedConfig {
        SeedConfig {
            keywords: vec!["shoe".into()],
            match_types: vec![MatchType::Broad],
        }
    }

    #[test]
    fn cli_seeds_extend_and_match_types_replace() {
        let args = KwoptArgs::parse_from([
            "kwopt",
            "--seed",
            "boot",
            "--match-type",
            "exact",
            "--match-type",
            "PHRASE",
        ]);
        let merged = args.merge_seeds(&configured());
        assert_eq!(merged.keywords, vec!["shoe", "boot"]);
        assert_eq!(merged.match_types, vec![MatchType::Exact, MatchType::Phrase]);
    }

    #[test]
    fn configured_seeds_are_kept_without_flags() {
        let args = KwoptArgs::parse_from(["kwopt", "-c", "other.yaml"]);
        assert_eq!(args.config, PathBuf::from("other.yaml"));
        assert_eq!(args.merge_seeds(&configured()), configured());
    }

    #[test]
    fn unknown_match_type_is_rejected() {
        assert!(KwoptArgs::try_parse_from(["kwopt", "--match-type", "fuzzy"]).is_err());
    }
}
