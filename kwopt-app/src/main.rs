use anyhow::{Context, Result};
use clap::Parser;
use kwopt_common::observability::init_logging;
use kwopt_config::{KwoptConfig, KwoptConfigLoader};
use kwopt_ideas::{AlternativesFinder, HttpIdeaService, IdeaAlternativesFinder, SeedSet};

mod cli;
use cli::KwoptArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let args = KwoptArgs::parse();

    // 1) Load config (env wins over the file)
    let mut cfg: KwoptConfig = KwoptConfigLoader::new()
        .with_file(&args.config)
        .load()
        .with_context(|| format!("loading {}", args.config.display()))?;

    // 2) Logging
    cfg.logging.emit_stderr |= args.log_stderr;
    let log_path = init_logging(cfg.logging.clone())?;
    tracing::info!(config = %args.config.display(), log = %log_path.display(), "kwopt.start");

    // 3) Wire the finder
    let service = HttpIdeaService::new(&cfg.service.endpoint, cfg.service.auth_token.clone())
        .context("building the keyword idea service client")?
        .with_timeout(cfg.service.timeout());
    let finder = IdeaAlternativesFinder::new(service);

    let seeds = args.merge_seeds(&cfg.seeds);
    let seed_set = SeedSet::new(cfg.campaign, seeds.keywords, seeds.match_types);

    // 4) Derive and print
    let alternatives = finder.derive(&seed_set).await.map_err(|e| {
        tracing::error!(error = %e, "kwopt.derive.failed");
        e
    })?;
    println!("{}", serde_json::to_string_pretty(&alternatives)?);
    tracing::info!(records = alternatives.len(), "kwopt.done");
    Ok(())
}
