use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use timeline_config::TimelineConfig;
use timeline_social::TimelineFetcher;
use timeline_social::twitter::TwitterApi;
use timeline_stats::Report;
use timeline_store::{CacheLoader, SnapshotStore};

use crate::cli::Args;

/// Wire the Twitter client, fetcher and snapshot store from configuration.
pub fn build_loader(cfg: &TimelineConfig) -> Result<CacheLoader<TwitterApi>> {
    let api = TwitterApi::with_base(&cfg.twitter.api_base, cfg.twitter.bearer_token.clone())
        .context("building twitter client")?;
    let fetcher = TimelineFetcher::new(api)
        .with_page_size(cfg.twitter.page_size)
        .with_history_limit(cfg.twitter.history_limit);
    Ok(CacheLoader::new(fetcher, SnapshotStore::new(cfg.snapshot_path())))
}

/// Load posts, build the report, optionally persist it, and return the text to print.
pub async fn run(cfg: &TimelineConfig, args: &Args) -> Result<String> {
    let loader = build_loader(cfg)?;
    let (table, source) = loader
        .load_with_source(&cfg.account, args.reload)
        .await
        .with_context(|| format!("loading posts of {}", cfg.account))?;
    tracing::info!(account = %cfg.account, posts = table.len(), ?source, "posts loaded");

    let report = Report::build(&cfg.account, &table);

    if let Some(name) = &args.output {
        let path = write_report(&cfg.project_dir(), name, &report)?;
        tracing::info!(path = %path.display(), "report written");
    }

    if args.json {
        Ok(report.to_json()?)
    } else {
        Ok(report.render_text())
    }
}

/// Write the JSON report to `name`, relative names landing in `project_dir`.
pub fn write_report(project_dir: &Path, name: &Path, report: &Report) -> Result<PathBuf> {
    let path = project_dir.join(name);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    std::fs::write(&path, report.to_json()?)
        .with_context(|| format!("writing report to {}", path.display()))?;
    Ok(path)
}
