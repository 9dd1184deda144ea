use anyhow::Result;
use clap::Parser;
use timeline_common::observability::{LogConfig, init_logging};
use timeline_config::{TimelineConfig, TimelineConfigLoader};

mod cli;
mod pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    // 1) Load config (env wins over the file)
    let mut cfg: TimelineConfig = TimelineConfigLoader::new()
        .with_file(&args.config)
        .load()?;
    if let Some(account) = &args.account {
        cfg.account = account.clone();
    }

    let log_path = init_logging(LogConfig::with_debug(cfg.debug))?;
    tracing::debug!(log = %log_path.display(), "logging initialised");

    let output = pipeline::run(&cfg, &args).await?;
    println!("{output}");
    Ok(())
}
