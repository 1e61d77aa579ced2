use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use coauthor_core::config::CoauthorConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write `coauthor.toml` into (default: current directory)
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Target author to search for (repeatable)
    #[arg(short, long = "author")]
    pub authors: Vec<String>,

    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, quiet: bool) -> anyhow::Result<()> {
    std::fs::create_dir_all(&args.path)
        .with_context(|| format!("Cannot create directory: {}", args.path.display()))?;
    let config_path = super::resolve_config_path(None, &args.path);

    if config_path.exists() && !args.force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let mut config = CoauthorConfig::default();
    config.search.authors = args.authors;

    let text = config
        .to_toml()
        .context("Cannot serialize default config")?;
    std::fs::write(&config_path, text)
        .with_context(|| format!("Cannot write config: {}", config_path.display()))?;
    info!(path = %config_path.display(), "Config written");

    if !quiet {
        println!("Wrote {}", config_path.display());
        if config.search.authors.is_empty() {
            println!("Add target authors under [search] or pass --author to `coauthor run`.");
        } else {
            println!("Target authors: {}", config.search.authors.join(", "));
        }
    }

    Ok(())
}
