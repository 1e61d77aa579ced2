pub mod init;
pub mod run;

use std::path::{Path, PathBuf};

use clap::Subcommand;

use coauthor_core::config::DEFAULT_CONFIG_FILE;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a starter configuration file
    Init(init::InitArgs),
    /// Collect articles, build the co-authorship graph and render it
    Run(run::RunArgs),
}

pub async fn run(cmd: Command, quiet: bool) -> anyhow::Result<()> {
    match cmd {
        Command::Init(args) => init::run(args, quiet),
        Command::Run(args) => run::run(args, quiet).await,
    }
}

/// Config file to use: the explicit path, or `coauthor.toml` in `dir`.
pub fn resolve_config_path(explicit: Option<&Path>, dir: &Path) -> PathBuf {
    explicit.map_or_else(|| dir.join(DEFAULT_CONFIG_FILE), Path::to_path_buf)
}
