use crate::prelude::*;
use clap::Parser;

mod api;
mod columns;
mod config;
mod error;
mod list;
mod prelude;
mod sources;
mod stats;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Sort, filter and paginate newsletter subscribers from the terminal"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Base URL of the subscribers API
    #[clap(long, env = "SUBDASH_API_URL", global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[clap(long, env = "SUBDASH_TIMEOUT", global = true)]
    timeout: Option<u64>,

    /// Whether to display additional information.
    #[clap(long, env = "SUBDASH_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

impl Global {
    /// API configuration with CLI flags taking precedence over the environment
    pub fn api_config(&self) -> crate::config::ApiConfig {
        crate::config::ApiConfig::from_env().with_overrides(self.api_url.clone(), self.timeout)
    }
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// List subscribers with filters, sorting, paging and column selection
    List(crate::list::ListOptions),

    /// Show aggregate subscriber statistics
    Stats(crate::stats::StatsOptions),

    /// List source/channel groups available for filtering
    Sources(crate::sources::SourcesOptions),

    /// List table columns and their default visibility
    Columns,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::List(options) => crate::list::run(options, app.global).await,
        SubCommands::Stats(options) => crate::stats::run(options, app.global).await,
        SubCommands::Sources(options) => crate::sources::run(options, app.global).await,
        SubCommands::Columns => crate::columns::run(),
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
