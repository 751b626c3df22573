use crate::prelude::{println, *};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use subdash_core::model::DashboardStats;

use crate::api::{load_session, ready_view};

/// Options for the stats command
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct StatsOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: StatsOptions, global: crate::Global) -> Result<()> {
    let config = global.api_config();
    if global.verbose {
        println!("Fetching subscribers from {}...", config.subscribers_url());
    }

    let session = load_session(&config).await?;
    let stats = ready_view(&session)?.stats;

    if options.json {
        let json = serde_json::to_string_pretty(&stats)
            .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
        println!("{}", json);
    } else {
        print!("{}", format_stats_text(&stats));
    }

    Ok(())
}

fn format_stats_text(stats: &DashboardStats) -> String {
    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::row![b->"Total Subscribers", stats.total_subscribers]);
    table.add_row(prettytable::row![b->"Active Subscribers", stats.active_subscribers]);
    table.add_row(prettytable::row![b->"Inactive Subscribers", stats.inactive_subscribers]);
    table.add_row(prettytable::row![b->"Subscribers Who Clicked", stats.clicked_label()]);

    format!(
        "\n{}\n{}\n",
        "SUBSCRIBER ANALYTICS".bright_cyan().bold(),
        table
    )
}
