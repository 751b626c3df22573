use crate::prelude::{println, *};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use subdash_core::columns::ColumnId;
use subdash_core::field::FieldPath;
use subdash_core::filter::StatusFilter;
use subdash_core::pagination::PageSize;
use subdash_core::session::{Action, TableView};
use subdash_core::EngineError;

use crate::api::{load_session, ready_view};

/// Options for listing subscribers
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
#[command(after_help = "EXAMPLES:
  # First page of every subscriber:
  subdash list

  # Active subscribers from one source/channel group, most opens first:
  subdash list --status active --source twitter/social --sort opens --desc

  # Subscribers without UTM data:
  subdash list --source -/-

  # Last page, 50 per page, without the click columns:
  subdash list --per-page 50 --last --hide total_clicks --hide unique_clicks

NOTES:
  - --sort accepts a column id (see `subdash columns`) or a field key such as stats.open_rate
  - --source may be repeated; `all` clears the selection
  - Changing filters or page size starts again from page 1
  - Pages past the end are clamped to the last page")]
pub struct ListOptions {
    /// Status filter: all, active, inactive
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,

    /// Source/channel group to include, as "<source>/<channel>" (repeatable)
    #[arg(long = "source", value_name = "SOURCE/CHANNEL")]
    pub sources: Vec<String>,

    /// Column id or field key to sort by
    #[arg(long, value_parser = parse_sort_key)]
    pub sort: Option<FieldPath>,

    /// Sort descending (flips the direction of --sort)
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Number of subscribers per page: 10, 25, 50, 100
    #[arg(long, env = "SUBDASH_PER_PAGE", default_value = "10", value_parser = parse_page_size)]
    pub per_page: PageSize,

    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1", conflicts_with = "last")]
    pub page: usize,

    /// Jump to the last page
    #[arg(long)]
    pub last: bool,

    /// Hide a column (repeatable)
    #[arg(long, value_name = "COLUMN")]
    pub hide: Vec<ColumnId>,

    /// Show a column hidden by default (repeatable)
    #[arg(long, value_name = "COLUMN")]
    pub show: Vec<ColumnId>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            status: StatusFilter::All,
            sources: Vec::new(),
            sort: None,
            desc: false,
            per_page: PageSize::default(),
            page: 1,
            last: false,
            hide: Vec::new(),
            show: Vec::new(),
            json: false,
        }
    }
}

/// Accepts a column id (`opens`) or a field key (`stats.open_rate`).
pub fn parse_sort_key(value: &str) -> std::result::Result<FieldPath, EngineError> {
    match value.parse::<ColumnId>() {
        Ok(column) => Ok(column.column().field),
        Err(_) => value.parse::<FieldPath>(),
    }
}

fn parse_page_size(value: &str) -> std::result::Result<PageSize, String> {
    let size = value
        .parse::<usize>()
        .map_err(|e| format!("Invalid page size {value}: {e}"))?;
    PageSize::try_from(size).map_err(|e| e.to_string())
}

/// Translate CLI flags into the session actions a user would have performed.
///
/// Filters go first because they reset the page; navigation goes last.
pub fn build_actions(options: &ListOptions) -> Vec<Action> {
    let mut actions = vec![Action::SetStatusFilter {
        status: options.status,
    }];

    actions.extend(
        options
            .sources
            .iter()
            .map(|key| Action::ToggleSourceChannel { key: key.clone() }),
    );

    let defaults = subdash_core::columns::ColumnVisibility::default();
    for column in &options.hide {
        if defaults.is_visible(*column) {
            actions.push(Action::ToggleColumn { column: *column });
        }
    }
    for column in &options.show {
        if !defaults.is_visible(*column) && !options.hide.contains(column) {
            actions.push(Action::ToggleColumn { column: *column });
        }
    }

    if let Some(field) = options.sort {
        actions.push(Action::SortBy { field });
        if options.desc {
            actions.push(Action::SortBy { field });
        }
    }

    actions.push(Action::SetItemsPerPage {
        size: options.per_page,
    });

    if options.last {
        actions.push(Action::LastPage);
    } else if options.page > 1 {
        actions.push(Action::GoToPage { page: options.page });
    }

    actions
}

pub async fn run(options: ListOptions, global: crate::Global) -> Result<()> {
    let config = global.api_config();
    if global.verbose {
        println!("Fetching subscribers from {}...", config.subscribers_url());
    }

    let view = list_data(&options, &config).await?;

    if options.json {
        println!("{}", format_list_json(&view)?);
    } else {
        print!("{}", format_list_text(&view, &options));
    }

    Ok(())
}

/// Fetch subscribers and compute the requested table view
pub async fn list_data(
    options: &ListOptions,
    config: &crate::config::ApiConfig,
) -> Result<TableView> {
    let mut session = load_session(config).await?;

    for action in build_actions(options) {
        log::debug!("applying {action:?}");
        session.apply(action);
    }

    ready_view(&session)
}

fn format_list_json(view: &TableView) -> Result<String> {
    serde_json::to_string_pretty(view).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

/// Build the subscriber table with prettytable
pub fn build_table(view: &TableView) -> prettytable::Table {
    use prettytable::{Cell, Row};

    let mut table = crate::prelude::new_table();

    table.set_titles(Row::new(
        view.headers
            .iter()
            .map(|h| Cell::new(&h.title()).style_spec("b"))
            .collect(),
    ));

    for row in &view.rows {
        let cells = view
            .headers
            .iter()
            .zip(&row.cells)
            .map(|(header, text)| match (header.column, text.as_str()) {
                (ColumnId::Status, "active") => Cell::new(text).style_spec("Fg"),
                (ColumnId::Status, _) => Cell::new(text).style_spec("Fr"),
                _ => Cell::new(text),
            })
            .collect();
        table.add_row(Row::new(cells));
    }

    table
}

/// Shell command reproducing `options` on another page
fn page_command(options: &ListOptions, page: usize) -> String {
    let mut parts = vec!["subdash list".to_string()];

    if options.status != StatusFilter::All {
        parts.push(format!("--status {}", options.status));
    }
    for source in &options.sources {
        parts.push(format!("--source {source}"));
    }
    if let Some(sort) = options.sort {
        parts.push(format!("--sort {sort}"));
        if options.desc {
            parts.push("--desc".to_string());
        }
    }
    if options.per_page != PageSize::default() {
        parts.push(format!("--per-page {}", options.per_page.get()));
    }
    for column in &options.hide {
        parts.push(format!("--hide {column}"));
    }
    for column in &options.show {
        parts.push(format!("--show {column}"));
    }
    parts.push(format!("--page {page}"));

    parts.join(" ")
}

/// Convert the table view to formatted text with colors
fn format_list_text(view: &TableView, options: &ListOptions) -> String {
    let mut result = String::new();
    let stats = &view.stats;

    // Header
    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!("{}\n", "SUBSCRIBER ANALYTICS".bright_cyan().bold()));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!(
        "{}: {} | {}: {} | {}: {}\n",
        "Total".green(),
        stats.total_subscribers.to_string().bright_white().bold(),
        "Active".green(),
        stats.active_subscribers.to_string().bright_white().bold(),
        "Clicked".green(),
        stats.clicked_label().bright_white().bold()
    ));
    result.push_str(&format!(
        "{}: {} | {}: {}\n\n",
        "Status".green(),
        options.status.to_string().bright_white(),
        "Sources".green(),
        view.source_label.bright_white()
    ));

    if view.rows.is_empty() {
        result.push_str(&format!("{}\n", "No subscribers match these filters.".yellow()));
    } else {
        result.push_str(&build_table(view).to_string());
    }

    // Navigation section
    let page = &view.page;
    result.push_str(&format!("\n{}\n", page.range.to_string().bright_white()));
    result.push_str(&format!(
        "{} {} {} {} ({} {})\n",
        "Page".bright_white(),
        page.current_page.to_string().bright_cyan().bold(),
        "of".bright_white(),
        page.total_pages.to_string().bright_cyan().bold(),
        page.items_per_page.to_string().bright_cyan(),
        "per page".bright_white()
    ));

    if page.can_go_back || page.can_go_forward {
        result.push_str(&format!("\n{}:\n", "To navigate".bright_white().bold()));
    }
    if page.can_go_back {
        result.push_str(&format!(
            "  {}: {}\n",
            "First page".green(),
            page_command(options, 1).cyan()
        ));
        result.push_str(&format!(
            "  {}: {}\n",
            "Previous page".green(),
            page_command(options, page.current_page - 1).cyan()
        ));
    }
    if page.can_go_forward {
        result.push_str(&format!(
            "  {}: {}\n",
            "Next page".green(),
            page_command(options, page.current_page + 1).cyan()
        ));
        result.push_str(&format!(
            "  {}: {}\n",
            "Last page".green(),
            page_command(options, page.total_pages).cyan()
        ));
    }

    result.push('\n');
    result
}
