//! Dashboard session state
//!
//! One serializable struct owns everything the table needs: fetched data,
//! filters, sort, pagination, column visibility and the two dropdown menus.
//! Every user interaction goes through [`DashboardSession::apply`]; derived
//! rows are recomputed from scratch by [`DashboardSession::view`].

use crate::columns::{ColumnId, ColumnVisibility};
use crate::field::FieldPath;
use crate::filter::{filter_subscribers, source_channel_options, FilterState, StatusFilter};
use crate::model::{DashboardStats, Subscriber, SubscriberId, SubscribersResponse};
use crate::pagination::{PageRange, PageSize, Pagination};
use crate::sort::SortState;
use serde::{Deserialize, Serialize};

/// Message shown for any fetch failure
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch subscribers";

/// Transient open/closed state that closes on any interaction outside it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dropdown {
    open: bool,
}

impl Dropdown {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Report an interaction; closes when it lands outside the menu.
    pub fn interact(&mut self, inside: bool) {
        if self.open && !inside {
            self.open = false;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Menu {
    SourceChannels,
    Columns,
}

/// Fetched data lifecycle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    Loading,
    Ready {
        subscribers: Vec<Subscriber>,
        stats: DashboardStats,
    },
    Failed {
        message: String,
    },
}

/// Identifies one fetch; completions carrying an older ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Every user-facing control, expressed as an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    SetStatusFilter { status: StatusFilter },
    ToggleSourceChannel { key: String },
    SelectSourceChannel { key: String },
    ToggleColumn { column: ColumnId },
    SortBy { field: FieldPath },
    SetItemsPerPage { size: PageSize },
    GoToPage { page: usize },
    FirstPage,
    PreviousPage,
    NextPage,
    LastPage,
    ToggleMenu { menu: Menu },
    /// Pointer interaction; `inside` names the menu it landed in, if any.
    Interact { inside: Option<Menu> },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSession {
    pub load: LoadState,
    pub filters: FilterState,
    pub sort: SortState,
    pub pagination: Pagination,
    pub columns: ColumnVisibility,
    pub source_menu: Dropdown,
    pub column_menu: Dropdown,
    #[serde(skip)]
    generation: u64,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch. Only the most recent ticket can complete.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.load = LoadState::Loading;
        FetchTicket(self.generation)
    }

    /// Apply a fetch result. Returns `false` when the ticket is stale and the
    /// result was discarded.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<SubscribersResponse, String>,
    ) -> bool {
        if ticket.0 != self.generation {
            return false;
        }

        self.load = match result {
            Ok(response) => {
                let stats = DashboardStats::from_response(&response);
                LoadState::Ready {
                    subscribers: response.subscribers,
                    stats,
                }
            }
            Err(_) => LoadState::Failed {
                message: FETCH_ERROR_MESSAGE.to_string(),
            },
        };
        self.pagination.clamp(self.filtered_len());
        true
    }

    /// Invalidate any outstanding fetch (the view went away).
    pub fn detach(&mut self) {
        self.generation += 1;
        self.source_menu.close();
        self.column_menu.close();
    }

    pub fn subscribers(&self) -> &[Subscriber] {
        match &self.load {
            LoadState::Ready { subscribers, .. } => subscribers.as_slice(),
            _ => &[],
        }
    }

    fn filtered_len(&self) -> usize {
        filter_subscribers(self.subscribers(), &self.filters).len()
    }

    /// Single state-update entry point
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SetStatusFilter { status } => {
                self.filters.status = status;
                self.pagination.first();
            }
            Action::ToggleSourceChannel { key } => {
                self.filters.source_channels.toggle(&key);
                self.pagination.first();
            }
            Action::SelectSourceChannel { key } => {
                self.filters.source_channels.select_only(&key);
                self.pagination.first();
            }
            Action::ToggleColumn { column } => self.columns.toggle(column),
            Action::SortBy { field } => self.sort.sort_by(field),
            Action::SetItemsPerPage { size } => self.pagination.set_page_size(size),
            Action::GoToPage { page } => {
                let total = self.filtered_len();
                self.pagination.go_to(page, total);
            }
            Action::FirstPage => self.pagination.first(),
            Action::PreviousPage => self.pagination.previous(),
            Action::NextPage => {
                let total = self.filtered_len();
                self.pagination.next(total);
            }
            Action::LastPage => {
                let total = self.filtered_len();
                self.pagination.last(total);
            }
            // Pressing one menu's button lands outside the other menu.
            Action::ToggleMenu { menu } => {
                self.interact(Some(menu));
                self.menu_mut(menu).toggle();
            }
            Action::Interact { inside } => self.interact(inside),
        }
    }

    fn interact(&mut self, inside: Option<Menu>) {
        self.source_menu.interact(inside == Some(Menu::SourceChannels));
        self.column_menu.interact(inside == Some(Menu::Columns));
    }

    fn menu_mut(&mut self, menu: Menu) -> &mut Dropdown {
        match menu {
            Menu::SourceChannels => &mut self.source_menu,
            Menu::Columns => &mut self.column_menu,
        }
    }

    /// Recompute the rendered view: filter, sort, paginate, project.
    pub fn view(&self) -> DashboardView {
        let (subscribers, stats) = match &self.load {
            LoadState::Loading => return DashboardView::Loading,
            LoadState::Failed { message } => return DashboardView::Failed(message.clone()),
            LoadState::Ready { subscribers, stats } => (subscribers, stats),
        };

        let filtered = filter_subscribers(subscribers, &self.filters);
        let ordered = self.sort.apply(&filtered);
        let total_items = ordered.len();
        let pagination = self.pagination.clamped(total_items);
        let visible = self.columns.visible_columns();

        let headers = visible
            .iter()
            .map(|c| HeaderCell {
                column: c.id,
                label: c.label.to_string(),
                width: c.width,
                sort_indicator: self.sort.indicator_for(c.field),
            })
            .collect();

        let rows = pagination
            .window(&ordered)
            .iter()
            .map(|record| TableRow {
                key: record.id.clone(),
                cells: visible.iter().map(|c| c.render(record)).collect(),
            })
            .collect();

        let source_options = source_channel_options(subscribers)
            .into_iter()
            .map(|key| SourceOption {
                selected: self.filters.source_channels.is_selected(&key),
                key,
            })
            .collect();

        DashboardView::Ready(Box::new(TableView {
            stats: stats.clone(),
            headers,
            rows,
            page: PageInfo {
                current_page: pagination.current_page,
                total_pages: pagination.total_pages(total_items),
                items_per_page: pagination.items_per_page.get(),
                range: pagination.range(total_items),
                can_go_back: pagination.can_go_back(),
                can_go_forward: pagination.can_go_forward(total_items),
            },
            source_label: self.filters.source_channels.label(),
            source_options,
            column_options: crate::columns::COLUMNS
                .iter()
                .map(|c| ColumnOption {
                    column: c.id,
                    label: c.label.to_string(),
                    visible: self.columns.is_visible(c.id),
                })
                .collect(),
        }))
    }
}

/// What to draw for the current state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "view", rename_all = "snake_case")]
pub enum DashboardView {
    Loading,
    Failed(String),
    Ready(Box<TableView>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub stats: DashboardStats,
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<TableRow>,
    pub page: PageInfo,
    pub source_label: String,
    pub source_options: Vec<SourceOption>,
    pub column_options: Vec<ColumnOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderCell {
    pub column: ColumnId,
    pub label: String,
    pub width: u8,
    pub sort_indicator: Option<&'static str>,
}

impl HeaderCell {
    /// Label with the sort glyph appended for the active key
    pub fn title(&self) -> String {
        match self.sort_indicator {
            Some(glyph) => format!("{} {}", self.label, glyph),
            None => self.label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub key: SubscriberId,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub items_per_page: usize,
    pub range: PageRange,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceOption {
    pub key: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnOption {
    pub column: ColumnId,
    pub label: String,
    pub visible: bool,
}
