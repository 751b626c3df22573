/// Errors raised while parsing engine inputs (field keys, column ids, page sizes).
///
/// The engines themselves never fail: missing record data is defaulted and
/// out-of-range pages are clamped.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Unknown column: {0}. Valid columns: {1}")]
    UnknownColumn(String, String),

    #[error("Invalid page size: {0}. Allowed sizes: 10, 25, 50, 100")]
    InvalidPageSize(usize),

    #[error("Invalid status filter: {0}. Valid values: all, active, inactive")]
    InvalidStatusFilter(String),

    #[error("Invalid sort direction: {0}. Valid values: asc, desc")]
    InvalidSortDirection(String),
}
