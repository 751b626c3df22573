use crate::prelude::*;
use subdash_core::columns::{ColumnVisibility, COLUMNS};

/// Print the column registry in display order
pub fn run() -> Result<()> {
    format_columns_table().printstd();
    Ok(())
}

fn format_columns_table() -> prettytable::Table {
    let defaults = ColumnVisibility::default();

    let mut table = crate::prelude::new_table();
    table.set_titles(prettytable::row![b->"Id", b->"Label", b->"Sort key", b->"Width", b->"Default"]);

    for column in COLUMNS.iter() {
        let visible = if defaults.is_visible(column.id) {
            "shown"
        } else {
            "hidden"
        };
        table.add_row(prettytable::row![
            column.id,
            column.label,
            column.field,
            format!("{}%", column.width),
            visible
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_table_lists_registry() {
        let text = format_columns_table().to_string();

        assert!(text.contains("source_channel"));
        assert!(text.contains("stats.open_rate"));
        assert!(text.contains("Days to Unsubscribe"));
        assert!(text.contains("hidden"));
        assert_eq!(format_columns_table().len(), COLUMNS.len());
    }
}
