pub use crate::error::Error;

pub use anstream::println;
pub use color_eyre::eyre::{eyre, Result};

pub fn new_table() -> prettytable::Table {
    let mut table = prettytable::Table::new();

    let format = prettytable::format::FormatBuilder::new()
        .column_separator('│')
        .padding(1, 1)
        .build();

    table.set_format(format);

    table
}
