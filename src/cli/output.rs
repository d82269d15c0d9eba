//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use std::io::{self, Write};

use chrono::Local;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use console::style;

use crate::vault::ServiceRecord;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim hint to stderr, shown after an error: "arrow {msg}"
pub fn tip(msg: &str) {
    eprintln!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Render one service as a panel: name on top, description and codes
/// in the body, date added at the bottom.
pub fn render_service(record: &ServiceRecord) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new(record.service_name()).add_attribute(Attribute::Bold)
    ]);

    if let Some(description) = record.description() {
        table.add_row(vec![Cell::new(description).add_attribute(Attribute::Bold)]);
    }
    table.add_row(vec![Cell::new(record.decrypted_payload())]);

    let added = record.date_added().with_timezone(&Local);
    table.add_row(vec![Cell::new(format!(
        "Added on: {}",
        added.format("%d/%m/%Y")
    ))
    .add_attribute(Attribute::Dim)]);

    table
}

/// Write every service panel to `out`, separated by blank lines.
pub fn print_services<W: Write>(out: &mut W, records: &[ServiceRecord]) -> io::Result<()> {
    for record in records {
        writeln!(out)?;
        writeln!(out, "{}", render_service(record))?;
    }
    out.flush()
}
