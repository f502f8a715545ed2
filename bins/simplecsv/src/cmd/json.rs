use std::io::Write;

use simplecsv_table::Table;

use super::config::Effective;
use super::error::CliError;
use super::open_input;

/// Вывести каждую строку как JSON-объект (JSON Lines).
pub fn run(eff: &Effective, path: &str, out: &mut dyn Write) -> Result<(), CliError> {
    let input = open_input(path)?;
    let table = Table::from_reader(input, eff.input, eff.header)?;
    tracing::info!(rows = table.len(), columns = table.column_names().len(), "table loaded");

    for ridx in 0..table.len() {
        if let Some(value) = table.row_to_json(ridx) {
            serde_json::to_writer(&mut *out, &value)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
