use std::io::Write;

use simplecsv_codec::{CsvDecoder, CsvEncoder};
use simplecsv_table::Table;

use super::config::Effective;
use super::error::CliError;
use super::open_input;

/// Перекодировать вход из диалекта `[input]` в диалект `[output]`.
///
/// Без `via_table` события идут из декодера прямо в энкодер. С ним вход
/// сначала собирается в [`Table`] и записывается из неё (заголовок, если
/// включён, сохраняется первой строкой).
pub fn run(eff: &Effective, path: &str, via_table: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let input = open_input(path)?;
    let mut encoder = CsvEncoder::with_dialect(out, eff.output);

    if via_table {
        let table = Table::from_reader(input, eff.input, eff.header)?;
        tracing::info!(rows = table.len(), width = table.width(), "table loaded");
        table.write(&mut encoder, eff.header)?;
    } else {
        let mut decoder = CsvDecoder::with_dialect(&mut encoder, eff.input);
        decoder.decode_reader(input)?;
    }

    encoder.flush()?;
    Ok(())
}
