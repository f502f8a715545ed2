use std::io::Write;

use simplecsv_api::{CsvError, RowSink};
use simplecsv_codec::CsvDecoder;

use super::config::Effective;
use super::error::CliError;
use super::open_input;

/// Счётчик событий без хранения данных.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub rows: u64,
    pub cells: u64,
    pub absent: u64,
    /// Самая длинная строка в ячейках.
    pub max_width: u64,
    current: u64,
}

impl RowSink for Stats {
    fn begin_row(&mut self) -> Result<(), CsvError> {
        self.current = 0;
        Ok(())
    }

    fn cell(&mut self, data: Option<&[u8]>) -> Result<(), CsvError> {
        self.cells += 1;
        self.current += 1;
        if data.is_none() {
            self.absent += 1;
        }
        Ok(())
    }

    fn end_row(&mut self) -> Result<(), CsvError> {
        self.rows += 1;
        self.max_width = self.max_width.max(self.current);
        Ok(())
    }
}

/// Проверить, что вход разбирается целиком. Ошибка разбора возвращается
/// как есть, вместе с позицией.
pub fn run(eff: &Effective, path: &str, out: &mut dyn Write) -> Result<Stats, CliError> {
    let input = open_input(path)?;
    let mut decoder = CsvDecoder::with_dialect(Stats::default(), eff.input);
    if let Err(e) = decoder.decode_reader(input) {
        tracing::info!(file = %path, position = %decoder.position(), "check failed");
        return Err(e.into());
    }

    let stats = decoder.into_sink();
    writeln!(
        out,
        "ok: {} rows, {} cells ({} absent), max width {}",
        stats.rows, stats.cells, stats.absent, stats.max_width
    )?;
    Ok(stats)
}
