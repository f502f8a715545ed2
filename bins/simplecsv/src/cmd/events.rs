use std::io::Write;

use simplecsv_api::{CsvError, RowSink};
use simplecsv_codec::CsvDecoder;

use super::config::Effective;
use super::error::CliError;
use super::open_input;

/// Печатает события декодера построчно: `begin_row`, `"cell"`,
/// `(null)` для отсутствующей ячейки, `end_row`.
pub struct EventPrinter<W> {
    out: W,
}

impl<W: Write> EventPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RowSink for EventPrinter<W> {
    fn begin_row(&mut self) -> Result<(), CsvError> {
        writeln!(self.out, "begin_row")?;
        Ok(())
    }

    fn cell(&mut self, data: Option<&[u8]>) -> Result<(), CsvError> {
        match data {
            Some(bytes) => writeln!(self.out, "\"{}\"", bytes.escape_ascii())?,
            None => writeln!(self.out, "(null)")?,
        }
        Ok(())
    }

    fn end_row(&mut self) -> Result<(), CsvError> {
        writeln!(self.out, "end_row")?;
        Ok(())
    }
}

pub fn run(eff: &Effective, path: &str, out: &mut dyn Write) -> Result<(), CliError> {
    let input = open_input(path)?;
    let mut decoder = CsvDecoder::with_dialect(EventPrinter::new(out), eff.input);
    decoder.decode_reader(input)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::testutil::{input_file, path};
    use simplecsv_api::Dialect;

    fn eff() -> Effective {
        Effective {
            input: Dialect::default(),
            output: Dialect::default(),
            header: false,
        }
    }

    #[test]
    fn prints_every_event() {
        let file = input_file(b"a,,\"x\"\"y\"\n\n");
        let mut out = Vec::new();
        run(&eff(), path(&file), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "begin_row\n\"a\"\n(null)\n\"x\\\"y\"\nend_row\nbegin_row\nend_row\n"
        );
    }

    #[test]
    fn parse_error_stops_output() {
        let file = input_file(b"ok\nbad\"\nnever\n");
        let mut out = Vec::new();
        let err = run(&eff(), path(&file), &mut out).unwrap_err();

        assert!(err.to_string().contains("unexpected quote in unquoted string"));
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("begin_row\n\"ok\"\nend_row\nbegin_row\n"));
        assert!(!text.contains("never"));
    }

    #[test]
    fn missing_file_is_reported() {
        let mut out = Vec::new();
        let err = run(&eff(), "/nonexistent/input.csv", &mut out).unwrap_err();
        assert!(matches!(err, CliError::Input { .. }));
    }
}
