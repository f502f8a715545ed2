use simplecsv_api::{CsvError, RowSink};

use crate::table::Table;
use crate::value::Value;

/// `RowSink`, складывающий декодированные строки в [`Table`].
///
/// Ячейки раскладываются по позиции: индекс колонки сбрасывается на 0
/// в `begin_row` и растёт с каждым `cell`. Отсутствующие ячейки остаются
/// незаданными.
pub struct TableBuilder<'a> {
    table: &'a mut Table,
    row: Option<usize>,
    cidx: usize,
    /// `Some`, пока первая строка ещё собирается как заголовок.
    header: Option<Vec<String>>,
}

impl<'a> TableBuilder<'a> {
    pub fn new(table: &'a mut Table) -> Self {
        Self::with_header_mode(table, false)
    }

    /// Первая строка станет именами колонок, а не данными.
    pub fn with_header(table: &'a mut Table) -> Self {
        Self::with_header_mode(table, true)
    }

    pub fn with_header_mode(table: &'a mut Table, header: bool) -> Self {
        Self {
            table,
            row: None,
            cidx: 0,
            header: header.then(Vec::new),
        }
    }
}

impl RowSink for TableBuilder<'_> {
    fn begin_row(&mut self) -> Result<(), CsvError> {
        if let Some(names) = &mut self.header {
            names.clear();
            return Ok(());
        }
        self.row = Some(self.table.push_row());
        self.cidx = 0;
        Ok(())
    }

    fn cell(&mut self, data: Option<&[u8]>) -> Result<(), CsvError> {
        if let Some(names) = &mut self.header {
            names.push(data.map(|b| String::from_utf8_lossy(b).into_owned()).unwrap_or_default());
            return Ok(());
        }
        let ridx = self
            .row
            .ok_or_else(|| CsvError::Sink("cell outside of row".into()))?;
        if let Some(bytes) = data {
            self.table.set_cell(ridx, self.cidx, Some(Value::from(bytes)));
        }
        self.cidx += 1;
        Ok(())
    }

    fn end_row(&mut self) -> Result<(), CsvError> {
        if let Some(names) = self.header.take() {
            tracing::debug!(columns = names.len(), "header captured");
            self.table.set_header(names);
        }
        self.row = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simplecsv_codec::CsvDecoder;

    #[test]
    fn rows_are_filled_positionally() {
        let mut table = Table::new();
        CsvDecoder::new(TableBuilder::new(&mut table))
            .decode(b"a,,c\n\nd\n")
            .unwrap();

        assert_eq!(table.len(), 3);
        let first = table.row(0).unwrap();
        assert_eq!(first.len(), 3);
        assert!(first.get(1).is_none());
        assert_eq!(first.get(2).map(Value::as_bytes), Some(&b"c"[..]));
        assert!(table.row(1).is_some_and(|r| r.is_empty()));
        assert!(table.column_names().is_empty());
    }

    #[test]
    fn header_row_is_not_data() {
        let mut table = Table::new();
        CsvDecoder::new(TableBuilder::with_header(&mut table))
            .decode(b"x,,z\n1,2,3\n")
            .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.column_names(), &["x", "", "z"]);
        assert_eq!(table.column_index("Z"), Some(2));
    }

    #[test]
    fn header_only_input_gives_empty_table() {
        let mut table = Table::new();
        CsvDecoder::new(TableBuilder::with_header(&mut table))
            .decode(b"a,b")
            .unwrap();

        assert!(table.is_empty());
        assert_eq!(table.column_names(), &["a", "b"]);
    }

    #[test]
    fn cell_without_row_is_a_sink_error() {
        let mut table = Table::new();
        let mut builder = TableBuilder::new(&mut table);
        let err = builder.cell(Some(b"x")).unwrap_err();
        assert!(matches!(err, CsvError::Sink(_)));
    }
}
