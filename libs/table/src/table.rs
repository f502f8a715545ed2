use std::collections::BTreeMap;
use std::io::Read;

use simplecsv_api::{CsvError, Dialect, RowSink};
use simplecsv_codec::CsvDecoder;

use crate::builder::TableBuilder;
use crate::nocase::NoCaseKey;
use crate::row::Row;
use crate::value::Value;

// ═══════════════════════════════════════════════════════════════
//  Table
// ═══════════════════════════════════════════════════════════════

/// Упорядоченный набор разреженных строк с регистронезависимым
/// индексом имён колонок.
///
/// Ширина таблицы не задаётся схемой: это последний когда-либо
/// заполненный индекс колонки + 1. Удаление ячеек и строк её не уменьшает.
#[derive(Debug, Clone, Default)]
pub struct Table {
    rows: Vec<Row>,
    columns: Vec<String>,
    index: BTreeMap<NoCaseKey, Vec<usize>>,
    width: usize,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Разобрать CSV целиком. При `header` первая строка становится
    /// именами колонок.
    pub fn parse(input: impl AsRef<[u8]>, dialect: Dialect, header: bool) -> Result<Self, CsvError> {
        let mut table = Self::new();
        let builder = TableBuilder::with_header_mode(&mut table, header);
        CsvDecoder::with_dialect(builder, dialect).decode(input.as_ref())?;
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R, dialect: Dialect, header: bool) -> Result<Self, CsvError> {
        let mut table = Self::new();
        let builder = TableBuilder::with_header_mode(&mut table, header);
        CsvDecoder::with_dialect(builder, dialect).decode_reader(reader)?;
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn row(&self, ridx: usize) -> Option<&Row> {
        self.rows.get(ridx)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Первая колонка с таким именем (без учёта регистра).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_indices(name).first().copied()
    }

    /// Все колонки с таким именем, по возрастанию индекса.
    pub fn column_indices(&self, name: &str) -> &[usize] {
        self.index
            .get(&NoCaseKey::new(name))
            .map_or(&[], Vec::as_slice)
    }

    /// Заменить имена колонок. Дубликаты допустимы.
    pub fn set_header<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = names.into_iter().map(Into::into).collect();
        self.index.clear();
        for (cidx, name) in self.columns.iter().enumerate() {
            self.index
                .entry(NoCaseKey::new(name.as_str()))
                .or_default()
                .push(cidx);
        }
    }

    /// Добавить пустую строку в конец, вернуть её индекс.
    pub fn push_row(&mut self) -> usize {
        self.rows.push(Row::new());
        self.rows.len() - 1
    }

    /// Вставить пустую строку на позицию `at`, сдвинув последующие.
    /// Если `at >= len`, таблица дополняется пустыми строками до `at`
    /// включительно. Возвращает `at`.
    pub fn insert_row(&mut self, at: usize) -> usize {
        if at < self.rows.len() {
            self.rows.insert(at, Row::new());
        } else {
            self.rows.resize_with(at + 1, Row::new);
        }
        at
    }

    /// Удалить строку, сдвинув последующие. `None`, если её нет.
    pub fn remove_row(&mut self, ridx: usize) -> Option<Row> {
        (ridx < self.rows.len()).then(|| self.rows.remove(ridx))
    }

    /// Записать (`Some`) или удалить (`None`) ячейку.
    /// Возвращает `false`, если строки `ridx` нет.
    pub fn set_cell(&mut self, ridx: usize, cidx: usize, value: Option<Value>) -> bool {
        let Some(row) = self.rows.get_mut(ridx) else {
            return false;
        };
        if value.is_some() {
            self.width = self.width.max(cidx + 1);
        }
        row.set(cidx, value);
        true
    }

    /// Ячейка строки `ridx` в колонке с именем `name`.
    pub fn get(&self, ridx: usize, name: &str) -> Option<&Value> {
        let cidx = self.column_index(name)?;
        self.row(ridx)?.get(cidx)
    }

    /// Отдать таблицу в sink, при `with_header` первой строкой идут имена колонок.
    pub fn write<S: RowSink + ?Sized>(&self, sink: &mut S, with_header: bool) -> Result<(), CsvError> {
        if with_header {
            sink.begin_row()?;
            for name in &self.columns {
                sink.cell(Some(name.as_bytes()))?;
            }
            sink.end_row()?;
        }
        for row in &self.rows {
            row.write(sink)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simplecsv_api::CollectRows;
    use simplecsv_codec::CsvEncoder;

    fn sample() -> Table {
        Table::parse("id,Name,name\n1,alice,x\n2,bob\n", Dialect::default(), true).unwrap()
    }

    #[test]
    fn parse_with_header_builds_index() {
        let table = sample();
        assert_eq!(table.len(), 2);
        assert_eq!(table.column_names(), &["id", "Name", "name"]);
        assert_eq!(table.column_index("NAME"), Some(1));
        assert_eq!(table.column_indices("name"), &[1, 2]);
        assert_eq!(table.column_index("missing"), None);
        assert_eq!(table.get(0, "name").map(Value::as_bytes), Some(&b"alice"[..]));
        assert_eq!(table.get(1, "id").and_then(Value::as_int), Some(2));
        assert!(table.get(5, "id").is_none());
    }

    #[test]
    fn width_is_highest_populated_column() {
        let table = Table::parse("a\n1,2,3\n,\n", Dialect::default(), false).unwrap();
        assert_eq!(table.width(), 3);
        assert_eq!(table.row(2).map(Row::len), Some(0));
    }

    #[test]
    fn width_does_not_shrink() {
        let mut table = Table::new();
        let r = table.push_row();
        assert!(table.set_cell(r, 4, Some(Value::from("x"))));
        assert!(table.set_cell(r, 4, None));
        assert_eq!(table.width(), 5);
        assert!(table.remove_row(r).is_some());
        assert_eq!(table.width(), 5);
    }

    #[test]
    fn set_cell_on_missing_row_is_rejected() {
        let mut table = Table::new();
        assert!(!table.set_cell(0, 0, Some(Value::from("x"))));
        assert_eq!(table.width(), 0);
    }

    #[test]
    fn insert_row_shifts_or_pads() {
        let mut table = Table::parse("a\nb\n", Dialect::default(), false).unwrap();
        assert_eq!(table.insert_row(1), 1);
        assert_eq!(table.len(), 3);
        assert!(table.row(1).is_some_and(Row::is_empty));
        assert_eq!(table.row(2).and_then(|r| r.get(0)).map(Value::as_bytes), Some(&b"b"[..]));

        assert_eq!(table.insert_row(6), 6);
        assert_eq!(table.len(), 7);
        assert!(table.rows()[3..].iter().all(Row::is_empty));
    }

    #[test]
    fn remove_row_out_of_range_is_none() {
        let mut table = sample();
        assert!(table.remove_row(9).is_none());
        let removed = table.remove_row(0).unwrap();
        assert_eq!(removed.get(1).map(Value::as_bytes), Some(&b"alice"[..]));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn write_reproduces_sparse_rows() {
        let mut table = Table::new();
        table.set_header(["x", "y", "z"]);
        let r = table.push_row();
        table.set_cell(r, 0, Some(Value::from("1")));
        table.set_cell(r, 2, Some(Value::from("")));

        let mut sink = CollectRows::new();
        table.write(&mut sink, true).unwrap();
        assert_eq!(
            sink.rows(),
            &[
                vec![Some(b"x".to_vec()), Some(b"y".to_vec()), Some(b"z".to_vec())],
                vec![Some(b"1".to_vec()), None, Some(Vec::new())],
            ]
        );
    }

    #[test]
    fn write_then_parse_round_trips() {
        let input = "id,note\n1,\"multi\nline\"\n2,\"a \"\"quoted\"\" word\"\n";
        let table = Table::parse(input, Dialect::default(), true).unwrap();

        let mut enc = CsvEncoder::new(Vec::new());
        table.write(&mut enc, true).unwrap();
        let again = Table::parse(enc.into_inner(), Dialect::default(), true).unwrap();

        assert_eq!(again.rows(), table.rows());
        assert_eq!(again.column_names(), table.column_names());
        assert_eq!(
            again.get(1, "note").and_then(Value::as_str),
            Some("a \"quoted\" word")
        );
    }

    #[test]
    fn parse_error_is_reported() {
        let err = Table::parse("a,\"b\"x\n", Dialect::default(), false).unwrap_err();
        assert!(err.parse_kind().is_some());
    }

    #[test]
    fn from_reader_matches_parse() {
        let input = b"k;v\none;1\ntwo;2\n";
        let dialect = Dialect::default().with_separator(b';');
        let a = Table::parse(input, dialect, true).unwrap();
        let b = Table::from_reader(&input[..], dialect, true).unwrap();
        assert_eq!(a.rows(), b.rows());
        assert_eq!(b.get(1, "V").and_then(Value::as_int), Some(2));
    }
}
