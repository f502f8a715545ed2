use std::collections::BTreeMap;

use simplecsv_api::{CsvError, RowSink};

use crate::value::Value;

/// Разреженная строка: индекс колонки → значение.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: BTreeMap<usize, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, cidx: usize) -> Option<&Value> {
        self.cells.get(&cidx)
    }

    /// Последний заданный индекс + 1. Пропуски в середине не учитываются.
    pub fn len(&self) -> usize {
        self.cells.last_key_value().map_or(0, |(&cidx, _)| cidx + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Заданные ячейки по возрастанию индекса.
    pub fn cells(&self) -> impl Iterator<Item = (usize, &Value)> {
        self.cells.iter().map(|(&cidx, value)| (cidx, value))
    }

    /// `None` удаляет ячейку.
    pub(crate) fn set(&mut self, cidx: usize, value: Option<Value>) {
        match value {
            Some(value) => {
                self.cells.insert(cidx, value);
            }
            None => {
                self.cells.remove(&cidx);
            }
        }
    }

    /// Отдать строку в sink. Пропуски становятся отсутствующими ячейками.
    pub fn write<S: RowSink + ?Sized>(&self, sink: &mut S) -> Result<(), CsvError> {
        sink.begin_row()?;
        for cidx in 0..self.len() {
            sink.cell(self.get(cidx).map(Value::as_bytes))?;
        }
        sink.end_row()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simplecsv_api::CollectRows;

    #[test]
    fn len_is_one_past_last_index() {
        let mut row = Row::new();
        assert_eq!(row.len(), 0);
        row.set(3, Some(Value::from("x")));
        assert_eq!(row.len(), 4);
        assert!(row.get(1).is_none());
        row.set(3, None);
        assert_eq!(row.len(), 0);
        assert!(row.is_empty());
    }

    #[test]
    fn write_fills_gaps_with_absent_cells() {
        let mut row = Row::new();
        row.set(0, Some(Value::from("a")));
        row.set(2, Some(Value::from("")));

        let mut sink = CollectRows::new();
        row.write(&mut sink).unwrap();
        assert_eq!(
            sink.rows(),
            &[vec![Some(b"a".to_vec()), None, Some(Vec::new())]]
        );
    }
}
