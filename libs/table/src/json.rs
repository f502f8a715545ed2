use crate::table::Table;

// ═══════════════════════════════════════════════════════════════
//  Проекция строки в JSON
// ═══════════════════════════════════════════════════════════════

impl Table {
    /// Строка как JSON-объект: имя колонки → значение.
    ///
    /// Целые числа становятся `Number`, остальное строкой (невалидный
    /// UTF-8 заменяется). Колонки без имени называются `col{i}`,
    /// отсутствующие ячейки пропускаются. При повторяющемся имени
    /// побеждает последняя колонка.
    pub fn row_to_json(&self, ridx: usize) -> Option<serde_json::Value> {
        let row = self.row(ridx)?;
        let names = self.column_names();

        let mut map = serde_json::Map::new();
        for (cidx, value) in row.cells() {
            let col_name = match names.get(cidx) {
                Some(name) if !name.is_empty() => name.clone(),
                _ => format!("col{cidx}"),
            };

            let json = match value.as_int() {
                Some(n) => serde_json::Value::Number(n.into()),
                None => serde_json::Value::String(value.to_string_lossy().into_owned()),
            };
            map.insert(col_name, json);
        }

        Some(serde_json::Value::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use simplecsv_api::Dialect;

    use crate::Table;

    #[test]
    fn named_columns_and_integers() {
        let table = Table::parse("sym,qty,px\nAAPL,100,1.5\n", Dialect::default(), true).unwrap();
        assert_eq!(
            table.row_to_json(0),
            Some(json!({"sym": "AAPL", "qty": 100, "px": "1.5"}))
        );
    }

    #[test]
    fn unnamed_and_absent_columns() {
        let table = Table::parse("a,\n1,,x,-3\n", Dialect::default(), true).unwrap();
        assert_eq!(
            table.row_to_json(0),
            Some(json!({"a": 1, "col2": "x", "col3": -3}))
        );
    }

    #[test]
    fn missing_row_is_none() {
        assert!(Table::new().row_to_json(0).is_none());
    }
}
