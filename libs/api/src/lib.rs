pub mod dialect;
pub mod error;

pub use dialect::{Dialect, DialectConfig, QuotedNewline, parse_delimiter};
pub use error::{CsvError, ParseErrorKind, Position};

// ════════════════════════════════════════════════════════════════
//  Row Sink
// ════════════════════════════════════════════════════════════════

/// Потребитель потока событий строк/ячеек.
///
/// Единственный канал, через который декодер отдаёт данные, и одновременно
/// публичная поверхность энкодера. Table builder, энкодер и любые
/// пользовательские обработчики реализуют этот трейт.
///
/// `cell(None)` — явно пустая, незаданная ячейка. Она отличается от
/// `cell(Some(b""))` (пустая строка), и реализации обязаны сохранять это
/// различие по всему конвейеру.
///
/// Ошибки sink'а прерывают декодирование и возвращаются вызывающему
/// без изменений.
pub trait RowSink {
    /// Начало логической строки. По умолчанию no-op.
    fn begin_row(&mut self) -> Result<(), CsvError> {
        Ok(())
    }

    /// Одно значение поля. Байты одолжены только на время вызова.
    fn cell(&mut self, data: Option<&[u8]>) -> Result<(), CsvError>;

    /// Конец логической строки. По умолчанию no-op.
    fn end_row(&mut self) -> Result<(), CsvError> {
        Ok(())
    }
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn begin_row(&mut self) -> Result<(), CsvError> {
        (**self).begin_row()
    }

    fn cell(&mut self, data: Option<&[u8]>) -> Result<(), CsvError> {
        (**self).cell(data)
    }

    fn end_row(&mut self) -> Result<(), CsvError> {
        (**self).end_row()
    }
}

impl<S: RowSink + ?Sized> RowSink for Box<S> {
    fn begin_row(&mut self) -> Result<(), CsvError> {
        (**self).begin_row()
    }

    fn cell(&mut self, data: Option<&[u8]>) -> Result<(), CsvError> {
        (**self).cell(data)
    }

    fn end_row(&mut self) -> Result<(), CsvError> {
        (**self).end_row()
    }
}

// ════════════════════════════════════════════════════════════════
//  Collecting sink
// ════════════════════════════════════════════════════════════════

/// Собранная строка: `None` — отсутствующая ячейка.
pub type Cells = Vec<Option<Vec<u8>>>;

/// Sink, складывающий события в память построчно.
///
/// Удобен в тестах и для небольших входов, где полноценная таблица не нужна.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectRows {
    rows: Vec<Cells>,
    current: Option<Cells>,
}

impl CollectRows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Завершённые строки.
    pub fn rows(&self) -> &[Cells] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Cells> {
        self.rows
    }

    /// Есть ли строка, для которой уже был `begin_row`, но ещё не было `end_row`.
    pub fn has_open_row(&self) -> bool {
        self.current.is_some()
    }
}

impl RowSink for CollectRows {
    fn begin_row(&mut self) -> Result<(), CsvError> {
        self.current = Some(Vec::new());
        Ok(())
    }

    fn cell(&mut self, data: Option<&[u8]>) -> Result<(), CsvError> {
        let row = self
            .current
            .as_mut()
            .ok_or_else(|| CsvError::Sink("cell outside of a row".into()))?;
        row.push(data.map(<[u8]>::to_vec));
        Ok(())
    }

    fn end_row(&mut self) -> Result<(), CsvError> {
        let row = self
            .current
            .take()
            .ok_or_else(|| CsvError::Sink("end_row without begin_row".into()))?;
        self.rows.push(row);
        Ok(())
    }
}
