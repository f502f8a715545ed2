use std::io::Read;

use simplecsv_api::{CollectRows, Cells, CsvError, Dialect, ParseErrorKind, Position, RowSink};

use crate::fsm::{self, Effects, Emit, Event, State};

/// Размер буфера чтения в `decode_reader`.
const READ_CHUNK: usize = 8 * 1024;

// ═══════════════════════════════════════════════════════════════
//  CsvDecoder
// ═══════════════════════════════════════════════════════════════

/// Потоковый декодер CSV: байты → события `RowSink`.
///
/// Байты обрабатываются по одному, без заглядывания вперёд. Состояние FSM
/// сохраняется между вызовами [`feed`](Self::feed), поэтому вход можно
/// резать на куски в любом месте, в том числе внутри ячейки.
/// [`finish`](Self::finish) сообщает о конце входа и дописывает
/// незавершённую строку (с `end_row`).
///
/// Первая ошибка разбора переводит декодер в терминальное состояние:
/// все последующие `feed`/`finish` возвращают ту же ошибку до
/// [`reset`](Self::reset).
///
/// ```
/// use simplecsv_api::CollectRows;
/// use simplecsv_codec::CsvDecoder;
///
/// let mut dec = CsvDecoder::new(CollectRows::new());
/// dec.decode(b"a, b ,\"c\"\"d\"\n").unwrap();
/// let rows = dec.into_sink().into_rows();
/// assert_eq!(
///     rows[0],
///     vec![Some(b"a".to_vec()), Some(b"b".to_vec()), Some(b"c\"d".to_vec())]
/// );
/// ```
pub struct CsvDecoder<S> {
    sink: S,
    dialect: Dialect,
    state: State,
    /// Аккумулятор текущей ячейки. Очищается после каждой отданной ячейки.
    cell: Vec<u8>,
    position: Position,
}

impl<S: RowSink> CsvDecoder<S> {
    pub fn new(sink: S) -> Self {
        Self::with_dialect(sink, Dialect::default())
    }

    pub fn with_dialect(sink: S, dialect: Dialect) -> Self {
        Self {
            sink,
            dialect,
            state: State::Start,
            cell: Vec::new(),
            position: Position::start(),
        }
    }

    /// Обработать очередной кусок входа.
    ///
    /// При ошибке разбора `position()` указывает на байт, вызвавший ошибку.
    /// Ошибка sink'а возвращается как есть; после неё декодер следует
    /// сбросить.
    pub fn feed(&mut self, input: &[u8]) -> Result<(), CsvError> {
        if let State::Error(kind) = self.state {
            return Err(self.parse_error(kind));
        }

        for &byte in input {
            let event = Event::classify(byte, &self.dialect);
            let state = std::mem::take(&mut self.state);
            let step = fsm::transition(state, event, &self.dialect);
            tracing::trace!(?event, next = ?step.next, offset = self.position.offset, "csv transition");

            self.state = step.next;
            if let State::Error(kind) = self.state {
                tracing::debug!(%kind, position = %self.position, "csv parse error");
                return Err(self.parse_error(kind));
            }

            self.apply(step.effects)?;
            self.advance(byte);
        }

        Ok(())
    }

    /// Конец входа: дописать незавершённую строку и вернуться в `Start`.
    ///
    /// Вход без завершающего `\n` даёт ту же последовательность событий,
    /// что и вход с ним. Незакрытая кавычка — ошибка `UnterminatedQuote`.
    pub fn finish(&mut self) -> Result<(), CsvError> {
        let state = std::mem::take(&mut self.state);
        let step = fsm::end_of_input(state, &self.dialect);

        self.state = step.next;
        if let State::Error(kind) = self.state {
            tracing::debug!(%kind, position = %self.position, "csv parse error at end of input");
            return Err(self.parse_error(kind));
        }

        self.apply(step.effects)
    }

    /// Декодировать весь вход целиком: `feed` + `finish`.
    pub fn decode(&mut self, input: &[u8]) -> Result<(), CsvError> {
        self.feed(input)?;
        self.finish()
    }

    pub fn decode_str(&mut self, input: &str) -> Result<(), CsvError> {
        self.decode(input.as_bytes())
    }

    /// Прочитать и декодировать поток до EOF кусками по 8 KiB.
    pub fn decode_reader<R: Read>(&mut self, mut reader: R) -> Result<(), CsvError> {
        let mut buf = vec![0u8; READ_CHUNK];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            self.feed(&buf[..n])?;
        }
        self.finish()
    }

    /// Вернуться в начальное состояние для нового входа.
    pub fn reset(&mut self) {
        self.state = State::Start;
        self.cell.clear();
        self.position = Position::start();
    }

    /// Причина ошибки, если декодер в терминальном состоянии.
    pub fn error(&self) -> Option<ParseErrorKind> {
        match self.state {
            State::Error(kind) => Some(kind),
            _ => None,
        }
    }

    /// Находится ли декодер на границе строк (нет незавершённой строки).
    pub fn at_row_boundary(&self) -> bool {
        self.state == State::Start
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn apply(&mut self, effects: Effects) -> Result<(), CsvError> {
        if effects.begin_row {
            self.sink.begin_row()?;
        }
        if let Some(held) = effects.commit {
            self.cell.extend_from_slice(&held);
        }
        if let Some(byte) = effects.push {
            self.cell.push(byte);
        }
        match effects.emit {
            Some(Emit::Cell) => {
                let result = self.sink.cell(Some(&self.cell));
                self.cell.clear();
                result?;
            }
            Some(Emit::Absent) => {
                debug_assert!(self.cell.is_empty());
                self.sink.cell(None)?;
            }
            None => {}
        }
        if effects.end_row {
            self.sink.end_row()?;
        }
        Ok(())
    }

    fn advance(&mut self, byte: u8) {
        self.position.offset += 1;
        if byte == b'\n' {
            self.position.line += 1;
        }
    }

    fn parse_error(&self, kind: ParseErrorKind) -> CsvError {
        CsvError::Parse {
            kind,
            position: self.position,
        }
    }
}

/// Декодировать вход целиком в список строк.
pub fn decode_rows(input: &[u8], dialect: Dialect) -> Result<Vec<Cells>, CsvError> {
    let mut dec = CsvDecoder::with_dialect(CollectRows::new(), dialect);
    dec.decode(input)?;
    Ok(dec.into_sink().into_rows())
}
