use std::fmt;

// ════════════════════════════════════════════════════════════════
//  Position
// ════════════════════════════════════════════════════════════════

/// Позиция курсора декодера во входном потоке.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Смещение в байтах от начала потока (сквозное через все `feed`).
    pub offset: u64,
    /// Номер строки, начиная с 1. Считаются все `\n`, в том числе внутри кавычек.
    pub line: u64,
}

impl Position {
    pub fn start() -> Self {
        Self { offset: 0, line: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, byte {}", self.line, self.offset)
    }
}

// ════════════════════════════════════════════════════════════════
//  Parse errors
// ════════════════════════════════════════════════════════════════

/// Причина остановки FSM. Строки сообщений статические и стабильные:
/// их можно сравнивать и показывать пользователю как есть.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ParseErrorKind {
    /// Байт, отличный от кавычки/разделителя/пробела/перевода строки,
    /// сразу после того, что выглядело как закрывающая кавычка.
    #[error("char after possible endquote")]
    QuoteAfterPossibleEndquote,

    /// То же, но после закрывающей кавычки и хвостовых пробелов.
    #[error("char after endquote")]
    CharAfterEndquote,

    /// Кавычка внутри поля, которое не начиналось с кавычки.
    #[error("unexpected quote in unquoted string")]
    UnexpectedQuoteInUnquotedField,

    /// Кавычка после хвостовых пробелов неквотированного поля.
    #[error("unexpected quote after unquoted string")]
    UnexpectedQuoteAfterUnquotedField,

    /// Конец входа внутри открытого квотированного поля (только `finish`).
    #[error("unterminated quoted string")]
    UnterminatedQuote,
}

impl ParseErrorKind {
    /// Статическая диагностическая строка.
    pub fn reason(&self) -> &'static str {
        match self {
            ParseErrorKind::QuoteAfterPossibleEndquote => "char after possible endquote",
            ParseErrorKind::CharAfterEndquote => "char after endquote",
            ParseErrorKind::UnexpectedQuoteInUnquotedField => "unexpected quote in unquoted string",
            ParseErrorKind::UnexpectedQuoteAfterUnquotedField => {
                "unexpected quote after unquoted string"
            }
            ParseErrorKind::UnterminatedQuote => "unterminated quoted string",
        }
    }
}

// ════════════════════════════════════════════════════════════════
//  CsvError
// ════════════════════════════════════════════════════════════════

/// Общая ошибка декодирования/кодирования.
///
/// Ошибки разбора фатальны для текущего прохода: декодер их не
/// восстанавливает, resync — политика вызывающего.
#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("csv parse error at {position}: {kind}")]
    Parse { kind: ParseErrorKind, position: Position },

    /// Ошибка выходного потока энкодера или источника данных декодера.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(String),

    /// Ошибка, сгенерированная реализацией `RowSink`.
    #[error("sink: {0}")]
    Sink(String),
}

impl CsvError {
    /// Вид ошибки разбора, если это ошибка разбора.
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self {
            CsvError::Parse { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_matches_display() {
        for kind in [
            ParseErrorKind::QuoteAfterPossibleEndquote,
            ParseErrorKind::CharAfterEndquote,
            ParseErrorKind::UnexpectedQuoteInUnquotedField,
            ParseErrorKind::UnexpectedQuoteAfterUnquotedField,
            ParseErrorKind::UnterminatedQuote,
        ] {
            assert_eq!(kind.to_string(), kind.reason());
        }
    }

    #[test]
    fn parse_error_display_includes_position() {
        let err = CsvError::Parse {
            kind: ParseErrorKind::CharAfterEndquote,
            position: Position { offset: 12, line: 3 },
        };
        assert_eq!(
            err.to_string(),
            "csv parse error at line 3, byte 12: char after endquote"
        );
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::CharAfterEndquote));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: CsvError = io.into();
        assert!(matches!(err, CsvError::Io(_)));
        assert_eq!(err.parse_kind(), None);
    }
}
