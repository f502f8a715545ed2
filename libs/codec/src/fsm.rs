use simplecsv_api::{Dialect, ParseErrorKind, QuotedNewline};

// ═══════════════════════════════════════════════════════════════
//  Events
// ═══════════════════════════════════════════════════════════════

/// Классифицированный входной байт. Байт сохраняется: пробелы и обычные
/// символы попадают в ячейку как есть.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Quote(u8),
    Separator(u8),
    Whitespace(u8),
    Newline(u8),
    Other(u8),
}

impl Event {
    /// Приоритет: кавычка → разделитель → пробел → `\n` → остальное.
    ///
    /// Пробелом считается только 0x20, чтобы не конфликтовать с `\t`
    /// в роли разделителя.
    pub fn classify(byte: u8, dialect: &Dialect) -> Self {
        if byte == dialect.quote {
            Event::Quote(byte)
        } else if byte == dialect.separator {
            Event::Separator(byte)
        } else if byte == b' ' {
            Event::Whitespace(byte)
        } else if byte == b'\n' {
            Event::Newline(byte)
        } else {
            Event::Other(byte)
        }
    }

    pub fn byte(&self) -> u8 {
        match *self {
            Event::Quote(b)
            | Event::Separator(b)
            | Event::Whitespace(b)
            | Event::Newline(b)
            | Event::Other(b) => b,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  States
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum State {
    /// Между строками.
    #[default]
    Start,
    /// Перед значением ячейки: пропускаем ведущие пробелы.
    SkipLeadingWhitespace,
    InsideQuotes,
    /// Встретили кавычку внутри кавычек: это либо `""`, либо конец поля.
    CheckQuoteEscape,
    /// После закрывающей кавычки: допустимы только пробелы и терминатор.
    SkipTrailingWhitespace,
    InsideUnquoted,
    /// Пробелы после неквотированного значения. Попадут в ячейку, только
    /// если за ними последует обычный символ.
    HoldingWhitespace(Vec<u8>),
    /// Терминальное состояние.
    Error(ParseErrorKind),
}

// ═══════════════════════════════════════════════════════════════
//  Effects
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    /// Отдать содержимое аккумулятора (возможно пустое) и очистить его.
    Cell,
    /// Отдать отсутствующую ячейку. Аккумулятор при этом пуст.
    Absent,
}

/// Побочные эффекты перехода. Применяются в фиксированном порядке:
/// `begin_row` → `commit` → `push` → `emit` → `end_row`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects {
    pub begin_row: bool,
    /// Отложенные пробелы, которые нужно дописать в ячейку.
    pub commit: Option<Vec<u8>>,
    pub push: Option<u8>,
    pub emit: Option<Emit>,
    pub end_row: bool,
}

impl Effects {
    fn none() -> Self {
        Self::default()
    }

    fn begin_row(mut self) -> Self {
        self.begin_row = true;
        self
    }

    fn commit(mut self, held: Vec<u8>) -> Self {
        self.commit = Some(held);
        self
    }

    fn push(mut self, byte: u8) -> Self {
        self.push = Some(byte);
        self
    }

    fn emit(mut self, emit: Emit) -> Self {
        self.emit = Some(emit);
        self
    }

    fn end_row(mut self) -> Self {
        self.end_row = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub next: State,
    pub effects: Effects,
}

fn go(next: State, effects: Effects) -> Step {
    Step { next, effects }
}

fn fail(kind: ParseErrorKind) -> Step {
    go(State::Error(kind), Effects::none())
}

/// Хвостовые пробелы неквотированного значения перед терминатором.
fn trailing(held: Vec<u8>, dialect: &Dialect) -> Effects {
    if dialect.trim_trailing_whitespace {
        Effects::none()
    } else {
        Effects::none().commit(held)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Transition table
// ═══════════════════════════════════════════════════════════════

/// Полная таблица переходов (state × event → state + effects).
///
/// Чистая функция: аккумулятор ячейки принадлежит вызывающему и меняется
/// только через возвращённые `Effects`.
pub fn transition(state: State, event: Event, dialect: &Dialect) -> Step {
    use Event::*;
    use State::*;

    match (state, event) {
        (Start, Quote(_)) => go(InsideQuotes, Effects::none().begin_row()),
        (Start, Separator(_)) => go(
            SkipLeadingWhitespace,
            Effects::none().begin_row().emit(Emit::Absent),
        ),
        (Start, Newline(_)) => go(Start, Effects::none().begin_row().end_row()),
        (Start, Whitespace(_)) => go(SkipLeadingWhitespace, Effects::none().begin_row()),
        (Start, Other(b)) => go(InsideUnquoted, Effects::none().begin_row().push(b)),

        (SkipLeadingWhitespace, Quote(_)) => go(InsideQuotes, Effects::none()),
        (SkipLeadingWhitespace, Separator(_)) => {
            go(SkipLeadingWhitespace, Effects::none().emit(Emit::Absent))
        }
        (SkipLeadingWhitespace, Newline(_)) => {
            go(Start, Effects::none().emit(Emit::Absent).end_row())
        }
        (SkipLeadingWhitespace, Whitespace(_)) => go(SkipLeadingWhitespace, Effects::none()),
        (SkipLeadingWhitespace, Other(b)) => go(InsideUnquoted, Effects::none().push(b)),

        (InsideQuotes, Quote(_)) => go(CheckQuoteEscape, Effects::none()),
        (InsideQuotes, Newline(b)) => match dialect.quoted_newline {
            QuotedNewline::Literal => go(InsideQuotes, Effects::none().push(b)),
            QuotedNewline::Terminate => go(Start, Effects::none().emit(Emit::Cell).end_row()),
        },
        (InsideQuotes, Separator(b) | Whitespace(b) | Other(b)) => {
            go(InsideQuotes, Effects::none().push(b))
        }

        // "" внутри кавычек — литеральная кавычка
        (CheckQuoteEscape, Quote(b)) => go(InsideQuotes, Effects::none().push(b)),
        (CheckQuoteEscape, Separator(_)) => {
            go(SkipLeadingWhitespace, Effects::none().emit(Emit::Cell))
        }
        (CheckQuoteEscape, Newline(_)) => go(Start, Effects::none().emit(Emit::Cell).end_row()),
        (CheckQuoteEscape, Whitespace(_)) => go(SkipTrailingWhitespace, Effects::none()),
        (CheckQuoteEscape, Other(_)) => fail(ParseErrorKind::QuoteAfterPossibleEndquote),

        (SkipTrailingWhitespace, Separator(_)) => {
            go(SkipLeadingWhitespace, Effects::none().emit(Emit::Cell))
        }
        (SkipTrailingWhitespace, Newline(_)) => {
            go(Start, Effects::none().emit(Emit::Cell).end_row())
        }
        (SkipTrailingWhitespace, Whitespace(_)) => go(SkipTrailingWhitespace, Effects::none()),
        (SkipTrailingWhitespace, Quote(_) | Other(_)) => fail(ParseErrorKind::CharAfterEndquote),

        (InsideUnquoted, Quote(_)) => fail(ParseErrorKind::UnexpectedQuoteInUnquotedField),
        (InsideUnquoted, Separator(_)) => {
            go(SkipLeadingWhitespace, Effects::none().emit(Emit::Cell))
        }
        (InsideUnquoted, Newline(_)) => go(Start, Effects::none().emit(Emit::Cell).end_row()),
        (InsideUnquoted, Whitespace(b)) => go(HoldingWhitespace(vec![b]), Effects::none()),
        (InsideUnquoted, Other(b)) => go(InsideUnquoted, Effects::none().push(b)),

        (HoldingWhitespace(_), Quote(_)) => {
            fail(ParseErrorKind::UnexpectedQuoteAfterUnquotedField)
        }
        (HoldingWhitespace(held), Separator(_)) => go(
            SkipLeadingWhitespace,
            trailing(held, dialect).emit(Emit::Cell),
        ),
        (HoldingWhitespace(held), Newline(_)) => {
            go(Start, trailing(held, dialect).emit(Emit::Cell).end_row())
        }
        (HoldingWhitespace(mut held), Whitespace(b)) => {
            held.push(b);
            go(HoldingWhitespace(held), Effects::none())
        }
        (HoldingWhitespace(held), Other(b)) => {
            go(InsideUnquoted, Effects::none().commit(held).push(b))
        }

        (Error(kind), _) => fail(kind),
    }
}

/// Переход по концу входа: дописать незавершённую строку.
///
/// Поведение совпадает с переходом по `\n`, кроме `Start` (строки нет,
/// ничего не отдаём) и `InsideQuotes` (незакрытая кавычка — ошибка при
/// любой политике переводов строк).
pub fn end_of_input(state: State, dialect: &Dialect) -> Step {
    match state {
        State::Start => go(State::Start, Effects::none()),
        State::InsideQuotes => fail(ParseErrorKind::UnterminatedQuote),
        other => transition(other, Event::Newline(b'\n'), dialect),
    }
}
