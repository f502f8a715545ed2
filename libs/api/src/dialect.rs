use serde::Deserialize;

use crate::error::CsvError;

// ════════════════════════════════════════════════════════════════
//  Quoted newline policy
// ════════════════════════════════════════════════════════════════

/// Что делать с `\n` внутри открытого квотированного поля.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotedNewline {
    /// Перевод строки — часть значения ячейки (многострочные ячейки).
    #[default]
    Literal,
    /// Перевод строки завершает ячейку и строку, даже внутри кавычек.
    Terminate,
}

// ════════════════════════════════════════════════════════════════
//  Dialect
// ════════════════════════════════════════════════════════════════

/// Проверенная конфигурация диалекта. Общая для декодера и энкодера,
/// чтобы обе стороны одинаково понимали «опасные» байты.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// Символ кавычки (по умолчанию `"`).
    pub quote: u8,
    /// Разделитель полей (по умолчанию `,`).
    pub separator: u8,
    /// Энкодер: квотировать только когда нужно. `false` — квотировать всё.
    pub smart_quote: bool,
    /// Декодер: поведение `\n` внутри кавычек.
    pub quoted_newline: QuotedNewline,
    /// Декодер: отбрасывать хвостовые пробелы неквотированных значений.
    pub trim_trailing_whitespace: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            quote: b'"',
            separator: b',',
            smart_quote: false,
            quoted_newline: QuotedNewline::Literal,
            trim_trailing_whitespace: true,
        }
    }
}

impl Dialect {
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_smart_quote(mut self, smart_quote: bool) -> Self {
        self.smart_quote = smart_quote;
        self
    }

    pub fn with_quoted_newline(mut self, policy: QuotedNewline) -> Self {
        self.quoted_newline = policy;
        self
    }

    pub fn with_trim_trailing_whitespace(mut self, trim: bool) -> Self {
        self.trim_trailing_whitespace = trim;
        self
    }

    /// Проверить, что классификация байтов однозначна.
    ///
    /// Пробел как разделитель допустим: разделитель классифицируется раньше
    /// пробела. Пробел как кавычка — нет, он съедается обрезкой.
    pub fn validate(&self) -> Result<(), CsvError> {
        if self.quote == self.separator {
            return Err(CsvError::Config(format!(
                "quote and separator must differ, both are {:?}",
                self.quote as char
            )));
        }
        if self.quote == b'\n' || self.separator == b'\n' {
            return Err(CsvError::Config(
                "newline cannot be used as quote or separator".into(),
            ));
        }
        if self.quote == b' ' {
            return Err(CsvError::Config("space cannot be used as quote".into()));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════
//  Config (TOML / serde)
// ════════════════════════════════════════════════════════════════

/// Сырой конфиг диалекта в том виде, как он записан в файле.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DialectConfig {
    /// Разделитель полей (по умолчанию ",", допускается "\t").
    pub delimiter: String,
    /// Символ кавычки (по умолчанию "\"").
    pub quote: String,
    pub smart_quote: bool,
    pub quoted_newline: QuotedNewline,
    pub trim_trailing_whitespace: bool,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            quote: "\"".to_string(),
            smart_quote: false,
            quoted_newline: QuotedNewline::Literal,
            trim_trailing_whitespace: true,
        }
    }
}

impl TryFrom<&DialectConfig> for Dialect {
    type Error = CsvError;

    fn try_from(cfg: &DialectConfig) -> Result<Self, Self::Error> {
        let dialect = Dialect {
            quote: parse_delimiter(&cfg.quote)?,
            separator: parse_delimiter(&cfg.delimiter)?,
            smart_quote: cfg.smart_quote,
            quoted_newline: cfg.quoted_newline,
            trim_trailing_whitespace: cfg.trim_trailing_whitespace,
        };
        dialect.validate()?;
        Ok(dialect)
    }
}

impl TryFrom<DialectConfig> for Dialect {
    type Error = CsvError;

    fn try_from(cfg: DialectConfig) -> Result<Self, Self::Error> {
        Dialect::try_from(&cfg)
    }
}

/// Разобрать однобайтовый символ из конфига или аргумента CLI.
pub fn parse_delimiter(s: &str) -> Result<u8, CsvError> {
    match s {
        "\\t" | "\t" => Ok(b'\t'),
        "\\'" => Ok(b'\''),
        s if s.len() == 1 => Ok(s.as_bytes()[0]),
        other => Err(CsvError::Config(format!(
            "expected a single-byte character, got {other:?}"
        ))),
    }
}
