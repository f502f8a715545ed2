use clap::Args;
use serde::Deserialize;

use simplecsv_api::{Dialect, DialectConfig};

use super::error::CliError;

// ═══════════════════════════════════════════════════════════════
//  Config file (TOML)
// ═══════════════════════════════════════════════════════════════

/// ```toml
/// header = true
///
/// [input]
/// delimiter = ";"
/// quoted_newline = "terminate"
///
/// [output]
/// delimiter = "\t"
/// smart_quote = true
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: DialectConfig,
    pub output: DialectConfig,
    pub header: Option<bool>,
}

pub fn load_config(path: &str) -> Result<Config, CliError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| CliError::Config(format!("cannot read config {path}: {e}")))?;
    toml::from_str(&content).map_err(|e| CliError::Config(format!("bad config {path}: {e}")))
}

// ═══════════════════════════════════════════════════════════════
//  CLI args
// ═══════════════════════════════════════════════════════════════

#[derive(Args, Clone, Debug)]
pub struct DialectArgs {
    /// Путь к TOML-конфигу (отсутствующий файл = значения по умолчанию)
    #[arg(long, global = true, default_value = "simplecsv.toml", env = "SIMPLECSV_CONFIG")]
    pub config: String,

    /// Кавычка входа (напр. "'" или "\\'")
    #[arg(long, global = true)]
    pub quote: Option<String>,

    /// Разделитель входа (напр. ";" или "\\t")
    #[arg(long, global = true)]
    pub sep: Option<String>,

    /// Кавычка выхода
    #[arg(long, global = true)]
    pub out_quote: Option<String>,

    /// Разделитель выхода
    #[arg(long, global = true)]
    pub out_sep: Option<String>,

    /// Квотировать на выходе только то, что требует кавычек
    #[arg(long, global = true)]
    pub smart_quote: bool,

    /// Первая строка входа — заголовок
    #[arg(long, global = true)]
    pub header: bool,
}

// ═══════════════════════════════════════════════════════════════
//  Effective — merged config
// ═══════════════════════════════════════════════════════════════

/// Итоговая конфигурация после мержа: config.toml < env/CLI
#[derive(Debug, Clone)]
pub struct Effective {
    pub input: Dialect,
    pub output: Dialect,
    pub header: bool,
}

impl Effective {
    pub fn new(args: &DialectArgs) -> Result<Self, CliError> {
        let cfg = match load_config(&args.config) {
            Ok(c) => {
                tracing::info!(config = %args.config, "config loaded");
                c
            }
            Err(e) => {
                if std::path::Path::new(&args.config).exists() {
                    return Err(e);
                }
                Config::default()
            }
        };

        let mut input = cfg.input;
        if let Some(quote) = &args.quote {
            input.quote = quote.clone();
        }
        if let Some(sep) = &args.sep {
            input.delimiter = sep.clone();
        }

        let mut output = cfg.output;
        if let Some(quote) = &args.out_quote {
            output.quote = quote.clone();
        }
        if let Some(sep) = &args.out_sep {
            output.delimiter = sep.clone();
        }
        output.smart_quote |= args.smart_quote;

        Ok(Self {
            input: Dialect::try_from(&input).map_err(|e| CliError::Config(format!("[input]: {e}")))?,
            output: Dialect::try_from(&output).map_err(|e| CliError::Config(format!("[output]: {e}")))?,
            header: args.header || cfg.header.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use simplecsv_api::QuotedNewline;

    fn args(config: &str) -> DialectArgs {
        DialectArgs {
            config: config.to_string(),
            quote: None,
            sep: None,
            out_quote: None,
            out_sep: None,
            smart_quote: false,
            header: false,
        }
    }

    #[test]
    fn missing_config_file_gives_defaults() {
        let eff = Effective::new(&args("/nonexistent/simplecsv.toml")).unwrap();
        assert_eq!(eff.input, Dialect::default());
        assert_eq!(eff.output, Dialect::default());
        assert!(!eff.header);
    }

    #[test]
    fn config_file_sections_apply() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "header = true\n[input]\ndelimiter = \";\"\nquoted_newline = \"terminate\"\n[output]\ndelimiter = \"\\\\t\"\nsmart_quote = true"
        )
        .unwrap();

        let eff = Effective::new(&args(file.path().to_str().unwrap())).unwrap();
        assert!(eff.header);
        assert_eq!(eff.input.separator, b';');
        assert_eq!(eff.input.quoted_newline, QuotedNewline::Terminate);
        assert_eq!(eff.output.separator, b'\t');
        assert!(eff.output.smart_quote);
    }

    #[test]
    fn cli_overrides_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[input]\ndelimiter = \";\"\nquote = \"'\"").unwrap();

        let mut a = args(file.path().to_str().unwrap());
        a.sep = Some("|".into());
        a.out_quote = Some("\\'".into());
        a.smart_quote = true;

        let eff = Effective::new(&a).unwrap();
        assert_eq!(eff.input.separator, b'|');
        assert_eq!(eff.input.quote, b'\'');
        assert_eq!(eff.output.quote, b'\'');
        assert!(eff.output.smart_quote);
    }

    #[test]
    fn broken_config_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[input\n").unwrap();
        let err = Effective::new(&args(file.path().to_str().unwrap())).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn invalid_dialect_names_the_section() {
        let mut a = args("/nonexistent/simplecsv.toml");
        a.out_sep = Some("\"".into());
        let err = Effective::new(&a).unwrap_err();
        assert!(err.to_string().starts_with("[output]"));
    }
}
