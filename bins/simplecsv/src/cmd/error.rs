use simplecsv_api::CsvError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Csv(#[from] CsvError),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot open {path}: {source}")]
    Input {
        path: String,
        source: std::io::Error,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
