pub mod check;
pub mod config;
pub mod error;
pub mod events;
pub mod json;
pub mod recode;

use std::fs::File;
use std::io::{self, BufReader, Read};

use error::CliError;

/// Открыть входной файл; `-` означает stdin.
pub fn open_input(path: &str) -> Result<Box<dyn Read>, CliError> {
    if path == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).map_err(|source| CliError::Input {
        path: path.to_string(),
        source,
    })?;
    Ok(Box::new(BufReader::new(file)))
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::io::Write;

    use tempfile::NamedTempFile;

    pub fn input_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    pub fn path(file: &NamedTempFile) -> &str {
        file.path().to_str().unwrap()
    }
}
