//! The append-only price history file (`prices.db`).

use ledgerkit_core::PriceBook;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PriceFileError {
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("append to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct PriceFile {
    path: PathBuf,
}

impl PriceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every recorded directive. A missing file is an empty book.
    pub fn load_book(&self) -> Result<PriceBook, PriceFileError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(PriceBook::from_text(&text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("{} does not exist yet; starting empty", self.path.display());
                Ok(PriceBook::new())
            }
            Err(source) => Err(PriceFileError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Append a blank separator and then each line. Nothing is touched when `lines` is empty.
    pub fn append_batch(&self, lines: &[String]) -> Result<usize, PriceFileError> {
        if lines.is_empty() {
            return Ok(0);
        }

        let write_err = |source| PriceFileError::Write {
            path: self.path.clone(),
            source,
        };

        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;

        let mut batch = String::from("\n");
        for line in lines {
            log::info!("writing {line}");
            batch.push_str(line);
            batch.push('\n');
        }
        f.write_all(batch.as_bytes()).map_err(write_err)?;
        f.flush().map_err(write_err)?;

        Ok(lines.len())
    }
}
