//! Ошибки конвейера очистки

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Этап конвейера, на котором возникла ошибка
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Normalize,
    Clean,
    Derive,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Normalize => "normalize",
            Stage::Clean => "clean",
            Stage::Derive => "derive",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// Входной файл не читается или выходной не записывается
    #[error("data access error on {}: {source}", path.display())]
    DataAccess {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// В столбце нет ни одного значения для вычисления статистики
    #[error("imputation error: column `{column}` has no present values")]
    Imputation { column: String },
}

impl Error {
    pub fn data_access<E: Into<csv::Error>>(path: &Path, err: E) -> Self {
        Self::DataAccess {
            path: path.to_path_buf(),
            source: err.into(),
        }
    }

    pub fn missing_column(column: &str, stage: Stage) -> Self {
        Self::Schema(SchemaError::MissingColumn {
            column: column.to_string(),
            stage,
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("required column `{column}` is missing at the {stage} stage")]
    MissingColumn { column: String, stage: Stage },

    #[error("column `{column}` must be numeric with no missing values at the {stage} stage")]
    NotNumeric { column: String, stage: Stage },

    #[error("column `{0}` appears more than once after name normalization")]
    DuplicateColumn(String),

    #[error("column `{column}` has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
}
