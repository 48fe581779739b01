//! Churn Prep - очистка датасета оттока клиентов

pub mod config;
pub mod error;
pub mod pipeline;
pub mod preprocessing;
pub mod storage;
pub mod types;

pub use config::{CleaningRules, PipelineConfig, Recode};
pub use error::{Error, Result, SchemaError, Stage};
pub use types::*;

// Re-export для удобства
pub use pipeline::{clean_table, run};
