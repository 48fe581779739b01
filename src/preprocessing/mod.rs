/// Этапы предобработки данных

pub mod feature_engineering;
pub mod imputation;
pub mod normalization;

pub use feature_engineering::FeatureEngineer;
pub use imputation::Imputer;
pub use normalization::DataNormalizer;
