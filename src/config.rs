//! Настройки конвейера: пути и правила очистки

use std::path::PathBuf;

pub const DEFAULT_INPUT_PATH: &str = "data/raw/telco_churn.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "data/processed/data_clean.csv";

/// Значения, которые при чтении считаются пропусками (как в pandas)
pub const DEFAULT_NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Куда сохранить JSON-сводку запуска
    pub report: Option<PathBuf>,
    pub rules: CleaningRules,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            report: None,
            rules: CleaningRules::default(),
        }
    }
}

/// Замена категориального значения в одном столбце
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recode {
    pub column: String,
    pub from: String,
    pub to: String,
}

impl Recode {
    pub fn new(column: &str, from: &str, to: &str) -> Self {
        Self {
            column: column.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleaningRules {
    /// Идентификатор клиента: по нему удаляются дубликаты, в выход не попадает
    pub id_column: String,
    /// Обязательные столбцы, приводимые к числам
    pub numeric_columns: Vec<String>,
    pub recodes: Vec<Recode>,
    /// Текстовые значения, которые нормализатор заменяет пропусками
    pub blank_tokens: Vec<String>,
    pub na_tokens: Vec<String>,
}

impl CleaningRules {
    pub fn is_na(&self, cell: &str) -> bool {
        self.na_tokens.iter().any(|t| t == cell)
    }

    pub fn is_blank(&self, cell: &str) -> bool {
        self.blank_tokens.iter().any(|t| t == cell)
    }
}

impl Default for CleaningRules {
    fn default() -> Self {
        Self {
            id_column: "customer_id".to_string(),
            numeric_columns: ["monthly_charges", "total_charges", "tenure_months"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            recodes: vec![Recode::new("multiple_lines", "No phone service", "No")],
            blank_tokens: vec![String::new(), " ".to_string()],
            na_tokens: DEFAULT_NA_TOKENS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
