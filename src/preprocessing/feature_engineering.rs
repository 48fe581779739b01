//! Производные признаки для модели оттока

use ndarray::Array1;
use tracing::{debug, info};

use crate::config::CleaningRules;
use crate::error::{Error, Result, SchemaError, Stage};
use crate::types::{Column, RecordTable};

pub const MONTHLY_CHARGES: &str = "monthly_charges";
pub const TOTAL_CHARGES: &str = "total_charges";
pub const TENURE_MONTHS: &str = "tenure_months";
pub const TENURE_YEARS: &str = "tenure_years";
pub const AVG_MONTHLY_SPEND: &str = "avg_monthly_spend";

pub struct FeatureEngineer;

impl FeatureEngineer {
    pub fn tenure_years(tenure_months: &Array1<f64>) -> Array1<f64> {
        tenure_months / 12.0
    }

    /// Нулевой стаж считается за один месяц
    pub fn avg_monthly_spend(total_charges: &Array1<f64>, tenure_months: &Array1<f64>) -> Array1<f64> {
        let effective = tenure_months.mapv(|m| if m == 0.0 { 1.0 } else { m });
        total_charges / &effective
    }

    /// Добавляет `tenure_years` и `avg_monthly_spend`, затем убирает идентификатор
    pub fn transform(mut table: RecordTable, rules: &CleaningRules) -> Result<RecordTable> {
        // monthly_charges в формулах не участвует, но обязан дожить до этого этапа
        numeric_column(&table, MONTHLY_CHARGES)?;
        let tenure = numeric_column(&table, TENURE_MONTHS)?;
        let total = numeric_column(&table, TOTAL_CHARGES)?;

        let years = Self::tenure_years(&tenure);
        let spend = Self::avg_monthly_spend(&total, &tenure);

        table.set_column(Column::number(TENURE_YEARS, years.iter().copied().map(Some).collect()))?;
        table.set_column(Column::number(
            AVG_MONTHLY_SPEND,
            spend.iter().copied().map(Some).collect(),
        ))?;

        if table.remove_column(&rules.id_column).is_some() {
            debug!(column = %rules.id_column, "Dropped identifier column");
        }

        info!(columns = table.n_cols(), "Derived features");
        Ok(table)
    }
}

fn numeric_column(table: &RecordTable, name: &str) -> Result<Array1<f64>> {
    let column = table
        .column(name)
        .ok_or_else(|| Error::missing_column(name, Stage::Derive))?;

    column.to_array().ok_or_else(|| {
        SchemaError::NotNumeric {
            column: name.to_string(),
            stage: Stage::Derive,
        }
        .into()
    })
}
