//! Приведение типов, заполнение пропусков и перекодировка категорий

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::config::CleaningRules;
use crate::error::{Error, Result, Stage};
use crate::types::{
    parse_number, CleaningReport, Column, ColumnData, FillStrategy, ImputationRecord,
    RecordTable, Value,
};

/// Медиана; для чётного числа значений - среднее двух центральных
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Самое частое значение; при равенстве - встретившееся первым
pub fn mode<'v, I>(values: I) -> Option<&'v str>
where
    I: IntoIterator<Item = &'v str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();
    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let max = counts.values().copied().max()?;
    order.into_iter().find(|value| counts[value] == max)
}

pub struct Imputer<'a> {
    rules: &'a CleaningRules,
}

impl<'a> Imputer<'a> {
    pub fn new(rules: &'a CleaningRules) -> Self {
        Self { rules }
    }

    /// Порядок важен: статистики считаются по уже приведённым значениям,
    /// а перекодировка выполняется последней
    pub fn transform(&self, table: RecordTable, report: &mut CleaningReport) -> Result<RecordTable> {
        let table = self.coerce_numeric(table, report)?;
        let table = self.fill_missing(table, report)?;
        Ok(self.recode(table, report))
    }

    fn coerce_numeric(&self, table: RecordTable, report: &mut CleaningReport) -> Result<RecordTable> {
        if let Some(missing) = self
            .rules
            .numeric_columns
            .iter()
            .find(|name| !table.has_column(name))
        {
            return Err(Error::missing_column(missing, Stage::Clean));
        }

        let columns = table
            .into_columns()
            .into_iter()
            .map(|column| {
                if !self.rules.numeric_columns.contains(&column.name) {
                    return column;
                }
                let (column, coerced) = coerce_column(column);
                if coerced > 0 {
                    warn!(column = %column.name, cells = coerced, "Non-numeric cells coerced to missing");
                }
                report.coerced_to_missing.insert(column.name.clone(), coerced);
                column
            })
            .collect();

        Ok(RecordTable::new(columns)?)
    }

    fn fill_missing(&self, table: RecordTable, report: &mut CleaningReport) -> Result<RecordTable> {
        let columns = table
            .into_columns()
            .into_iter()
            .map(|column| {
                let missing = column.data.missing_count();
                if missing == 0 {
                    return Ok(column);
                }

                let (column, strategy, fill) = fill_column(column)?;
                debug!(column = %column.name, ?strategy, fill = %fill, cells = missing, "Imputed missing values");
                report.imputations.push(ImputationRecord {
                    column: column.name.clone(),
                    strategy,
                    fill,
                    filled: missing,
                });
                Ok(column)
            })
            .collect::<Result<Vec<_>>>()?;

        info!(columns = report.imputations.len(), "Filled missing values");
        Ok(RecordTable::new(columns)?)
    }

    fn recode(&self, mut table: RecordTable, report: &mut CleaningReport) -> RecordTable {
        for recode in &self.rules.recodes {
            let Some(column) = table.column_mut(&recode.column) else {
                continue;
            };
            let ColumnData::Text(values) = &mut column.data else {
                continue;
            };

            let mut replaced = 0;
            for value in values.iter_mut().flatten() {
                if *value == recode.from {
                    *value = recode.to.clone();
                    replaced += 1;
                }
            }

            if replaced > 0 {
                debug!(
                    column = %recode.column,
                    from = %recode.from,
                    to = %recode.to,
                    cells = replaced,
                    "Recoded values"
                );
            }
            report.recoded_cells += replaced;
        }
        table
    }
}

fn coerce_column(column: Column) -> (Column, usize) {
    match column.data {
        ColumnData::Number(_) => (column, 0),
        ColumnData::Text(values) => {
            let mut coerced = 0;
            let numbers = values
                .iter()
                .map(|cell| {
                    let text = cell.as_deref()?;
                    let number = parse_number(text);
                    if number.is_none() {
                        coerced += 1;
                    }
                    number
                })
                .collect();
            (Column::number(column.name, numbers), coerced)
        }
    }
}

fn fill_column(column: Column) -> Result<(Column, FillStrategy, Value)> {
    let name = column.name;
    match column.data {
        ColumnData::Number(values) => {
            let present: Vec<f64> = values.iter().flatten().copied().collect();
            let fill = median(&present).ok_or_else(|| Error::Imputation {
                column: name.clone(),
            })?;
            let filled = values.into_iter().map(|v| Some(v.unwrap_or(fill))).collect();
            Ok((Column::number(name, filled), FillStrategy::Median, Value::Number(fill)))
        }
        ColumnData::Text(values) => {
            let fill = mode(values.iter().flatten().map(String::as_str))
                .map(str::to_string)
                .ok_or_else(|| Error::Imputation {
                    column: name.clone(),
                })?;
            let filled = values
                .into_iter()
                .map(|v| Some(v.unwrap_or_else(|| fill.clone())))
                .collect::<Vec<_>>();
            Ok((Column::text(name, filled), FillStrategy::Mode, Value::Text(fill)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;

    fn churn_table(extra: Vec<Column>) -> RecordTable {
        let mut columns = vec![
            Column::number("monthly_charges", vec![Some(50.0), Some(70.0), Some(20.0)]),
            Column::text("total_charges", vec![None, Some("600"), Some("abc")]),
            Column::number("tenure_months", vec![Some(0.0), Some(12.0), None]),
        ];
        columns.extend(extra);
        RecordTable::new(columns).unwrap()
    }

    fn clean(table: RecordTable) -> Result<(RecordTable, CleaningReport)> {
        let rules = CleaningRules::default();
        let mut report = CleaningReport::default();
        let table = Imputer::new(&rules).transform(table, &mut report)?;
        Ok((table, report))
    }

    #[test]
    fn median_handles_odd_and_even_counts() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[600.0]), Some(600.0));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn mode_prefers_first_seen_on_ties() {
        assert_eq!(mode(["b", "a", "a", "b", "c"]), Some("b"));
        assert_eq!(mode(["x", "y", "y"]), Some("y"));
        assert_eq!(mode(Vec::<&str>::new()), None);
    }

    #[test]
    fn coerces_and_imputes_numeric_columns() {
        let (table, report) = clean(churn_table(vec![])).unwrap();

        assert_eq!(report.coerced_to_missing["total_charges"], 1);
        assert_eq!(report.coerced_to_missing["tenure_months"], 0);
        assert_eq!(
            table.column("total_charges").unwrap().data,
            ColumnData::Number(vec![Some(600.0), Some(600.0), Some(600.0)])
        );
        assert_eq!(
            table.column("tenure_months").unwrap().data,
            ColumnData::Number(vec![Some(0.0), Some(12.0), Some(6.0)])
        );
        assert_eq!(table.missing_cells(), 0);
    }

    #[test]
    fn text_columns_use_most_frequent_value() {
        let gender = Column::text("gender", vec![None, Some("Female"), Some("Male")]);
        let (table, report) = clean(churn_table(vec![gender])).unwrap();

        assert_eq!(table.row(0)[3], Value::Text("Female".to_string()));
        let record = report
            .imputations
            .iter()
            .find(|r| r.column == "gender")
            .unwrap();
        assert_eq!(record.strategy, FillStrategy::Mode);
        assert_eq!(record.filled, 1);
    }

    #[test]
    fn recodes_no_phone_service() {
        let lines = Column::text(
            "multiple_lines",
            vec![Some("No phone service"), Some("Yes"), None],
        );
        let (table, report) = clean(churn_table(vec![lines])).unwrap();

        // пропуск сначала заполняется модой и только потом перекодируется
        assert_eq!(report.recoded_cells, 2);
        assert_eq!(
            table.column("multiple_lines").unwrap().data,
            ColumnData::Text(vec![
                Some("No".to_string()),
                Some("Yes".to_string()),
                Some("No".to_string()),
            ])
        );
    }

    #[test]
    fn missing_required_column_is_schema_error() {
        let table = RecordTable::new(vec![
            Column::number("monthly_charges", vec![Some(1.0)]),
            Column::number("total_charges", vec![Some(1.0)]),
        ])
        .unwrap();

        let err = clean(table).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::MissingColumn { ref column, stage: Stage::Clean })
                if column == "tenure_months"
        ));
    }

    #[test]
    fn all_missing_numeric_column_is_imputation_error() {
        let empty = Column::number("senior_citizen", vec![None, None, None]);
        let err = clean(churn_table(vec![empty])).unwrap_err();

        assert!(matches!(err, Error::Imputation { ref column } if column == "senior_citizen"));
    }

    #[test]
    fn all_missing_text_column_is_imputation_error() {
        let empty = Column::text("contract", vec![None::<&str>, None, None]);
        let err = clean(churn_table(vec![empty])).unwrap_err();

        assert!(matches!(err, Error::Imputation { ref column } if column == "contract"));
    }
}
