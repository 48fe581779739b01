//! Нормализация схемы: имена столбцов, дубликаты, пустые строки

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::config::CleaningRules;
use crate::error::Result;
use crate::types::{CleaningReport, Column, ColumnData, RecordTable};

/// `" Total-Charges "` -> `"total_charges"`
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(|c: char| c == ' ' || c == '-', "_")
}

pub struct DataNormalizer<'a> {
    rules: &'a CleaningRules,
}

impl<'a> DataNormalizer<'a> {
    pub fn new(rules: &'a CleaningRules) -> Self {
        Self { rules }
    }

    pub fn transform(&self, table: RecordTable, report: &mut CleaningReport) -> Result<RecordTable> {
        let table = self.rename_columns(table)?;
        let table = self.drop_duplicates(table, report);
        self.mark_blanks(table, report)
    }

    fn rename_columns(&self, table: RecordTable) -> Result<RecordTable> {
        let columns = table
            .into_columns()
            .into_iter()
            .map(|column| {
                let name = normalize_column_name(&column.name);
                if name != column.name {
                    debug!(from = %column.name, to = %name, "Renamed column");
                }
                Column { name, ..column }
            })
            .collect();

        Ok(RecordTable::new(columns)?)
    }

    /// Оставляет первую строку для каждого идентификатора
    fn drop_duplicates(&self, table: RecordTable, report: &mut CleaningReport) -> RecordTable {
        let Some(ids) = table.column(&self.rules.id_column) else {
            return table;
        };

        let mut seen = HashSet::new();
        let keep: Vec<usize> = (0..table.n_rows())
            .filter(|&row| {
                let value = ids.data.get(row);
                // все пропуски считаются одним значением
                let key = (!value.is_missing()).then(|| value.to_string());
                seen.insert(key)
            })
            .collect();

        let dropped = table.n_rows() - keep.len();
        if dropped == 0 {
            return table;
        }

        warn!(
            column = %self.rules.id_column,
            dropped,
            "Dropped duplicate rows"
        );
        report.duplicates_dropped += dropped;
        table.take_rows(&keep)
    }

    fn mark_blanks(&self, table: RecordTable, report: &mut CleaningReport) -> Result<RecordTable> {
        let mut marked = 0;

        let columns = table
            .into_columns()
            .into_iter()
            .map(|column| match column.data {
                ColumnData::Text(values) => {
                    let values = values
                        .into_iter()
                        .map(|cell| match cell {
                            Some(text) if self.rules.is_blank(&text) => {
                                marked += 1;
                                None
                            }
                            other => other,
                        })
                        .collect();
                    Column {
                        name: column.name,
                        data: ColumnData::Text(values),
                    }
                }
                ColumnData::Number(_) => column,
            })
            .collect::<Vec<_>>();

        if marked > 0 {
            debug!(cells = marked, "Marked blank cells as missing");
        }
        report.blanks_marked_missing += marked;

        Ok(RecordTable::new(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, SchemaError};
    use crate::types::Value;

    fn normalize(table: RecordTable) -> (RecordTable, CleaningReport) {
        let rules = CleaningRules::default();
        let mut report = CleaningReport::default();
        let table = DataNormalizer::new(&rules)
            .transform(table, &mut report)
            .unwrap();
        (table, report)
    }

    #[test]
    fn column_names_are_snake_case() {
        assert_eq!(normalize_column_name("  Monthly Charges "), "monthly_charges");
        assert_eq!(normalize_column_name("Customer-ID"), "customer_id");
        assert_eq!(normalize_column_name("Tenure Months"), "tenure_months");
        assert_eq!(normalize_column_name("already_ok"), "already_ok");
    }

    #[test]
    fn colliding_names_are_rejected() {
        let rules = CleaningRules::default();
        let table = RecordTable::new(vec![
            Column::number("Total Charges", vec![Some(1.0)]),
            Column::number("total-charges", vec![Some(2.0)]),
        ])
        .unwrap();

        let err = DataNormalizer::new(&rules)
            .transform(table, &mut CleaningReport::default())
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Schema(SchemaError::DuplicateColumn(ref name)) if name == "total_charges"
        ));
    }

    #[test]
    fn keeps_first_row_per_customer() {
        let table = RecordTable::new(vec![
            Column::text("Customer ID", vec![Some("A1"), Some("B2"), Some("A1"), None, None]),
            Column::number("tenure", vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]),
        ])
        .unwrap();

        let (table, report) = normalize(table);

        assert_eq!(report.duplicates_dropped, 2);
        assert_eq!(
            table.column("tenure").unwrap().data,
            ColumnData::Number(vec![Some(1.0), Some(2.0), Some(4.0)])
        );
    }

    #[test]
    fn no_id_column_keeps_all_rows() {
        let table = RecordTable::new(vec![Column::text("plan", vec![Some("a"), Some("a")])]).unwrap();

        let (table, report) = normalize(table);

        assert_eq!(table.n_rows(), 2);
        assert_eq!(report.duplicates_dropped, 0);
    }

    #[test]
    fn blank_text_cells_become_missing() {
        let table = RecordTable::new(vec![Column::text(
            "total_charges",
            vec![Some("10"), Some(" "), Some(""), Some("  ")],
        )])
        .unwrap();

        let (table, report) = normalize(table);

        assert_eq!(report.blanks_marked_missing, 2);
        assert_eq!(table.row(1), vec![Value::Missing]);
        assert_eq!(table.row(2), vec![Value::Missing]);
        // два пробела не считаются пустым значением
        assert_eq!(table.row(3), vec![Value::Text("  ".to_string())]);
    }
}
