//! Типы данных для конвейера очистки

use std::collections::BTreeMap;
use std::fmt;

use ndarray::Array1;
use serde::Serialize;

use crate::error::SchemaError;

/// Значение ячейки
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Missing => Ok(()),
        }
    }
}

/// Разбор десятичного числа; `inf` и `NaN` числами не считаются
pub fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Number,
    Text,
}

/// Данные столбца; `None` - пропущенное значение
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Number(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Number(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Number(_) => ColumnType::Number,
            ColumnData::Text(_) => ColumnType::Text,
        }
    }

    pub fn get(&self, row: usize) -> Value {
        match self {
            ColumnData::Number(values) => match values.get(row) {
                Some(Some(n)) => Value::Number(*n),
                _ => Value::Missing,
            },
            ColumnData::Text(values) => match values.get(row) {
                Some(Some(s)) => Value::Text(s.clone()),
                _ => Value::Missing,
            },
        }
    }

    pub fn missing_count(&self) -> usize {
        match self {
            ColumnData::Number(values) => values.iter().filter(|v| v.is_none()).count(),
            ColumnData::Text(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    fn take(self, rows: &[usize]) -> Self {
        match self {
            ColumnData::Number(values) => {
                ColumnData::Number(rows.iter().map(|&i| values[i]).collect())
            }
            ColumnData::Text(values) => {
                ColumnData::Text(rows.iter().map(|&i| values[i].clone()).collect())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn number(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Number(values),
        }
    }

    pub fn text<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Text(values.into_iter().map(|v| v.map(Into::into)).collect()),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        self.data.column_type()
    }

    /// Числовой столбец без пропусков в виде вектора
    pub fn to_array(&self) -> Option<Array1<f64>> {
        match &self.data {
            ColumnData::Number(values) => values
                .iter()
                .copied()
                .collect::<Option<Vec<f64>>>()
                .map(Array1::from),
            ColumnData::Text(_) => None,
        }
    }
}

/// Таблица записей, хранимая по столбцам
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordTable {
    columns: Vec<Column>,
    n_rows: usize,
}

impl RecordTable {
    pub fn new(columns: Vec<Column>) -> Result<Self, SchemaError> {
        let n_rows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        let mut table = Self {
            columns: Vec::with_capacity(columns.len()),
            n_rows,
        };
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn push_column(&mut self, column: Column) -> Result<(), SchemaError> {
        if self.columns.is_empty() {
            self.n_rows = column.data.len();
        } else if column.data.len() != self.n_rows {
            return Err(SchemaError::LengthMismatch {
                column: column.name,
                expected: self.n_rows,
                found: column.data.len(),
            });
        }
        if self.has_column(&column.name) {
            return Err(SchemaError::DuplicateColumn(column.name));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Заменяет столбец с тем же именем на месте или добавляет новый в конец
    pub fn set_column(&mut self, column: Column) -> Result<(), SchemaError> {
        match self.columns.iter().position(|c| c.name == column.name) {
            Some(idx) if column.data.len() == self.n_rows => {
                self.columns[idx] = column;
                Ok(())
            }
            Some(_) => Err(SchemaError::LengthMismatch {
                column: column.name,
                expected: self.n_rows,
                found: column.data.len(),
            }),
            None => self.push_column(column),
        }
    }

    pub fn remove_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(idx))
    }

    pub fn row(&self, idx: usize) -> Vec<Value> {
        self.columns.iter().map(|c| c.data.get(idx)).collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<Value>> + '_ {
        (0..self.n_rows).map(move |i| self.row(i))
    }

    /// Новая таблица только из указанных строк (в указанном порядке)
    pub fn take_rows(self, rows: &[usize]) -> Self {
        let columns = self
            .columns
            .into_iter()
            .map(|c| Column {
                name: c.name,
                data: c.data.take(rows),
            })
            .collect();
        Self {
            columns,
            n_rows: rows.len(),
        }
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn missing_cells(&self) -> usize {
        self.columns.iter().map(|c| c.data.missing_count()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStrategy {
    Median,
    Mode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImputationRecord {
    pub column: String,
    pub strategy: FillStrategy,
    pub fill: Value,
    pub filled: usize,
}

/// Сводка по одному запуску конвейера
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningReport {
    pub rows_loaded: usize,
    pub duplicates_dropped: usize,
    pub blanks_marked_missing: usize,
    pub coerced_to_missing: BTreeMap<String, usize>,
    pub imputations: Vec<ImputationRecord>,
    pub recoded_cells: usize,
    pub rows_written: usize,
    pub columns: Vec<String>,
}
