//! Загрузка таблицы из CSV с выводом схемы

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use tracing::{debug, info};

use crate::config::CleaningRules;
use crate::error::{Error, Result};
use crate::types::{parse_number, Column, RecordTable};

pub struct CsvLoader<'a> {
    rules: &'a CleaningRules,
}

impl<'a> CsvLoader<'a> {
    pub fn new(rules: &'a CleaningRules) -> Self {
        Self { rules }
    }

    pub fn load(&self, path: &Path) -> Result<RecordTable> {
        let file = File::open(path).map_err(|e| Error::data_access(path, e))?;
        let table = self.read(file, path)?;
        info!(
            path = %path.display(),
            rows = table.n_rows(),
            columns = table.n_cols(),
            "Loaded table"
        );
        Ok(table)
    }

    /// `origin` используется только в сообщениях об ошибках
    pub fn read<R: Read>(&self, reader: R, origin: &Path) -> Result<RecordTable> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| Error::data_access(origin, e))?
            .clone();
        if headers.is_empty() {
            let err = io::Error::new(io::ErrorKind::InvalidData, "missing header row");
            return Err(Error::data_access(origin, err));
        }

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        for result in reader.records() {
            let record = result.map_err(|e| Error::data_access(origin, e))?;
            for (column, field) in cells.iter_mut().zip(record.iter()) {
                if self.rules.is_na(field) {
                    column.push(None);
                } else {
                    column.push(Some(field.to_string()));
                }
            }
        }

        let columns = headers
            .iter()
            .zip(cells)
            .map(|(name, values)| infer_column(name, values))
            .collect::<Vec<_>>();

        for column in &columns {
            debug!(column = %column.name, kind = ?column.column_type(), "Inferred column type");
        }

        Ok(RecordTable::new(columns)?)
    }
}

/// Столбец числовой, если все присутствующие значения - числа
fn infer_column(name: &str, values: Vec<Option<String>>) -> Column {
    let numbers: Option<Vec<Option<f64>>> = values
        .iter()
        .map(|cell| match cell {
            Some(text) => parse_number(text).map(Some),
            None => Some(None),
        })
        .collect();

    match numbers {
        Some(numbers) => Column::number(name, numbers),
        None => Column::text(name, values),
    }
}
