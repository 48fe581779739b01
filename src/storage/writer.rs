//! Сохранение таблицы в CSV

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::RecordTable;

pub struct CsvWriter;

impl CsvWriter {
    /// Записывает таблицу, создавая недостающие каталоги.
    ///
    /// Данные сначала пишутся во временный файл рядом с целевым и затем
    /// переименовываются поверх него, так что частично записанный файл
    /// никогда не виден читателям. При параллельных запусках побеждает
    /// последний завершившийся.
    pub fn save(table: &RecordTable, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| Error::data_access(dir, e))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::data_access(dir, e))?;
        Self::write(table, tmp.as_file_mut()).map_err(|e| Error::data_access(path, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| Error::data_access(path, e))?;
        debug!(tmp = %tmp.path().display(), "Wrote temporary output");

        tmp.persist(path)
            .map_err(|e| Error::data_access(path, e.error))?;

        info!(
            path = %path.display(),
            rows = table.n_rows(),
            columns = table.n_cols(),
            "Saved table"
        );
        Ok(())
    }

    pub fn write<W: Write>(table: &RecordTable, out: W) -> std::result::Result<(), csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(out);

        writer.write_record(table.column_names())?;
        for row in table.rows() {
            writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;
    use tempfile::TempDir;

    fn sample() -> RecordTable {
        RecordTable::new(vec![
            Column::text("plan", vec![Some("basic, monthly"), Some("pro")]),
            Column::number("tenure_years", vec![Some(0.0), Some(1.5)]),
        ])
        .unwrap()
    }

    #[test]
    fn writes_header_and_rows() {
        let mut out = Vec::new();
        CsvWriter::write(&sample(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "plan,tenure_years\n\"basic, monthly\",0\npro,1.5\n"
        );
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("processed").join("clean.csv");

        CsvWriter::save(&sample(), &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("plan,tenure_years\n"));
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clean.csv");
        fs::write(&path, "stale").unwrap();

        CsvWriter::save(&sample(), &path).unwrap();

        assert!(!fs::read_to_string(&path).unwrap().contains("stale"));
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn unwritable_destination_is_data_access_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let err = CsvWriter::save(&sample(), &blocker.join("out.csv")).unwrap_err();
        assert!(matches!(err, Error::DataAccess { .. }));
    }
}
