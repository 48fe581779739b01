//! Конвейер: загрузка -> нормализация -> очистка -> признаки -> запись

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::config::{CleaningRules, PipelineConfig};
use crate::error::{Error, Result, Stage};
use crate::preprocessing::{DataNormalizer, FeatureEngineer, Imputer};
use crate::storage::{CsvLoader, CsvWriter};
use crate::types::{CleaningReport, RecordTable};

/// Очистка таблицы в памяти, без обращения к файловой системе
pub fn clean_table(table: RecordTable, rules: &CleaningRules) -> Result<(RecordTable, CleaningReport)> {
    let mut report = CleaningReport {
        rows_loaded: table.n_rows(),
        ..Default::default()
    };

    let table = DataNormalizer::new(rules).transform(table, &mut report)?;
    let table = Imputer::new(rules).transform(table, &mut report)?;
    let table = FeatureEngineer::transform(table, rules)?;

    report.rows_written = table.n_rows();
    report.columns = table.column_names().iter().map(|s| s.to_string()).collect();

    info!(
        rows_loaded = report.rows_loaded,
        rows_written = report.rows_written,
        duplicates = report.duplicates_dropped,
        imputed_columns = report.imputations.len(),
        recoded = report.recoded_cells,
        "Cleaned table"
    );
    Ok((table, report))
}

/// Полный запуск. `on_stage` вызывается перед загрузкой, очисткой и записью.
/// При любой ошибке выходной файл не создаётся и не изменяется.
pub fn run<F>(config: &PipelineConfig, mut on_stage: F) -> Result<CleaningReport>
where
    F: FnMut(Stage),
{
    on_stage(Stage::Load);
    let raw = CsvLoader::new(&config.rules).load(&config.input)?;

    on_stage(Stage::Clean);
    let (clean, report) = clean_table(raw, &config.rules)?;

    on_stage(Stage::Write);
    CsvWriter::save(&clean, &config.output)?;

    if let Some(path) = &config.report {
        save_report(&report, path)?;
    }

    Ok(report)
}

pub fn save_report(report: &CleaningReport, path: &Path) -> Result<()> {
    let write = || -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut out = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut out, report)?;
        out.write_all(b"\n")?;
        out.flush()
    };

    write().map_err(|e| Error::data_access(path, e))?;
    info!(path = %path.display(), "Saved cleaning report");
    Ok(())
}
