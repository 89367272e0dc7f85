//! Write the long-format price table to files.
//!
//! The format is picked from the file extension. Unknown extensions are
//! skipped with a warning so one bad name does not cost the other outputs.

use std::fs::File;
use std::path::{Path, PathBuf};

use polars::io::parquet::write::{ParquetCompression, ParquetWriter, StatisticsOptions};
use polars::prelude::*;
use rust_xlsxwriter::Workbook;
use tracing::{info, warn};

use crate::error::AppError;
use crate::frame::{AREA_COLUMN, PriceFrame, TIME_COLUMN, VALUE_COLUMN};

const CSV_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const XLSX_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const XLSX_SHEET: &str = "prices";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Parquet,
    Csv,
    Xlsx,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "parquet" => Some(Self::Parquet),
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Parquet => "Parquet",
            Self::Csv => "CSV",
            Self::Xlsx => "Excel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written { path: PathBuf, format: OutputFormat },
    Skipped { path: PathBuf },
}

pub fn save_all(frame: &PriceFrame, paths: &[PathBuf]) -> Result<Vec<ExportOutcome>, AppError> {
    paths.iter().map(|p| save_to_file(frame, p)).collect()
}

pub fn save_to_file(frame: &PriceFrame, path: &Path) -> Result<ExportOutcome, AppError> {
    let Some(format) = OutputFormat::from_path(path) else {
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        warn!("Unsupported file extension: {ext}. Skipping file: {}", path.display());
        return Ok(ExportOutcome::Skipped {
            path: path.to_path_buf(),
        });
    };

    match format {
        OutputFormat::Parquet => write_parquet(frame, path)?,
        OutputFormat::Csv => write_csv(frame, path)?,
        OutputFormat::Xlsx => write_xlsx(frame, path)?,
    }

    info!("Data saved to {} file: {}", format.display_name(), path.display());
    Ok(ExportOutcome::Written {
        path: path.to_path_buf(),
        format,
    })
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path).map_err(|e| AppError::usage(format!("Failed to create '{}': {e}", path.display())))
}

fn write_parquet(frame: &PriceFrame, path: &Path) -> Result<(), AppError> {
    let mut df = frame.to_dataframe()?;
    let file = create(path)?;
    ParquetWriter::new(file)
        .with_compression(ParquetCompression::Zstd(None))
        .with_statistics(StatisticsOptions::default())
        .finish(&mut df)
        .map_err(|e| AppError::usage(format!("Failed to write Parquet '{}': {e}", path.display())))?;
    Ok(())
}

fn write_csv(frame: &PriceFrame, path: &Path) -> Result<(), AppError> {
    // Times go out as RFC 3339 strings so readers don't need to guess the zone.
    let times: Vec<String> = frame
        .records
        .iter()
        .map(|r| r.time.format(CSV_TIME_FORMAT).to_string())
        .collect();
    let mut df = frame.to_dataframe()?;
    df.with_column(Series::new(TIME_COLUMN.into(), times))
        .map_err(|e| AppError::usage(format!("Failed to format CSV times: {e}")))?;

    let mut file = create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| AppError::usage(format!("Failed to write CSV '{}': {e}", path.display())))?;
    Ok(())
}

fn write_xlsx(frame: &PriceFrame, path: &Path) -> Result<(), AppError> {
    let err = |e: rust_xlsxwriter::XlsxError| {
        AppError::usage(format!("Failed to write Excel '{}': {e}", path.display()))
    };

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(XLSX_SHEET).map_err(err)?;

    for (col, name) in [TIME_COLUMN, AREA_COLUMN, VALUE_COLUMN].into_iter().enumerate() {
        sheet.write_string(0, col as u16, name).map_err(err)?;
    }

    for (idx, r) in frame.records.iter().enumerate() {
        let row = u32::try_from(idx + 1)
            .map_err(|_| AppError::usage("Too many rows for an Excel worksheet."))?;
        sheet
            .write_string(row, 0, r.time.format(XLSX_TIME_FORMAT).to_string())
            .map_err(err)?;
        sheet.write_string(row, 1, &r.area).map_err(err)?;
        if let Some(v) = r.value {
            sheet.write_number(row, 2, v).map_err(err)?;
        }
    }

    workbook.save(path).map_err(err)?;
    Ok(())
}
