#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CSV export of a business record list.
//!
//! Rows are written in the order given, numbered from 1, under a fixed
//! 14-column Indonesian header.

use std::io::Write;
use std::path::{Path, PathBuf};

use business_map_business_models::{BusinessRecord, MapType};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Prefix of generated export file names.
pub const FILE_NAME_PREFIX: &str = "data-usaha-medan";

/// Column headers, in order.
pub const HEADERS: [&str; 14] = [
    "No",
    "Nama Usaha",
    "Alamat",
    "Jenis Peta",
    "Kategori KBLI",
    "Kode KBLI",
    "Kabupaten/Kota",
    "Kecamatan",
    "Kelurahan/Desa",
    "SLS",
    "Blok Sensus",
    "Latitude",
    "Longitude",
    "Sumber Data",
];

/// Errors that can occur during export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Creating the output file failed.
    #[error("Failed to create {path}: {source}")]
    Io {
        /// Output path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One CSV row; field order matches [`HEADERS`].
#[derive(Serialize)]
struct ExportRow<'a> {
    number: usize,
    name: &'a str,
    address: &'a str,
    map_type: MapType,
    category: &'a str,
    category_code: &'a str,
    region: &'a str,
    district: &'a str,
    sub_district: &'a str,
    local_unit: &'a str,
    census_block: &'a str,
    latitude: f64,
    longitude: f64,
    data_source: &'a str,
}

impl<'a> ExportRow<'a> {
    fn new(number: usize, record: &'a BusinessRecord) -> Self {
        Self {
            number,
            name: &record.name,
            address: &record.address,
            map_type: record.map_type,
            category: &record.category,
            category_code: &record.category_code,
            region: &record.region,
            district: &record.district,
            sub_district: &record.sub_district,
            local_unit: &record.local_unit,
            census_block: &record.census_block,
            latitude: record.latitude,
            longitude: record.longitude,
            data_source: &record.data_source,
        }
    }
}

/// File name for an export made on `date`, e.g.
/// `data-usaha-medan-2025-03-01.csv`.
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{FILE_NAME_PREFIX}-{}.csv", date.format("%Y-%m-%d"))
}

/// Writes the header and one row per record to `writer`. Returns the
/// number of rows written.
///
/// The header is written even for an empty list.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] if serialization or the underlying writer
/// fails.
pub fn write_records<W: Write>(
    writer: W,
    records: &[&BusinessRecord],
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(HEADERS)?;
    for (i, record) in records.iter().enumerate() {
        csv_writer.serialize(ExportRow::new(i + 1, record))?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;

    Ok(records.len())
}

/// Writes `records` to `dir` under [`export_file_name`] for `date`.
/// Returns the path written.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be created or written.
pub fn export_to_dir(
    dir: &Path,
    records: &[&BusinessRecord],
    date: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_file_name(date));
    let file = std::fs::File::create(&path).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    let rows = write_records(file, records)?;
    log::info!("Exported {rows} records to {}", path.display());
    Ok(path)
}
