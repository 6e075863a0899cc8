//! CSV export of findings sections.

use crate::core::items::{ItemSource, RowTable};
use crate::core::section::SectionView;
use crate::error::{AppError, ExportError};
use crate::utils::text::slugify;
use chrono::{DateTime, Local};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name for an exported section, e.g.
/// `kubebuddy_prod-east_pod-issues_20261018_142501.csv`.
pub fn csv_file_name(cluster_name: &str, section_id: &str, now: DateTime<Local>) -> String {
    let cluster = match slugify(cluster_name) {
        slug if slug.is_empty() => "cluster".to_string(),
        slug => slug,
    };
    let section = match slugify(section_id) {
        slug if slug.is_empty() => "section".to_string(),
        slug => slug,
    };
    format!(
        "kubebuddy_{}_{}_{}.csv",
        cluster,
        section,
        now.format("%Y%m%d_%H%M%S")
    )
}

/// Write every row of `section` (current sort order, ignoring pagination and
/// filters) as CSV.
pub fn write_section_csv<W: Write>(
    section: &SectionView<RowTable>,
    writer: W,
) -> Result<usize, ExportError> {
    let table = section.source();
    let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    csv_writer.write_record(table.headers())?;
    for row in table.rows() {
        csv_writer.write_record(&row.cells)?;
    }
    csv_writer.flush().map_err(|source| ExportError::FileIo {
        path: "<writer>".to_string(),
        source,
    })?;
    Ok(table.len())
}

/// Export `section` into `dir`, returning the written path.
pub fn export_section(
    section: &SectionView<RowTable>,
    cluster_name: &str,
    dir: &Path,
    now: DateTime<Local>,
) -> Result<PathBuf, AppError> {
    let path = dir.join(csv_file_name(cluster_name, section.id(), now));
    let file = File::create(&path).map_err(|source| ExportError::FileIo {
        path: path.display().to_string(),
        source,
    })?;
    let rows = write_section_csv(section, file)?;
    log::info!("Exported {} rows of {} to {}", rows, section.id(), path.display());
    Ok(path)
}
