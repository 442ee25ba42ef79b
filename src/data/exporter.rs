use crate::config::config::DisplayConfig;
use crate::data::display::RowDisplay;
use crate::view::controller::TableController;
use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

const CSV_HEADERS: [&str; 12] = [
    "id",
    "cd_rank",
    "college",
    "location",
    "first_year_fee",
    "fee_course",
    "average_package",
    "highest_package",
    "user_review",
    "review_count",
    "ranking",
    "featured",
];

/// Writes the windowed view of a controller to disk
pub struct DataExporter;

impl DataExporter {
    /// Export by file extension: `.csv` or `.json`
    pub fn export_view(
        controller: &TableController,
        display: &DisplayConfig,
        path: &Path,
    ) -> Result<String> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Self::export_csv(controller, display, path),
            Some("json") => Self::export_json(controller, path),
            _ => Err(anyhow!(
                "Unsupported export format for {} (use .csv or .json)",
                path.display()
            )),
        }
    }

    /// One line of derived display values per visible row
    pub fn export_csv(
        controller: &TableController,
        display: &DisplayConfig,
        path: &Path,
    ) -> Result<String> {
        let rows = controller.visible_display(display);
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

        writer.write_record(CSV_HEADERS)?;
        for row in &rows {
            writer.write_record(Self::csv_fields(row))?;
        }
        writer.flush()?;

        info!(target: "export", "Exported {} rows to {}", rows.len(), path.display());
        Ok(format!(
            "Exported {} rows to CSV file: {}",
            rows.len(),
            path.display()
        ))
    }

    /// The raw records of the visible rows, in view order
    pub fn export_json(controller: &TableController, path: &Path) -> Result<String> {
        let records = controller.visible_records();
        let file = File::create(path)
            .with_context(|| format!("Failed to create JSON file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &records)?;
        writer.flush()?;

        info!(target: "export", "Exported {} records to {}", records.len(), path.display());
        Ok(format!(
            "Exported {} rows to JSON file: {}",
            records.len(),
            path.display()
        ))
    }

    fn csv_fields(row: &RowDisplay) -> [String; 12] {
        [
            row.id.to_string(),
            row.rank.trim_start_matches('#').to_string(),
            row.name.clone(),
            row.subtitle.clone(),
            row.fee.clone(),
            row.fee_course.clone(),
            row.placement_average.clone(),
            row.placement_highest.clone(),
            row.rating.clone(),
            row.review_count.clone(),
            row.ranking.clone(),
            row.featured.to_string(),
        ]
    }
}
