//! Summary storage API.

use crate::types::{ResultSet, SummaryManifest};
use crate::ResultsResult;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "kpi_summary.csv";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Clone)]
pub struct SummaryStore {
    root_dir: PathBuf,
}

impl SummaryStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn summary_path(&self) -> PathBuf {
        self.root_dir.join(SUMMARY_FILE)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root_dir.join(MANIFEST_FILE)
    }

    /// Write the CSV summary and its manifest. Returns the CSV path.
    pub fn save(&self, results: &ResultSet, manifest: &SummaryManifest) -> ResultsResult<PathBuf> {
        let csv_path = self.summary_path();
        let file = File::create(&csv_path)?;
        let mut writer = csv::Writer::from_writer(file);
        write_summary_rows(results, &mut writer)?;

        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(self.manifest_path(), manifest_json)?;

        Ok(csv_path)
    }
}

/// Write header and rows. Absent values become empty cells.
pub fn write_summary_rows<W: Write>(
    results: &ResultSet,
    writer: &mut csv::Writer<W>,
) -> ResultsResult<()> {
    writer.write_record(results.header())?;

    for row in results.rows() {
        let mut record = vec![
            row.case.clone(),
            row.params
                .map(|p| p.velocity.to_string())
                .unwrap_or_default(),
            row.params
                .map(|p| p.porous_temperature.to_string())
                .unwrap_or_default(),
        ];
        record.extend(results.columns().iter().map(|c| format_value(row.get(c))));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CaseResult;
    use hx_core::CaseParams;

    #[test]
    fn writes_empty_cells_for_absent_values() {
        let mut set = ResultSet::new(vec!["Tin_air".to_string(), "DeltaP_air".to_string()]);
        let mut row = CaseResult::new(
            "run_U5_Tp400",
            Some(CaseParams {
                velocity: 5,
                porous_temperature: 400,
            }),
        );
        row.set("Tin_air", Some(300.5));
        row.set("DeltaP_air", None);
        set.push(row);

        let mut writer = csv::Writer::from_writer(Vec::new());
        write_summary_rows(&set, &mut writer).unwrap();
        let text = String::from_utf8(writer.get_ref().clone()).unwrap();

        assert_eq!(
            text,
            "case,U_air,Tpor_in,Tin_air,DeltaP_air\nrun_U5_Tp400,5,400,300.5,\n"
        );
    }

    #[test]
    fn zero_is_written_as_zero() {
        assert_eq!(format_value(Some(0.0)), "0");
        assert_eq!(format_value(None), "");
    }
}
