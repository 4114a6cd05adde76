use crate::config::OutputConfig;
use crate::output::{OutputError, OutputHandler, OutputResult, RecordPaths, RunReport};
use crate::record::Record;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes records and reports as pretty-printed JSON files
#[derive(Debug, Clone)]
pub struct JsonOutput {
    data_dir: PathBuf,
    mirror_dir: Option<PathBuf>,
}

impl JsonOutput {
    pub fn new(data_dir: impl Into<PathBuf>, mirror_dir: Option<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            mirror_dir,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.data_dir, config.mirror_dir.as_ref().map(PathBuf::from))
    }

    pub fn timestamped_path(&self, site_name: &str) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        self.data_dir.join(format!("{}_{}.json", site_name, stamp))
    }

    pub fn latest_path(&self, site_name: &str) -> PathBuf {
        self.data_dir.join(latest_file_name(site_name))
    }

    pub fn mirror_path(&self, site_name: &str) -> Option<PathBuf> {
        self.mirror_dir
            .as_ref()
            .map(|dir| dir.join(latest_file_name(site_name)))
    }

    pub fn report_path(&self, site_name: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}_scraping_report.json", site_name))
    }
}

fn latest_file_name(site_name: &str) -> String {
    format!("{}_latest.json", site_name)
}

/// Serializes `value` to `path`, creating parent directories as needed
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> OutputResult<()> {
    let json = serde_json::to_string_pretty(value)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| OutputError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, json).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })
}

impl OutputHandler for JsonOutput {
    fn write_records(&self, site_name: &str, records: &[Record]) -> OutputResult<RecordPaths> {
        let timestamped = self.timestamped_path(site_name);
        tracing::info!("Saving {} records to {}", records.len(), timestamped.display());
        write_json(&timestamped, records)?;

        let latest = self.latest_path(site_name);
        write_json(&latest, records)?;

        let mirror = match self.mirror_path(site_name) {
            Some(path) => match write_json(&path, records) {
                Ok(()) => {
                    tracing::info!("Data also saved to mirror: {}", path.display());
                    Some(path)
                }
                Err(e) => {
                    tracing::warn!("Could not save mirror copy: {}", e);
                    None
                }
            },
            None => None,
        };

        Ok(RecordPaths {
            timestamped,
            latest,
            mirror,
        })
    }

    fn write_report(&self, site_name: &str, report: &RunReport) -> OutputResult<PathBuf> {
        let path = self.report_path(site_name);
        write_json(&path, report)?;
        tracing::info!("Run report saved to {}", path.display());
        Ok(path)
    }
}
