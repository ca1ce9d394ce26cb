//! Application outcome ledgers kept under `DATA_DIR`.
//!
//! - `successful_applications.json` / `failed_applications.json`: job id lists
//! - `job_descriptions_applied.json`: one `AppliedJob` per successful application
//!
//! All three are deduplicated by job id. A file that is not a JSON list is
//! replaced rather than failing the request.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::job::JobContext;
use crate::store::write_atomically;

pub const SUCCESSFUL_APPLICATIONS: &str = "successful_applications.json";
pub const FAILED_APPLICATIONS: &str = "failed_applications.json";
pub const JOB_DESCRIPTIONS_APPLIED: &str = "job_descriptions_applied.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedJob {
    pub job_id: String,
    pub title: String,
    pub company: String,
    pub description: Option<String>,
    pub applied_at: DateTime<Utc>,
}

/// Appends `job_id` to the success or failure list.
pub fn record_application_result(data_dir: &Path, job_id: &str, success: bool) -> Result<()> {
    let file = if success {
        SUCCESSFUL_APPLICATIONS
    } else {
        FAILED_APPLICATIONS
    };
    let path = data_dir.join(file);
    let mut ids: Vec<String> = read_list(&path);

    if ids.iter().any(|id| id == job_id) {
        info!("Job {job_id} already recorded in {file}");
        return Ok(());
    }
    ids.push(job_id.to_string());
    write_list(&path, &ids)?;
    info!("Recorded job {job_id} in {file}");
    Ok(())
}

pub fn record_job_description(data_dir: &Path, job: &JobContext) -> Result<()> {
    let path = data_dir.join(JOB_DESCRIPTIONS_APPLIED);
    let mut jobs: Vec<AppliedJob> = read_list(&path);

    if jobs.iter().any(|applied| applied.job_id == job.id) {
        return Ok(());
    }
    jobs.push(AppliedJob {
        job_id: job.id.clone(),
        title: job.title.clone(),
        company: job.company.clone(),
        description: job.description.clone(),
        applied_at: Utc::now(),
    });
    write_list(&path, &jobs)
}

fn read_list<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return Vec::new(),
    };
    match serde_json::from_str(&raw) {
        Ok(list) => list,
        Err(e) => {
            warn!("{} is not a valid list ({e}), starting a new one", path.display());
            Vec::new()
        }
    }
}

fn write_list<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(items)?;
    write_atomically(path, json.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str) -> JobContext {
        JobContext {
            id: id.to_string(),
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            description: Some("Rust services".to_string()),
            location: None,
        }
    }

    fn read_ids(path: &Path) -> Vec<String> {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_results_are_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        record_application_result(dir.path(), "42", true).unwrap();
        record_application_result(dir.path(), "42", true).unwrap();
        record_application_result(dir.path(), "43", false).unwrap();

        assert_eq!(read_ids(&dir.path().join(SUCCESSFUL_APPLICATIONS)), vec!["42"]);
        assert_eq!(read_ids(&dir.path().join(FAILED_APPLICATIONS)), vec!["43"]);
    }

    #[test]
    fn test_corrupt_list_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FAILED_APPLICATIONS);
        fs::write(&path, r#"{"not": "a list"}"#).unwrap();

        record_application_result(dir.path(), "7", false).unwrap();
        assert_eq!(read_ids(&path), vec!["7"]);
    }

    #[test]
    fn test_job_description_recorded_once() {
        let dir = tempfile::tempdir().unwrap();
        record_job_description(dir.path(), &job("99")).unwrap();
        record_job_description(dir.path(), &job("99")).unwrap();

        let raw = fs::read_to_string(dir.path().join(JOB_DESCRIPTIONS_APPLIED)).unwrap();
        let jobs: Vec<AppliedJob> = serde_json::from_str(&raw).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].company, "Acme");
        assert_eq!(jobs[0].description.as_deref(), Some("Rust services"));
    }

    #[test]
    fn test_rewrite_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        record_application_result(dir.path(), "1", true).unwrap();
        record_application_result(dir.path(), "2", true).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            read_ids(&dir.path().join(SUCCESSFUL_APPLICATIONS)),
            vec!["1", "2"]
        );
    }

    #[test]
    fn test_creates_missing_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data");
        record_application_result(&nested, "1", true).unwrap();
        assert!(nested.join(SUCCESSFUL_APPLICATIONS).exists());
    }
}
