use crate::error::SurveyError;
use crate::upload::DatasetLocation;
use std::env;

pub const DEFAULT_DATASET_PATH: &str = "responses.csv";

/// Process configuration for the remote dataset store, read from the
/// environment at startup. A missing token or repository id is fatal.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub repo_id: String,
    pub path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, SurveyError> {
        let token = env::var("HF_TOKEN").map_err(|_| SurveyError::MissingConfig("HF_TOKEN"))?;
        let repo_id = env::var("HF_DATASET_REPO")
            .map_err(|_| SurveyError::MissingConfig("HF_DATASET_REPO"))?;
        let path =
            env::var("HF_DATASET_PATH").unwrap_or_else(|_| DEFAULT_DATASET_PATH.to_string());
        Ok(Config {
            token,
            repo_id,
            path,
        })
    }

    pub fn dataset(&self) -> DatasetLocation {
        DatasetLocation::new(self.repo_id.clone(), self.path.clone())
    }
}
