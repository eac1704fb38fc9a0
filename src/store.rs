//! The remote dataset store boundary: a versioned, path-addressed blob store
//! with whole-file read and overwrite, plus an in-process implementation for
//! dry runs and tests.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use thiserror::Error;

pub const HF_ENDPOINT: &str = "https://huggingface.co";

#[derive(Debug, Error)]
pub enum StoreError {
    /// The blob does not exist at the given path. The uploader treats this
    /// as an empty dataset, not a failure.
    #[error("dataset file not found")]
    NotFound,

    #[error("http transport: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Whole-blob read and overwrite against a dataset repository. No locking,
/// no conditional writes: two overlapping fetch-modify-write windows race
/// and the slower writer wins.
#[async_trait]
pub trait DatasetStore: Send + Sync {
    async fn read(&self, repo_id: &str, path: &str) -> Result<String, StoreError>;
    async fn write(&self, repo_id: &str, path: &str, content: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Hugging Face Hub implementation
// ---------------------------------------------------------------------------

/// Store backed by a Hugging Face dataset repository: reads resolve the raw
/// file from `main`, writes go through the commit API as one base64 file
/// payload replacing the blob.
pub struct HfDatasetStore {
    client: Client,
    token: String,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct CommitHeaderLine<'a> {
    key: &'static str,
    value: CommitHeaderValue<'a>,
}

#[derive(Debug, Serialize)]
struct CommitHeaderValue<'a> {
    summary: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct CommitFileLine<'a> {
    key: &'static str,
    value: CommitFileValue<'a>,
}

#[derive(Debug, Serialize)]
struct CommitFileValue<'a> {
    path: &'a str,
    content: String,
    encoding: &'static str,
}

impl HfDatasetStore {
    pub fn new(token: String) -> Self {
        HfDatasetStore {
            client: Client::new(),
            token,
            endpoint: HF_ENDPOINT.to_string(),
        }
    }

    /// Point the store at a different hub endpoint (mirrors, test servers).
    pub fn with_endpoint(token: String, endpoint: String) -> Self {
        HfDatasetStore {
            client: Client::new(),
            token,
            endpoint,
        }
    }

    fn resolve_url(&self, repo_id: &str, path: &str) -> String {
        format!("{}/datasets/{}/resolve/main/{}", self.endpoint, repo_id, path)
    }

    fn commit_url(&self, repo_id: &str) -> String {
        format!("{}/api/datasets/{}/commit/main", self.endpoint, repo_id)
    }

    fn commit_body(path: &str, content: &str) -> Result<String, serde_json::Error> {
        let header = serde_json::to_string(&CommitHeaderLine {
            key: "header",
            value: CommitHeaderValue {
                summary: "Append survey response",
                description: "",
            },
        })?;
        let file = serde_json::to_string(&CommitFileLine {
            key: "file",
            value: CommitFileValue {
                path,
                content: BASE64.encode(content.as_bytes()),
                encoding: "base64",
            },
        })?;
        Ok(format!("{}\n{}\n", header, file))
    }
}

#[async_trait]
impl DatasetStore for HfDatasetStore {
    async fn read(&self, repo_id: &str, path: &str) -> Result<String, StoreError> {
        let response = self
            .client
            .get(self.resolve_url(repo_id, path))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound);
        }
        if !response.status().is_success() {
            let code = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { code, body });
        }
        Ok(response.text().await?)
    }

    async fn write(&self, repo_id: &str, path: &str, content: &str) -> Result<(), StoreError> {
        let body = Self::commit_body(path, content)
            .map_err(|e| StoreError::Unavailable(format!("commit payload: {}", e)))?;

        let response = self
            .client
            .post(self.commit_url(repo_id))
            .bearer_auth(&self.token)
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let code = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { code, body });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

/// In-process store used by `--dry-run` and the test suite. Failure
/// injection flags let tests exercise the uploader's fallback and retry
/// paths without a network.
#[derive(Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn key(repo_id: &str, path: &str) -> String {
        format!("{}/{}", repo_id, path)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current blob contents, if any.
    pub fn contents(&self, repo_id: &str, path: &str) -> Option<String> {
        self.files
            .lock()
            .expect("store lock")
            .get(&Self::key(repo_id, path))
            .cloned()
    }

    /// Seed a blob directly, bypassing the trait.
    pub fn put(&self, repo_id: &str, path: &str, content: &str) {
        self.files
            .lock()
            .expect("store lock")
            .insert(Self::key(repo_id, path), content.to_string());
    }
}

#[async_trait]
impl DatasetStore for MemoryStore {
    async fn read(&self, repo_id: &str, path: &str) -> Result<String, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected read failure".to_string()));
        }
        self.contents(repo_id, path).ok_or(StoreError::NotFound)
    }

    async fn write(&self, repo_id: &str, path: &str, content: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected write failure".to_string()));
        }
        self.put(repo_id, path, content);
        Ok(())
    }
}
