//! Fetch-append-overwrite submission of one participant's record.

use crate::error::SurveyError;
use crate::flow::Step;
use crate::record::assemble;
use crate::store::DatasetStore;
use crate::table::Table;
use crate::SurveySession;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Where the cumulative responses file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLocation {
    pub repo_id: String,
    pub path: String,
}

impl DatasetLocation {
    pub fn new(repo_id: impl Into<String>, path: impl Into<String>) -> Self {
        DatasetLocation {
            repo_id: repo_id.into(),
            path: path.into(),
        }
    }
}

/// What a successful submission looked like.
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    /// Total rows in the dataset after the append, this response included.
    pub rows: usize,
    pub submitted_at: DateTime<Utc>,
}

/// Submit the session's answers: flatten, fetch the current dataset, append
/// one row, overwrite the blob.
///
/// Any read failure — missing file, transport error, malformed CSV — falls
/// back to a fresh empty table and the submission proceeds. A write failure
/// is returned to the caller; the session is untouched (enforced by the
/// shared borrow), so pressing submit again retries. There is no idempotency
/// key: a retry after a partially applied write can append a duplicate row.
pub async fn submit(
    session: &SurveySession,
    store: &dyn DatasetStore,
    dataset: &DatasetLocation,
) -> Result<SubmitReceipt, SurveyError> {
    if session.current_step() != Step::Review {
        return Err(SurveyError::NotAtReview(session.current_step()));
    }

    let submitted_at = Utc::now();
    let record = assemble(session, submitted_at);

    let mut table = match store.read(&dataset.repo_id, &dataset.path).await {
        Ok(body) => Table::from_csv(&body).unwrap_or_else(|e| {
            warn!(error = %e, path = %dataset.path, "existing dataset unreadable; starting fresh");
            Table::empty()
        }),
        Err(e) => {
            warn!(error = %e, path = %dataset.path, "dataset fetch failed; starting fresh");
            Table::empty()
        }
    };

    table.append_record(&record);
    store
        .write(&dataset.repo_id, &dataset.path, &table.to_csv())
        .await?;

    info!(
        participant = %session.participant_id(),
        rows = table.row_count(),
        "response uploaded"
    );
    Ok(SubmitReceipt {
        rows: table.row_count(),
        submitted_at,
    })
}
