use crate::flow::Step;
use crate::store::StoreError;
use thiserror::Error;

/// Crate-level error enum. Everything a survey session can fail with,
/// from startup configuration through the final upload.
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("{0} not set. Export it or add it to your environment.")]
    MissingConfig(&'static str),

    /// The consent -> demographics edge was attempted without the consent
    /// checkbox set. The step does not change.
    #[error("you must agree to participate before continuing")]
    ConsentRequired,

    /// Continue was requested from the terminal step. Review only exits via
    /// the submit action.
    #[error("no step follows {0}; use submit instead")]
    EndOfSurvey(Step),

    /// Submission was attempted from a step other than review.
    #[error("submission is only available from the review step (currently at {0})")]
    NotAtReview(Step),

    #[error("malformed dataset table: {0}")]
    MalformedTable(String),

    #[error("dataset store: {0}")]
    Store(#[from] StoreError),
}
