//! Flattening of a session's answers into the single output row appended to
//! the remote dataset at submission time.

use crate::questionnaire::REGISTRY;
use crate::SurveySession;
use chrono::{DateTime, SecondsFormat, Utc};

/// One flat key -> cell pair list, in output column order. Write-once and
/// ephemeral: produced at submission, appended as a row, then dropped.
pub type OutputRecord = Vec<(String, String)>;

/// Flatten the session into one record: identity and timing columns first,
/// then every recorded registry field. Grouped scales expand to their flat
/// keys (`gad_q1..q7`, `panas_q1..q10`, ...). Total and idempotent — two
/// calls with the same answers and the same `submit_ts` are identical.
pub fn assemble(session: &SurveySession, submit_ts: DateTime<Utc>) -> OutputRecord {
    let mut record: OutputRecord = vec![
        (
            "participant_id".to_string(),
            session.participant_id().to_string(),
        ),
        ("start_ts_utc".to_string(), format_ts(session.start_ts())),
        ("submit_ts_utc".to_string(), format_ts(submit_ts)),
    ];
    for spec in REGISTRY.iter().filter(|f| f.recorded) {
        let cell = session
            .answers
            .get(&spec.name)
            .map(|v| v.as_cell())
            .unwrap_or_default();
        record.push((spec.name.clone(), cell));
    }
    record
}

fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
