//! Submission scenarios against the in-memory dataset store: first upload,
//! unreachable dataset, failed write with retry, and hostile free text.

use tone_survey::store::MemoryStore;
use tone_survey::table::Table;
use tone_survey::upload::{submit, DatasetLocation};
use tone_survey::{AnswerValue, Step, SurveySession};

const REPO: &str = "lab/voice-study";
const PATH: &str = "responses.csv";

fn dataset() -> DatasetLocation {
    DatasetLocation::new(REPO, PATH)
}

/// A session walked to the review step with a representative answer set.
fn completed_session() -> SurveySession {
    let mut session = SurveySession::new();
    session.set_consent(true);
    session.try_continue().expect("to demographics");

    session.set_answer("age", AnswerValue::Number(25));
    session.set_answer("gender", AnswerValue::Choice("Female".to_string()));
    session.set_answer(
        "education",
        AnswerValue::Choice("Bachelor's degree".to_string()),
    );
    session.set_answer("voice_exp", AnswerValue::Choice("Yes".to_string()));

    session.try_continue().expect("to baseline");
    for i in 1..=7 {
        session.set_answer(&format!("gad_q{}", i), AnswerValue::Number(1));
    }
    for i in 1..=10 {
        session.set_answer(&format!("panas_q{}", i), AnswerValue::Number(3));
    }
    session.set_answer("single_mood", AnswerValue::Number(5));

    session.try_continue().expect("to empathetic session");
    for i in 1..=8 {
        session.set_answer(&format!("emp_q{}", i), AnswerValue::Number(4));
    }
    session.set_answer("emp_state_anxiety", AnswerValue::Number(2));

    session.try_continue().expect("to neutral session");
    for i in 1..=8 {
        session.set_answer(&format!("neu_q{}", i), AnswerValue::Number(3));
    }
    session.set_answer("neu_state_anxiety", AnswerValue::Number(4));

    session.try_continue().expect("to open questions");
    session.set_answer(
        "open_emp",
        AnswerValue::Text("It felt calming and personal.".to_string()),
    );

    session.try_continue().expect("to review");
    assert_eq!(session.current_step(), Step::Review);
    session
}

fn stored_table(store: &MemoryStore) -> Table {
    let body = store.contents(REPO, PATH).expect("dataset blob");
    Table::from_csv(&body).expect("stored dataset parses")
}

#[tokio::test]
async fn test_first_submission_creates_single_row_dataset() {
    let store = MemoryStore::new();
    let session = completed_session();

    let receipt = submit(&session, &store, &dataset()).await.expect("submit");
    assert_eq!(receipt.rows, 1);

    let table = stored_table(&store);
    assert_eq!(table.row_count(), 1);
    assert_eq!(
        table.cell(0, "participant_id"),
        Some(session.participant_id().to_string().as_str())
    );
    assert_eq!(table.cell(0, "age"), Some("25"));
    for i in 1..=7 {
        assert_eq!(table.cell(0, &format!("gad_q{}", i)), Some("1"));
    }
    assert_eq!(table.cell(0, "emp_state_anxiety"), Some("2"));
    assert_eq!(table.cell(0, "neu_state_anxiety"), Some("4"));
    assert_eq!(
        table.cell(0, "open_emp"),
        Some("It felt calming and personal.")
    );
}

#[tokio::test]
async fn test_second_submission_appends_without_touching_first_row() {
    let store = MemoryStore::new();
    let first = completed_session();
    submit(&first, &store, &dataset()).await.expect("first");

    let second = completed_session();
    let receipt = submit(&second, &store, &dataset()).await.expect("second");
    assert_eq!(receipt.rows, 2);

    let table = stored_table(&store);
    assert_eq!(
        table.cell(0, "participant_id"),
        Some(first.participant_id().to_string().as_str())
    );
    assert_eq!(
        table.cell(1, "participant_id"),
        Some(second.participant_id().to_string().as_str())
    );
}

#[tokio::test]
async fn test_unreachable_dataset_falls_back_to_single_row() {
    let store = MemoryStore::new();
    store.put(REPO, PATH, "participant_id\nearlier\n");
    store.set_fail_reads(true);

    let session = completed_session();
    let receipt = submit(&session, &store, &dataset()).await.expect("submit");

    // The unreadable dataset is replaced by a fresh one holding exactly the
    // new response.
    assert_eq!(receipt.rows, 1);
    store.set_fail_reads(false);
    let table = stored_table(&store);
    assert_eq!(table.row_count(), 1);
    assert_eq!(
        table.cell(0, "participant_id"),
        Some(session.participant_id().to_string().as_str())
    );
}

#[tokio::test]
async fn test_failed_write_preserves_session_and_retry_appends_once() {
    let store = MemoryStore::new();
    let existing = completed_session();
    submit(&existing, &store, &dataset()).await.expect("seed");

    let session = completed_session();
    store.set_fail_writes(true);
    assert!(submit(&session, &store, &dataset()).await.is_err());

    // Nothing moved: dataset unchanged, session still at review.
    assert_eq!(stored_table(&store).row_count(), 1);
    assert_eq!(session.current_step(), Step::Review);

    store.set_fail_writes(false);
    let receipt = submit(&session, &store, &dataset()).await.expect("retry");
    assert_eq!(receipt.rows, 2);
}

#[tokio::test]
async fn test_hostile_free_text_survives_upload_and_reparse() {
    let store = MemoryStore::new();
    let mut session = completed_session();
    let hostile = "calm, then \"uneasy\"\nline two, still \"quoted\"";
    session.set_answer("open_emp", AnswerValue::Text(hostile.to_string()));

    submit(&session, &store, &dataset()).await.expect("submit");
    let table = stored_table(&store);
    assert_eq!(table.cell(0, "open_emp"), Some(hostile));

    // A second participant appends cleanly after the hostile row.
    let other = completed_session();
    submit(&other, &store, &dataset()).await.expect("append");
    let table = stored_table(&store);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.cell(0, "open_emp"), Some(hostile));
}

#[tokio::test]
async fn test_append_unions_columns_with_foreign_dataset() {
    let store = MemoryStore::new();
    store.put(
        REPO,
        PATH,
        "participant_id,legacy_note\nolder,kept as-is\n",
    );

    let session = completed_session();
    submit(&session, &store, &dataset()).await.expect("submit");

    let table = stored_table(&store);
    assert_eq!(table.row_count(), 2);
    // Old row keeps its legacy cell, new columns backfill empty.
    assert_eq!(table.cell(0, "legacy_note"), Some("kept as-is"));
    assert_eq!(table.cell(0, "age"), Some(""));
    // New row leaves the legacy column empty.
    assert_eq!(table.cell(1, "legacy_note"), Some(""));
    assert_eq!(table.cell(1, "age"), Some("25"));
}

#[tokio::test]
async fn test_unanswered_fields_upload_as_empty_cells() {
    let store = MemoryStore::new();
    let mut session = SurveySession::new();
    session.set_consent(true);
    while session.current_step() != Step::Review {
        session.try_continue().expect("walk");
    }

    submit(&session, &store, &dataset()).await.expect("submit");
    let table = stored_table(&store);
    assert_eq!(table.cell(0, "age"), Some(""));
    assert_eq!(table.cell(0, "gad_q1"), Some(""));
    assert_eq!(table.cell(0, "open_more_2"), Some(""));
}
