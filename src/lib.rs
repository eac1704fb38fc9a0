pub mod cli;
pub mod config;
pub mod error;
pub mod flow;
pub mod questionnaire;
pub mod record;
pub mod state;
pub mod store;
pub mod table;
pub mod upload;
pub mod voices;

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use error::SurveyError;
pub use flow::{NavAction, Step, StepFlow};
pub use state::{AnswerValue, Answers};

use questionnaire::{widgets_for, Widget};
use voices::{
    playback_request, PlaybackRequest, Tone, DEFAULT_EMP_SCRIPT, DEFAULT_NEU_SCRIPT, VOICE_LABELS,
};

// ---------------------------------------------------------------------------
// Survey session
// ---------------------------------------------------------------------------

/// One participant's visit: identity, timing, consent, the step machine, and
/// every collected answer. Created at session start, carried through every
/// interaction, discarded at session end. Never shared between participants.
pub struct SurveySession {
    participant_id: Uuid,
    start_ts: DateTime<Utc>,
    consented: bool,
    flow: StepFlow,
    pub answers: Answers,
}

impl SurveySession {
    pub fn new() -> Self {
        SurveySession {
            participant_id: Uuid::new_v4(),
            start_ts: Utc::now(),
            consented: false,
            flow: StepFlow::new(),
            answers: Answers::new(),
        }
    }

    /// Opaque identifier generated once at session start, immutable after.
    pub fn participant_id(&self) -> Uuid {
        self.participant_id
    }

    pub fn start_ts(&self) -> DateTime<Utc> {
        self.start_ts
    }

    pub fn current_step(&self) -> Step {
        self.flow.current()
    }

    pub fn set_consent(&mut self, agreed: bool) {
        self.consented = agreed;
    }

    pub fn consented(&self) -> bool {
        self.consented
    }

    /// Forward navigation, gated on this session's consent flag at the
    /// consent step.
    pub fn try_continue(&mut self) -> Result<Step, SurveyError> {
        self.flow.try_continue(self.consented)
    }

    pub fn go_back(&mut self) -> Option<Step> {
        self.flow.back()
    }

    pub fn take_just_navigated(&mut self) -> bool {
        self.flow.take_just_navigated()
    }

    pub fn progress(&self) -> (usize, usize) {
        self.flow.progress()
    }

    /// The active step's inputs only. Earlier steps' answers stay stored but
    /// are not re-displayed.
    pub fn widgets(&self) -> Vec<Widget> {
        widgets_for(self.current_step())
    }

    pub fn set_answer(&mut self, field: &str, value: AnswerValue) {
        self.answers.set(field, value);
    }

    /// Build the playback triple for a voice session from the chosen voice
    /// and the (possibly edited) script. Falls back to the first catalog
    /// voice and the default stimulus script when nothing has been picked.
    pub fn playback_for(&self, tone: Tone) -> Option<PlaybackRequest> {
        let (voice_field, script_field, default_script) = match tone {
            Tone::Empathetic => ("emp_voice", "emp_script", DEFAULT_EMP_SCRIPT),
            Tone::Neutral => ("neu_voice", "neu_script", DEFAULT_NEU_SCRIPT),
        };
        let voice_label = match self.answers.get(voice_field) {
            Some(AnswerValue::Choice(label)) => label.as_str(),
            _ => VOICE_LABELS[0],
        };
        let script = match self.answers.get(script_field) {
            Some(AnswerValue::Text(text)) if !text.is_empty() => text.as_str(),
            _ => default_script,
        };
        playback_request(script, voice_label, tone)
    }
}

impl Default for SurveySession {
    fn default() -> Self {
        SurveySession::new()
    }
}
