use crate::error::SurveyError;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Step enum
// ---------------------------------------------------------------------------

/// One named screen in the fixed survey sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Consent,
    Demographics,
    Baseline,
    SessionEmp,
    SessionNeu,
    Open,
    Review,
}

impl Step {
    /// The full sequence in forward order.
    pub const ALL: [Step; 7] = [
        Step::Consent,
        Step::Demographics,
        Step::Baseline,
        Step::SessionEmp,
        Step::SessionNeu,
        Step::Open,
        Step::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Consent => "consent",
            Step::Demographics => "demographics",
            Step::Baseline => "baseline",
            Step::SessionEmp => "session_emp",
            Step::SessionNeu => "session_neu",
            Step::Open => "open",
            Step::Review => "review",
        }
    }

    pub fn from_str_loose(s: &str) -> Result<Self, String> {
        Step::ALL
            .iter()
            .find(|step| step.as_str() == s.to_lowercase())
            .copied()
            .ok_or_else(|| format!("Unknown step: {}", s))
    }

    /// Zero-based position in the sequence.
    pub fn index(&self) -> usize {
        Step::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or_default()
    }

    /// Forward neighbour, if any. `Review` has none.
    pub fn next(&self) -> Option<Step> {
        Step::ALL.get(self.index() + 1).copied()
    }

    /// Backward neighbour, if any. `Consent` has none.
    pub fn prev(&self) -> Option<Step> {
        self.index().checked_sub(1).map(|i| Step::ALL[i])
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Navigation actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Back,
    Continue,
}

// ---------------------------------------------------------------------------
// StepFlow — the survey state machine
// ---------------------------------------------------------------------------

/// Tracks the active step and the one-shot "just navigated" flag used by the
/// presentation layer to scroll back to the top after a transition.
///
/// The machine is strictly linear: `Continue` and `Back` walk the adjacency
/// in [`Step::ALL`]. The only conditional edge is consent -> demographics,
/// which requires the consent flag.
#[derive(Debug, Clone)]
pub struct StepFlow {
    current: Step,
    just_navigated: bool,
}

impl StepFlow {
    pub fn new() -> Self {
        StepFlow {
            current: Step::Consent,
            just_navigated: false,
        }
    }

    pub fn current(&self) -> Step {
        self.current
    }

    /// Advance to the next step. Fails with [`SurveyError::ConsentRequired`]
    /// when leaving `consent` without the flag set, and with
    /// [`SurveyError::EndOfSurvey`] at the terminal `review` step. On failure
    /// the current step is unchanged and no navigation flag is raised.
    pub fn try_continue(&mut self, consent_given: bool) -> Result<Step, SurveyError> {
        if self.current == Step::Consent && !consent_given {
            return Err(SurveyError::ConsentRequired);
        }
        let next = self
            .current
            .next()
            .ok_or(SurveyError::EndOfSurvey(self.current))?;
        self.current = next;
        self.just_navigated = true;
        Ok(next)
    }

    /// Step backward. Returns `None` (and stays put) at `consent`.
    pub fn back(&mut self) -> Option<Step> {
        let prev = self.current.prev()?;
        self.current = prev;
        self.just_navigated = true;
        Some(prev)
    }

    pub fn apply(&mut self, action: NavAction, consent_given: bool) -> Result<Option<Step>, SurveyError> {
        match action {
            NavAction::Continue => self.try_continue(consent_given).map(Some),
            NavAction::Back => Ok(self.back()),
        }
    }

    /// Consume the one-shot navigation flag. True exactly once after each
    /// accepted transition.
    pub fn take_just_navigated(&mut self) -> bool {
        std::mem::take(&mut self.just_navigated)
    }

    /// (current position, total), one-based, for the progress indicator.
    pub fn progress(&self) -> (usize, usize) {
        (self.current.index() + 1, Step::ALL.len())
    }
}

impl Default for StepFlow {
    fn default() -> Self {
        StepFlow::new()
    }
}
