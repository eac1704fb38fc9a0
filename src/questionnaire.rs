//! The survey instrument: every field the study collects, its owning step,
//! its input widget, and its column position in the output record.
//!
//! The registry is the single source of truth — Response State defaults,
//! step widget lists, and the assembler's column order are all derived from
//! it, so the three can never disagree.

use crate::flow::Step;
use crate::voices::{DEFAULT_EMP_SCRIPT, DEFAULT_NEU_SCRIPT, VOICE_LABELS};
use once_cell::sync::Lazy;

// ---------------------------------------------------------------------------
// Input kinds
// ---------------------------------------------------------------------------

/// The widget domain for one field. Validation beyond these constraints is
/// the presentation layer's problem, not this crate's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Free numeric entry within an inclusive range.
    Number { min: u32, max: u32 },
    /// Likert radio row over an inclusive range.
    Scale { min: u32, max: u32 },
    /// Single choice from a fixed option list.
    Choice(&'static [&'static str]),
    /// Single-line free text.
    Text,
    /// Multi-line free text.
    TextArea,
}

// ---------------------------------------------------------------------------
// Field registry
// ---------------------------------------------------------------------------

/// One logical field. A `prompt` of `None` means the field is reserved in
/// session state but currently has no visible widget (the post-session item
/// groups). `recorded` controls whether the field becomes an output column.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub step: Step,
    pub kind: InputKind,
    pub prompt: Option<String>,
    pub default_text: Option<&'static str>,
    pub recorded: bool,
}

/// A visible input for the active step, handed to the presentation layer.
#[derive(Debug, Clone)]
pub struct Widget {
    pub field: String,
    pub prompt: String,
    pub kind: InputKind,
}

pub const YES_NO: &[&str] = &["Yes", "No"];

pub const GENDER_OPTIONS: &[&str] = &[
    "Female",
    "Male",
    "Non-binary/Other (specify)",
    "Prefer not to say",
];

pub const EDUCATION_OPTIONS: &[&str] = &[
    "High school or less",
    "Some college/Associate's",
    "Bachelor's degree",
    "Postgraduate degree",
];

pub const TECH_COMFORT_OPTIONS: &[&str] =
    &["Not at all", "Slightly", "Moderately", "Very", "Extremely"];

pub const GAD_IMPACT_OPTIONS: &[&str] = &["Not difficult", "Somewhat", "Very", "Extremely"];

pub const GAD7_ITEMS: [&str; 7] = [
    "Feeling nervous, anxious, or on edge.",
    "Not being able to stop or control worrying.",
    "Worrying too much about different things.",
    "Trouble relaxing.",
    "Being so restless that it is hard to sit still.",
    "Becoming easily annoyed or irritable.",
    "Feeling afraid as if something awful might happen.",
];

pub const PANAS_ITEMS: [&str; 10] = [
    "Interested",
    "Distressed",
    "Excited",
    "Upset",
    "Strong",
    "Guilty",
    "Scared",
    "Hostile (Aggressive)",
    "Enthusiastic",
    "Proud",
];

pub const EMPATHETIC_ITEMS: [&str; 8] = [
    "I felt the voice was warm and caring.",
    "The voice seemed to understand or respond to my feelings.",
    "I felt comfortable listening to this voice.",
    "The voice spoke in a calm, soothing tone.",
    "I would trust this voice to give helpful advice.",
    "The voice helped me feel supported.",
    "The pace (speed) of the voice's speech was comfortable.",
    "I found it easy to pay attention to this voice.",
];

pub const NEUTRAL_ITEMS: [&str; 8] = [
    "The voice sounded neutral or robotic (monotone).",
    "I felt the voice gave factual, impersonal responses.",
    "I felt comfortable listening to this voice.",
    "I would trust this voice to give accurate information.",
    "The voice's tone seemed emotionless.",
    "The pace of the voice's speech was comfortable.",
    "I found it easy to pay attention to this voice.",
    "The voice delivered the information clearly and understandably.",
];

const OPEN_PROMPTS: [(&str, &str); 10] = [
    (
        "open_emp",
        "How did you feel during and after interacting with the empathetic AI voice? \
What kinds of emotions, thoughts, or reactions did it bring up for you?",
    ),
    (
        "open_neu",
        "How did you feel during and after interacting with the neutral or robotic AI voice? \
What kinds of emotions, thoughts, or reactions did it bring up for you?",
    ),
    (
        "open_compare",
        "What differences, if any, did you notice between the two voices in terms of how they \
made you feel? Which one made you feel more comfortable or anxious, and why?",
    ),
    (
        "open_pref",
        "Which voice did you prefer overall? What specific features (tone, pace, warmth, etc.) \
did you like or dislike about each voice?",
    ),
    (
        "open_empathy",
        "Did the empathetic voice make you feel understood or cared for in any way? If so, can \
you describe a moment or response that gave you that feeling?",
    ),
    (
        "open_trust",
        "Did you feel that either voice was trustworthy or helpful? Why or why not? In what \
ways did the voice help (or fail to help) you feel supported?",
    ),
    (
        "open_triggers",
        "Was there anything in either voice interaction that made you feel uneasy, anxious, or \
emotionally uncomfortable? Please explain if so.",
    ),
    (
        "open_improve",
        "If you could improve or change anything about the voices or how the interaction \
worked, what would you recommend to make it more helpful or emotionally supportive?",
    ),
    (
        "open_more_1",
        "Is there anything else you'd like to share about your experience in this study?",
    ),
    (
        "open_more_2",
        "Any thoughts that haven't been covered by the previous questions?",
    ),
];

/// Informed-consent statement shown on the first step.
pub const CONSENT_TEXT: &str = "You are invited to participate in a study on how different AI \
voices affect emotional well-being. You will listen to two kinds of AI voices (one \
warm/empathetic and one neutral/robotic) and answer some questions. Your participation is \
completely voluntary; you may skip any question or stop at any time without penalty. All \
answers are confidential and anonymous and will be used only for research purposes. By \
continuing, you acknowledge that you understand the information above and agree to participate.";

pub const CONSENT_PROMPT: &str = "I agree to participate.";

fn field(
    name: impl Into<String>,
    step: Step,
    kind: InputKind,
    prompt: impl Into<String>,
) -> FieldSpec {
    FieldSpec {
        name: name.into(),
        step,
        kind,
        prompt: Some(prompt.into()),
        default_text: None,
        recorded: true,
    }
}

/// A reserved field: lives in session state, has no widget.
fn reserved(name: String, step: Step, kind: InputKind) -> FieldSpec {
    FieldSpec {
        name,
        step,
        kind,
        prompt: None,
        default_text: None,
        recorded: true,
    }
}

fn session_fields(
    fields: &mut Vec<FieldSpec>,
    step: Step,
    prefix: &str,
    tone_name: &str,
    items: &[&str],
    default_script: &'static str,
) {
    fields.push(FieldSpec {
        name: format!("{}_voice", prefix),
        step,
        kind: InputKind::Choice(&VOICE_LABELS),
        prompt: Some(format!("Choose {} voice:", tone_name)),
        default_text: None,
        recorded: false,
    });
    fields.push(FieldSpec {
        name: format!("{}_script", prefix),
        step,
        kind: InputKind::TextArea,
        prompt: Some(format!("{} script:", capitalize(tone_name))),
        default_text: Some(default_script),
        recorded: false,
    });
    for (i, item) in items.iter().enumerate() {
        fields.push(field(
            format!("{}_q{}", prefix, i + 1),
            step,
            InputKind::Scale { min: 1, max: 5 },
            *item,
        ));
    }
    fields.push(field(
        format!("{}_state_anxiety", prefix),
        step,
        InputKind::Scale { min: 1, max: 5 },
        format!(
            "After this {} voice session, how anxious did you feel during the session? \
(1 = not at all anxious, 5 = extremely anxious)",
            tone_name
        ),
    ));
    for i in 1..=7 {
        fields.push(reserved(
            format!("{}_post_q{}", prefix, i),
            step,
            InputKind::Scale { min: 1, max: 5 },
        ));
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Ordered field registry. Registry order is both the presentation order
/// within each step and the output record's column order.
pub static REGISTRY: Lazy<Vec<FieldSpec>> = Lazy::new(|| {
    let mut fields = Vec::new();

    // Demographics
    fields.push(field(
        "age",
        Step::Demographics,
        InputKind::Number { min: 18, max: 120 },
        "Enter your age (years)",
    ));
    fields.push(field(
        "gender",
        Step::Demographics,
        InputKind::Choice(GENDER_OPTIONS),
        "Your gender",
    ));
    fields.push(field(
        "gender_other",
        Step::Demographics,
        InputKind::Text,
        "If other, please specify:",
    ));
    fields.push(field(
        "education",
        Step::Demographics,
        InputKind::Choice(EDUCATION_OPTIONS),
        "Select your highest education level",
    ));
    fields.push(field(
        "voice_exp",
        Step::Demographics,
        InputKind::Choice(YES_NO),
        "Do you have any voice technology experience?",
    ));
    fields.push(field(
        "used_assistants",
        Step::Demographics,
        InputKind::Choice(YES_NO),
        "Have you used voice assistants (e.g. Siri, Alexa) before?",
    ));
    fields.push(field(
        "tech_comfort",
        Step::Demographics,
        InputKind::Choice(TECH_COMFORT_OPTIONS),
        "How comfortable are you with using technology (e.g., smartphones, computers, voice assistants)?",
    ));

    // Baseline: GAD-7, impact, PANAS, single-item mood
    for (i, item) in GAD7_ITEMS.iter().enumerate() {
        fields.push(field(
            format!("gad_q{}", i + 1),
            Step::Baseline,
            InputKind::Scale { min: 1, max: 4 },
            *item,
        ));
    }
    fields.push(field(
        "gad_impact",
        Step::Baseline,
        InputKind::Choice(GAD_IMPACT_OPTIONS),
        "If you checked any problems above, how difficult have these made it for you to do \
your work, take care of things at home, or get along with other people?",
    ));
    for (i, item) in PANAS_ITEMS.iter().enumerate() {
        fields.push(field(
            format!("panas_q{}", i + 1),
            Step::Baseline,
            InputKind::Scale { min: 1, max: 5 },
            *item,
        ));
    }
    fields.push(field(
        "single_mood",
        Step::Baseline,
        InputKind::Scale { min: 1, max: 5 },
        "Overall, right now I feel… (1 = very negative, 5 = very positive)",
    ));

    // Voice sessions
    session_fields(
        &mut fields,
        Step::SessionEmp,
        "emp",
        "empathetic",
        &EMPATHETIC_ITEMS,
        DEFAULT_EMP_SCRIPT,
    );
    session_fields(
        &mut fields,
        Step::SessionNeu,
        "neu",
        "neutral",
        &NEUTRAL_ITEMS,
        DEFAULT_NEU_SCRIPT,
    );

    // Open-ended
    for (name, prompt) in OPEN_PROMPTS {
        fields.push(field(name, Step::Open, InputKind::TextArea, prompt));
    }

    fields
});

pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    REGISTRY.iter().find(|f| f.name == name)
}

/// Only the active step's visible inputs, in registry order. Idempotent
/// given the step — re-invoking after any interaction yields the same list.
pub fn widgets_for(step: Step) -> Vec<Widget> {
    REGISTRY
        .iter()
        .filter(|f| f.step == step)
        .filter_map(|f| {
            f.prompt.as_ref().map(|prompt| Widget {
                field: f.name.clone(),
                prompt: prompt.clone(),
                kind: f.kind,
            })
        })
        .collect()
}
