use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Voice catalog
// ---------------------------------------------------------------------------

/// Rendering parameters for one catalog voice. `lang`/`tld` identify the
/// synthesis engine voice; `rate` and `pitch` are relative to the engine
/// defaults (1.0 = unmodified).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceConfig {
    pub label: &'static str,
    pub gender: &'static str,
    pub accent: &'static str,
    pub description: &'static str,
    pub lang: &'static str,
    pub tld: &'static str,
    pub rate: f32,
    pub pitch: f32,
}

pub const VOICE_CATALOG: [VoiceConfig; 5] = [
    VoiceConfig {
        label: "English (US) - Female",
        gender: "Female",
        accent: "American",
        description: "Warm, friendly American female voice",
        lang: "en",
        tld: "us",
        rate: 1.0,
        pitch: 1.0,
    },
    VoiceConfig {
        label: "English (UK) - Female",
        gender: "Female",
        accent: "British",
        description: "Professional British female voice",
        lang: "en",
        tld: "co.uk",
        rate: 1.0,
        pitch: 1.0,
    },
    VoiceConfig {
        label: "English (Australia) - Female",
        gender: "Female",
        accent: "Australian",
        description: "Casual Australian female voice",
        lang: "en",
        tld: "com.au",
        rate: 1.0,
        pitch: 1.0,
    },
    VoiceConfig {
        label: "English (US) - Slow",
        gender: "Neutral",
        accent: "American",
        description: "Slower, more deliberate American voice",
        lang: "en",
        tld: "us",
        rate: 0.75,
        pitch: 0.95,
    },
    VoiceConfig {
        label: "English (UK) - Slow",
        gender: "Neutral",
        accent: "British",
        description: "Slower, more measured British voice",
        lang: "en",
        tld: "co.uk",
        rate: 0.75,
        pitch: 0.95,
    },
];

/// Catalog labels in declaration order, for choice widgets.
pub const VOICE_LABELS: [&str; 5] = [
    "English (US) - Female",
    "English (UK) - Female",
    "English (Australia) - Female",
    "English (US) - Slow",
    "English (UK) - Slow",
];

pub fn voice_by_label(label: &str) -> Option<&'static VoiceConfig> {
    VOICE_CATALOG.iter().find(|v| v.label == label)
}

// ---------------------------------------------------------------------------
// Tone transform
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Empathetic,
    Neutral,
}

impl Tone {
    pub fn from_str_loose(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "empathetic" => Ok(Tone::Empathetic),
            "neutral" => Ok(Tone::Neutral),
            _ => Err(format!("Unknown tone: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Empathetic => "empathetic",
            Tone::Neutral => "neutral",
        }
    }

    /// The ordered substitution rules applied by [`preprocess_for_tone`].
    pub fn rules(&self) -> &'static [ToneRule] {
        match self {
            Tone::Empathetic => EMPATHETIC_RULES,
            Tone::Neutral => NEUTRAL_RULES,
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One literal substring substitution. Rules are applied in declaration
/// order over the whole text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneRule {
    pub pattern: &'static str,
    pub replacement: &'static str,
}

/// Softer phrasing and pause markers after sentence and clause boundaries.
pub const EMPATHETIC_RULES: &[ToneRule] = &[
    ToneRule { pattern: ".", replacement: "... " },
    ToneRule { pattern: ",", replacement: ", " },
    ToneRule { pattern: "breath", replacement: "slow, deep breath" },
];

/// Clinical phrasing: expanded contractions, flattened affect words.
pub const NEUTRAL_RULES: &[ToneRule] = &[
    ToneRule { pattern: "I'm", replacement: "I am" },
    ToneRule { pattern: "you're", replacement: "you are" },
    ToneRule { pattern: "it's", replacement: "it is" },
    ToneRule { pattern: "glad", replacement: "pleased" },
    ToneRule { pattern: "wonderful", replacement: "acceptable" },
];

/// Rewrite a script so it reads more empathetic or more neutral. Pure; the
/// transformed text is handed to the external playback mechanism.
pub fn preprocess_for_tone(text: &str, tone: Tone) -> String {
    tone.rules()
        .iter()
        .fold(text.to_string(), |acc, rule| acc.replace(rule.pattern, rule.replacement))
}

// ---------------------------------------------------------------------------
// Playback boundary
// ---------------------------------------------------------------------------

/// Everything the external speech-synthesis mechanism needs for one session:
/// the tone-processed script, the tone, and the chosen voice. Playback
/// success or failure is not observed by this crate.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackRequest {
    pub script: String,
    pub tone: Tone,
    pub voice: &'static VoiceConfig,
}

/// Build a playback request for a catalog voice, applying the tone rules to
/// the script. Returns `None` for a label not in the catalog.
pub fn playback_request(script: &str, voice_label: &str, tone: Tone) -> Option<PlaybackRequest> {
    let voice = voice_by_label(voice_label)?;
    Some(PlaybackRequest {
        script: preprocess_for_tone(script, tone),
        tone,
        voice,
    })
}

/// Default stimulus script for the empathetic session.
pub const DEFAULT_EMP_SCRIPT: &str = "Hi, I'm glad you're here. I know life can feel overwhelming sometimes, \
and it's completely okay to have moments of stress or worry. \
You're not alone in feeling this way. Take a slow breath with me… inhale… and exhale. \
You're doing your best, and that's enough. Remember, even small steps forward matter. \
You deserve kindness, and I'm proud of you for taking this moment for yourself.";

/// Default stimulus script for the neutral session.
pub const DEFAULT_NEU_SCRIPT: &str = "Hello, thank you for participating in this session. \
In a moment, you will be asked to reflect on your current feelings. \
This is simply a part of the study procedure. \
Please listen carefully and respond as instructed. \
There are no right or wrong answers. \
Your participation is valuable, and your responses will help us better understand voice interactions.";
