use serde::{Deserialize, Serialize};

pub const TIMED_MODE: &str = "timed";

const DEFAULT_EFFECT_DURATION_MS: u64 = 700;

/// Game configuration as found in `app.config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    pub default_locale: String,
    pub enabled_modes: Vec<String>,
    pub default_mode: String,
    pub timer: TimerConfig,
    pub selection: SelectionConfig,
    pub input: InputConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
    pub answer_card: AnswerCardConfig,
    pub images: ImagesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimerConfig {
    pub enabled: bool,
    pub durations: Vec<u32>,
    pub default: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SelectionStrategy {
    Sequential,
    Random,
    Shuffled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectionConfig {
    pub strategy: SelectionStrategy,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InputConfig {
    pub normalize_case: bool,
    #[serde(default)]
    pub normalize_diacritics: bool,
    #[serde(default = "default_true")]
    pub autosubmit_on_enter: bool,
    #[serde(default)]
    pub focus_on_image_tap: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Motion {
    Collide,
    Bounce,
    Flash,
    None,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IncorrectKind {
    Shake,
    Border,
    None,
}

/// Feedback for a wrong answer: either just the kind, or the kind plus the
/// size of the overlay drawn on top of the cards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum IncorrectEffect {
    Kind(IncorrectKind),
    Detailed {
        #[serde(rename = "type")]
        kind: IncorrectKind,
        #[serde(
            rename = "overlaySizePct",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        overlay_size_pct: Option<u8>,
    },
}

impl IncorrectEffect {
    pub fn kind(&self) -> IncorrectKind {
        match self {
            IncorrectEffect::Kind(kind) => *kind,
            IncorrectEffect::Detailed { kind, .. } => *kind,
        }
    }

    pub fn overlay_size_pct(&self) -> Option<u8> {
        match self {
            IncorrectEffect::Kind(_) => None,
            IncorrectEffect::Detailed {
                overlay_size_pct, ..
            } => *overlay_size_pct,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoundCompleteEffect {
    Confetti,
    None,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CorrectEffect {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion: Option<Motion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EffectsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<CorrectEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incorrect: Option<IncorrectEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_complete: Option<RoundCompleteEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl EffectsConfig {
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms.unwrap_or(DEFAULT_EFFECT_DURATION_MS)
    }

    pub fn correct_motion(&self) -> Motion {
        self.correct
            .as_ref()
            .and_then(|c| c.motion)
            .unwrap_or(Motion::None)
    }

    pub fn incorrect_kind(&self) -> IncorrectKind {
        self.incorrect
            .map(|i| i.kind())
            .unwrap_or(IncorrectKind::None)
    }

    pub fn confetti_on_complete(&self) -> bool {
        self.round_complete == Some(RoundCompleteEffect::Confetti)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Transition {
    Fade,
    Slide,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerCardConfig {
    pub show_image: bool,
    pub transition: Transition,
    pub duration_ms: u64,
    pub dismiss_on_click: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImagesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefer_formats: Option<Vec<String>>,
    pub tiers: Vec<u32>,
    #[serde(rename = "budgetKB")]
    pub budget_kb: f64,
}

impl ImagesConfig {
    pub fn formats(&self) -> Vec<String> {
        match &self.prefer_formats {
            Some(formats) if !formats.is_empty() => formats.clone(),
            _ => vec!["webp".to_string()],
        }
    }
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Whether a session started in `mode` runs against the clock
    pub fn is_timed(&self, mode: &str) -> bool {
        mode == TIMED_MODE && self.timer.enabled
    }

    /// The enabled mode after `mode`, wrapping around
    pub fn mode_after(&self, mode: &str) -> String {
        let pos = self.enabled_modes.iter().position(|m| m == mode);
        match pos {
            Some(i) => self.enabled_modes[(i + 1) % self.enabled_modes.len()].clone(),
            None => self.default_mode.clone(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: Some(1),
            default_locale: "nb".to_string(),
            enabled_modes: vec!["untimed".to_string(), TIMED_MODE.to_string()],
            default_mode: "untimed".to_string(),
            timer: TimerConfig {
                enabled: true,
                durations: vec![30, 60, 90],
                default: 60,
            },
            selection: SelectionConfig {
                strategy: SelectionStrategy::Shuffled,
                seed: None,
            },
            input: InputConfig {
                normalize_case: true,
                normalize_diacritics: false,
                autosubmit_on_enter: true,
                focus_on_image_tap: true,
            },
            effects: EffectsConfig {
                correct: Some(CorrectEffect {
                    motion: Some(Motion::Collide),
                }),
                incorrect: Some(IncorrectEffect::Kind(IncorrectKind::Shake)),
                round_complete: Some(RoundCompleteEffect::Confetti),
                duration_ms: Some(DEFAULT_EFFECT_DURATION_MS),
            },
            answer_card: AnswerCardConfig {
                show_image: true,
                transition: Transition::Fade,
                duration_ms: 1500,
                dismiss_on_click: true,
            },
            images: ImagesConfig {
                prefer_formats: Some(vec!["webp".to_string(), "png".to_string()]),
                tiers: vec![320, 640],
                budget_kb: 120.0,
            },
        }
    }
}
