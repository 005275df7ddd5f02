use serde::{Deserialize, Serialize};

pub const STORY_PROMPT_PREFIX: &str = "Write a short story based on this idea: ";
pub const FALLBACK_STORY_TEXT: &str = "Error generating story. Please try again.";
pub const NARRATION_LANGUAGE: &str = "en-US";

pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models/gpt2";
pub const DEFAULT_SPRITE_URL: &str =
    "https://cdn.pixabay.com/photo/2014/04/02/10/56/robot-304843_960_720.png";

pub const SURFACE_WIDTH: u32 = 600;
pub const SURFACE_HEIGHT: u32 = 200;
pub const SPRITE_Y: i64 = 50;
pub const SPRITE_SIZE: u32 = 100;
pub const SPRITE_STEP: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Idle,
    Requesting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    #[default]
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const DEFAULT: Self = Self {
        width: SURFACE_WIDTH,
        height: SURFACE_HEIGHT,
    };
}

/// Axis-aligned rectangle in surface coordinates. `x`/`y` may be negative or
/// past the surface edge; drawing clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn covering(size: SurfaceSize) -> Self {
        Self::new(0, 0, size.width, size.height)
    }
}

/// Text handed to the speech collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub language: String,
}

impl Utterance {
    pub fn narration(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: NARRATION_LANGUAGE.to_string(),
        }
    }
}

pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
