//! UI layer for desktop GUI: the story generator window.

pub mod app;

pub use app::StoryGeneratorApp;
