//! Backend commands queued from UI to backend worker.

pub enum BackendCommand {
    SetPrompt { text: String },
    GenerateStory,
    Narrate,
    PlayAnimation,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetPrompt { .. } => "set_prompt",
            Self::GenerateStory => "generate_story",
            Self::Narrate => "narrate",
            Self::PlayAnimation => "play_animation",
        }
    }
}
