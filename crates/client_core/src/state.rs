//! Widget state and the only transitions allowed to mutate it.

use shared::{
    domain::{is_blank, AnimationState, RequestState},
    protocol::wrap_prompt,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetState {
    pub prompt: String,
    pub request: RequestState,
    pub story: String,
    pub animation: AnimationState,
}

impl WidgetState {
    pub fn set_prompt(&mut self, text: impl Into<String>) {
        self.prompt = text.into();
    }

    pub fn can_generate(&self) -> bool {
        self.request == RequestState::Idle && !is_blank(&self.prompt)
    }

    /// Enters `Requesting` and returns the wrapped prompt to send, or `None`
    /// when the prompt is blank or a request is already outstanding.
    pub fn begin_request(&mut self) -> Option<String> {
        if !self.can_generate() {
            return None;
        }
        self.request = RequestState::Requesting;
        Some(wrap_prompt(&self.prompt))
    }

    /// Story is stored before the busy flag clears.
    pub fn complete_request(&mut self, story: impl Into<String>) {
        self.story = story.into();
        self.request = RequestState::Idle;
    }

    pub fn is_requesting(&self) -> bool {
        self.request == RequestState::Requesting
    }

    pub fn begin_animation(&mut self) -> bool {
        if self.animation == AnimationState::Running {
            return false;
        }
        self.animation = AnimationState::Running;
        true
    }

    pub fn finish_animation(&mut self) {
        self.animation = AnimationState::Idle;
    }

    pub fn is_animating(&self) -> bool {
        self.animation == AnimationState::Running
    }

    pub fn narration_text(&self) -> Option<&str> {
        (!self.story.is_empty()).then_some(self.story.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_prompt_does_not_begin_request() {
        let mut state = WidgetState::default();
        for prompt in ["", "   ", "\n\t "] {
            state.set_prompt(prompt);
            assert_eq!(state.begin_request(), None);
            assert_eq!(state.request, RequestState::Idle);
        }
    }

    #[test]
    fn begin_request_wraps_untrimmed_prompt_and_blocks_reentry() {
        let mut state = WidgetState::default();
        state.set_prompt(" a robot in space");

        assert_eq!(
            state.begin_request().as_deref(),
            Some("Write a short story based on this idea:  a robot in space")
        );
        assert!(state.is_requesting());
        assert_eq!(state.begin_request(), None);

        state.complete_request("A robot drifted...");
        assert_eq!(state.story, "A robot drifted...");
        assert!(!state.is_requesting());
    }

    #[test]
    fn animation_guard_rejects_second_start() {
        let mut state = WidgetState::default();
        assert!(state.begin_animation());
        assert!(!state.begin_animation());
        state.finish_animation();
        assert!(state.begin_animation());
    }

    #[test]
    fn narration_text_requires_story() {
        let mut state = WidgetState::default();
        assert_eq!(state.narration_text(), None);
        state.complete_request("tale");
        assert_eq!(state.narration_text(), Some("tale"));
    }
}
