use crate::state::WidgetState;

pub const GENERATE_LABEL: &str = "Generate Story";
pub const GENERATING_LABEL: &str = "Generating...";

/// What a host renders for a given [`WidgetState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
    pub generate_enabled: bool,
    pub generate_label: &'static str,
    pub story: Option<String>,
    pub narrate_enabled: bool,
    pub play_enabled: bool,
    pub show_canvas: bool,
}

pub fn project(state: &WidgetState) -> WidgetView {
    let has_story = !state.story.is_empty();
    WidgetView {
        generate_enabled: state.can_generate(),
        generate_label: if state.is_requesting() {
            GENERATING_LABEL
        } else {
            GENERATE_LABEL
        },
        story: has_story.then(|| state.story.clone()),
        narrate_enabled: has_story,
        play_enabled: has_story && !state.is_animating(),
        show_canvas: has_story,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_widget_only_shows_disabled_generate() {
        let view = project(&WidgetState::default());
        assert!(!view.generate_enabled);
        assert_eq!(view.generate_label, GENERATE_LABEL);
        assert_eq!(view.story, None);
        assert!(!view.narrate_enabled);
        assert!(!view.play_enabled);
        assert!(!view.show_canvas);
    }

    #[test]
    fn requesting_shows_busy_label_and_disables_generate() {
        let mut state = WidgetState::default();
        state.set_prompt("dragons");
        assert!(project(&state).generate_enabled);

        state.begin_request();
        let view = project(&state);
        assert!(!view.generate_enabled);
        assert_eq!(view.generate_label, GENERATING_LABEL);
    }

    #[test]
    fn running_animation_disables_play_only() {
        let mut state = WidgetState::default();
        state.complete_request("story");
        state.begin_animation();

        let view = project(&state);
        assert_eq!(view.story.as_deref(), Some("story"));
        assert!(view.narrate_enabled);
        assert!(!view.play_enabled);
        assert!(view.show_canvas);
    }
}
