//! UI/backend events and error modeling for desktop GUI controller.

use client_core::WidgetState;

pub enum UiEvent {
    Info(String),
    State(WidgetState),
    FrameDrawn,
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Animation,
}

#[derive(Debug, Clone)]
pub struct UiError {
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_line(&self) -> String {
        match self.context {
            UiErrorContext::BackendStartup => format!("Startup error: {}", self.message),
            UiErrorContext::Animation => format!("Animation stopped: {}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_failure_status_names_the_stop() {
        let err = UiError::new(
            UiErrorContext::Animation,
            "sprite request to https://cdn.example/robot.png failed: 404 Not Found",
        );
        assert_eq!(
            err.status_line(),
            "Animation stopped: sprite request to https://cdn.example/robot.png failed: 404 Not Found"
        );
    }

    #[test]
    fn startup_failure_status_keeps_message() {
        let err = UiError::new(
            UiErrorContext::BackendStartup,
            "backend worker startup failure: failed to build runtime",
        );
        assert_eq!(err.context(), UiErrorContext::BackendStartup);
        assert_eq!(
            err.status_line(),
            "Startup error: backend worker startup failure: failed to build runtime"
        );
    }
}
