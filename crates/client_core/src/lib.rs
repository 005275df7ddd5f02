use std::sync::Arc;

use shared::{
    domain::{Utterance, FALLBACK_STORY_TEXT},
    error::InferenceError,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

pub mod animation;
pub mod assets;
pub mod config;
pub mod inference;
pub mod speech;
pub mod state;
pub mod surface;
pub mod view;

pub use animation::{run_slide, FrameClock, IntervalFrameClock, SpriteSlide};
pub use assets::{HttpImageLoader, ImageLoader};
pub use config::Settings;
pub use inference::{HttpInferenceClient, InferenceBackend, MissingInferenceBackend};
pub use speech::{EspeakSpeechOutput, SpeechOutput};
pub use state::WidgetState;
pub use surface::{DrawingSurface, RasterSurface, SpriteImage};
pub use view::{project, WidgetView};

const EVENT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    StateChanged(WidgetState),
    StoryReady { text: String, fallback: bool },
    NarrationRequested,
    FrameDrawn { x: i64 },
    AnimationFinished { frames: u32 },
    AnimationFailed(String),
}

/// The collaborators a [`StoryClient`] drives.
#[derive(Clone)]
pub struct Collaborators {
    pub inference: Arc<dyn InferenceBackend>,
    pub speech: Arc<dyn SpeechOutput>,
    pub images: Arc<dyn ImageLoader>,
    pub surface: Arc<dyn DrawingSurface>,
    pub clock: Arc<dyn FrameClock>,
}

impl Collaborators {
    /// Real HTTP, espeak-ng and timer collaborators drawing into `surface`.
    pub fn from_settings(settings: &Settings, surface: Arc<dyn DrawingSurface>) -> Self {
        if settings.inference_token.is_none() {
            warn!("no inference token configured; sending anonymous requests");
        }
        let http = reqwest::Client::new();
        Self {
            inference: Arc::new(HttpInferenceClient::with_client(
                http.clone(),
                settings.inference_url.clone(),
                settings.inference_token.clone(),
            )),
            speech: Arc::new(EspeakSpeechOutput::new(settings.espeak_bin.clone())),
            images: Arc::new(HttpImageLoader::with_client(
                http,
                settings.sprite_url.clone(),
            )),
            surface,
            clock: Arc::new(IntervalFrameClock::new(settings.frame_interval())),
        }
    }
}

/// One story-generator widget: its state plus the collaborators it talks to.
pub struct StoryClient {
    inner: Mutex<WidgetState>,
    collaborators: Collaborators,
    slide: SpriteSlide,
    events: broadcast::Sender<WidgetEvent>,
}

impl StoryClient {
    pub fn new(collaborators: Collaborators) -> Arc<Self> {
        Self::with_slide(collaborators, SpriteSlide::default())
    }

    pub fn with_slide(collaborators: Collaborators, slide: SpriteSlide) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            inner: Mutex::new(WidgetState::default()),
            collaborators,
            slide,
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<WidgetEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> WidgetState {
        self.inner.lock().await.clone()
    }

    pub async fn view(&self) -> WidgetView {
        project(&*self.inner.lock().await)
    }

    pub async fn set_prompt(&self, text: impl Into<String>) {
        let mut state = self.inner.lock().await;
        state.set_prompt(text);
        self.publish_state(&state);
    }

    /// Requests a story for the current prompt. Returns `None` without touching
    /// the network when the prompt is blank or a request is already running.
    pub async fn generate_story(&self) -> Option<String> {
        let inputs = {
            let mut state = self.inner.lock().await;
            let inputs = state.begin_request()?;
            self.publish_state(&state);
            inputs
        };
        info!(prompt_chars = inputs.chars().count(), "story request started");

        let outcome = self.collaborators.inference.generate(&inputs).await;
        let (story, fallback) = settle_outcome(outcome);

        let mut state = self.inner.lock().await;
        state.complete_request(story.clone());
        let _ = self.events.send(WidgetEvent::StoryReady {
            text: story.clone(),
            fallback,
        });
        self.publish_state(&state);
        info!(fallback, story_chars = story.chars().count(), "story request settled");
        Some(story)
    }

    /// Hands the story to the speech collaborator. Returns whether anything was
    /// sent.
    pub async fn narrate(&self) -> bool {
        let text = {
            let state = self.inner.lock().await;
            match state.narration_text() {
                Some(text) => text.to_string(),
                None => return false,
            }
        };
        self.collaborators.speech.speak(Utterance::narration(text));
        let _ = self.events.send(WidgetEvent::NarrationRequested);
        true
    }

    /// Starts the sprite slide on a background task. Returns `false` if an
    /// animation is already running.
    pub async fn play_animation(self: &Arc<Self>) -> bool {
        {
            let mut state = self.inner.lock().await;
            if !state.begin_animation() {
                debug!("animation already running; ignoring trigger");
                return false;
            }
            self.publish_state(&state);
        }
        info!("animation started");

        let client = Arc::clone(self);
        tokio::spawn(async move {
            client.drive_animation().await;
        });
        true
    }

    async fn drive_animation(&self) {
        let outcome = match self.collaborators.images.load().await {
            Ok(sprite) => {
                let events = self.events.clone();
                let frames = run_slide(
                    self.collaborators.surface.as_ref(),
                    &sprite,
                    self.slide,
                    self.collaborators.clock.as_ref(),
                    move |x| {
                        let _ = events.send(WidgetEvent::FrameDrawn { x });
                    },
                )
                .await;
                info!(frames, "animation finished");
                WidgetEvent::AnimationFinished { frames }
            }
            Err(err) => {
                warn!("sprite load failed, animation aborted: {err:#}");
                WidgetEvent::AnimationFailed(format!("{err:#}"))
            }
        };

        let mut state = self.inner.lock().await;
        state.finish_animation();
        let _ = self.events.send(outcome);
        self.publish_state(&state);
    }

    fn publish_state(&self, state: &WidgetState) {
        let _ = self.events.send(WidgetEvent::StateChanged(state.clone()));
    }
}

fn settle_outcome(outcome: Result<String, InferenceError>) -> (String, bool) {
    match outcome {
        Ok(text) => (text, false),
        Err(err) => {
            warn!(kind = err.kind(), "story generation failed: {err}");
            (FALLBACK_STORY_TEXT.to_string(), true)
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
