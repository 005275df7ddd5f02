//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread, time::Duration};

use client_core::{
    Collaborators, RasterSurface, Settings, StoryClient, WidgetEvent, WidgetState,
};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::sync::broadcast::error::RecvError;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

const PENDING_STATE_RETRY: Duration = Duration::from_millis(50);

pub fn launch(
    settings: Settings,
    surface: Arc<RasterSurface>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = StoryClient::new(Collaborators::from_settings(&settings, surface));
            spawn_event_forwarder(&client, ui_tx.clone());
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::SetPrompt { text } => client.set_prompt(text).await,
                    BackendCommand::GenerateStory => {
                        let client = Arc::clone(&client);
                        tokio::spawn(async move {
                            client.generate_story().await;
                        });
                    }
                    BackendCommand::Narrate => {
                        client.narrate().await;
                    }
                    BackendCommand::PlayAnimation => {
                        client.play_animation().await;
                    }
                }
            }
            tracing::info!("ui command queue closed; backend worker exiting");
        });
    });
}

fn spawn_event_forwarder(client: &Arc<StoryClient>, ui_tx: Sender<UiEvent>) {
    let mut events = client.subscribe_events();
    tokio::spawn(async move {
        // Latest state the UI queue had no room for.
        let mut pending_state: Option<WidgetState> = None;
        loop {
            let event = tokio::select! {
                received = events.recv() => match received {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "ui event forwarder lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = tokio::time::sleep(PENDING_STATE_RETRY), if pending_state.is_some() => {
                    if !flush_pending_state(&ui_tx, &mut pending_state) {
                        break;
                    }
                    continue;
                }
            };
            let Some(ui_event) = to_ui_event(event) else {
                continue;
            };
            if !forward_ui_event(&ui_tx, &mut pending_state, ui_event) {
                break;
            }
        }
    });
}

/// Non-blocking hand-off to the UI queue. On a full queue, states are kept for
/// retry (newest wins) and everything else is dropped. Returns `false` once the
/// UI side is gone.
fn forward_ui_event(
    ui_tx: &Sender<UiEvent>,
    pending_state: &mut Option<WidgetState>,
    event: UiEvent,
) -> bool {
    if let UiEvent::State(state) = event {
        *pending_state = Some(state);
        return flush_pending_state(ui_tx, pending_state);
    }
    if !flush_pending_state(ui_tx, pending_state) {
        return false;
    }
    match ui_tx.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::debug!("ui event queue full; dropping event");
            true
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}

fn flush_pending_state(ui_tx: &Sender<UiEvent>, pending_state: &mut Option<WidgetState>) -> bool {
    let Some(state) = pending_state.take() else {
        return true;
    };
    match ui_tx.try_send(UiEvent::State(state)) {
        Ok(()) => true,
        Err(TrySendError::Full(event)) => {
            if let UiEvent::State(state) = event {
                *pending_state = Some(state);
            }
            true
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}

fn to_ui_event(event: WidgetEvent) -> Option<UiEvent> {
    match event {
        WidgetEvent::StateChanged(state) => Some(UiEvent::State(state)),
        WidgetEvent::FrameDrawn { .. } => Some(UiEvent::FrameDrawn),
        WidgetEvent::AnimationFailed(reason) => Some(UiEvent::Error(UiError::new(
            UiErrorContext::Animation,
            reason,
        ))),
        WidgetEvent::StoryReady { .. }
        | WidgetEvent::NarrationRequested
        | WidgetEvent::AnimationFinished { .. } => None,
    }
}
