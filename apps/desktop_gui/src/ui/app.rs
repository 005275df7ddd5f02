use std::{sync::Arc, time::Duration};

use client_core::{project, RasterSurface, WidgetState, WidgetView};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::TextureHandle;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;

const PROMPT_HINT: &str = "Enter a story idea (e.g., A robot making friends in space)";
const CANVAS_TEXTURE_NAME: &str = "storygen-canvas";

pub struct StoryGeneratorApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    /// Mirror of the backend widget state. `prompt` is owned by the text box
    /// and never overwritten from backend snapshots.
    state: WidgetState,
    status: String,
    surface: Arc<RasterSurface>,
    canvas_texture: Option<TextureHandle>,
    uploaded_generation: u64,
}

impl StoryGeneratorApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        surface: Arc<RasterSurface>,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            state: WidgetState::default(),
            status: String::new(),
            surface,
            canvas_texture: None,
            uploaded_generation: 0,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::State(state) => self.apply_backend_state(state),
                // The texture refresh keys off the surface generation.
                UiEvent::FrameDrawn => {}
                UiEvent::Error(err) => {
                    tracing::warn!(context = ?err.context(), "{}", err.message());
                    self.status = err.status_line();
                }
            }
        }
    }

    fn apply_backend_state(&mut self, state: WidgetState) {
        let prompt = std::mem::take(&mut self.state.prompt);
        self.state = state;
        self.state.prompt = prompt;
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn refresh_canvas_texture(&mut self, ctx: &egui::Context) {
        let generation = self.surface.generation();
        if self.canvas_texture.is_some() && generation == self.uploaded_generation {
            return;
        }
        let frame = self.surface.snapshot();
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [frame.width() as usize, frame.height() as usize],
            frame.as_raw(),
        );
        match &mut self.canvas_texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.canvas_texture =
                    Some(ctx.load_texture(CANVAS_TEXTURE_NAME, image, egui::TextureOptions::LINEAR));
            }
        }
        self.uploaded_generation = generation;
    }

    fn show_prompt(&mut self, ui: &mut egui::Ui) {
        let response = ui.add(
            egui::TextEdit::multiline(&mut self.state.prompt)
                .desired_rows(3)
                .desired_width(f32::INFINITY)
                .hint_text(PROMPT_HINT),
        );
        if response.changed() {
            let text = self.state.prompt.clone();
            self.dispatch(BackendCommand::SetPrompt { text });
        }
    }

    fn show_generate(&mut self, ui: &mut egui::Ui, view: &WidgetView) {
        ui.add_space(8.0);
        if ui
            .add_enabled(view.generate_enabled, egui::Button::new(view.generate_label))
            .clicked()
        {
            self.dispatch(BackendCommand::GenerateStory);
        }
    }

    fn show_story(&mut self, ui: &mut egui::Ui, view: &WidgetView) {
        let Some(story) = &view.story else {
            return;
        };

        ui.add_space(16.0);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new("Your Story").strong().size(18.0));
            egui::ScrollArea::vertical()
                .max_height(220.0)
                .show(ui, |ui| ui.label(story.as_str()));
        });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(view.narrate_enabled, egui::Button::new("Narrate Story"))
                .clicked()
            {
                self.dispatch(BackendCommand::Narrate);
            }
            if ui
                .add_enabled(view.play_enabled, egui::Button::new("Play Animation"))
                .clicked()
            {
                self.dispatch(BackendCommand::PlayAnimation);
            }
        });
    }

    fn show_canvas(&mut self, ui: &mut egui::Ui, view: &WidgetView) {
        if !view.show_canvas {
            return;
        }
        self.refresh_canvas_texture(ui.ctx());
        let Some(texture) = &self.canvas_texture else {
            return;
        };

        let size = texture.size_vec2();
        ui.add_space(8.0);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.add(egui::Image::new((texture.id(), size)));
        });
    }
}

impl eframe::App for StoryGeneratorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(self.status.as_str());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Free Story & Animation Generator");
            });
            ui.add_space(12.0);
            self.show_prompt(ui);
            // Projected after the text box so this frame's edits count.
            let view = project(&self.state);
            self.show_generate(ui, &view);
            self.show_story(ui, &view);
            self.show_canvas(ui, &view);
        });

        if self.state.is_animating() || self.state.is_requesting() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
