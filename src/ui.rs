use anyhow::Context as _;
use eframe::egui;
use egui_phosphor::regular as icons;
use std::path::Path;
use std::sync::Arc;

use crate::builder::{Action, Template, TEMPLATES};
use crate::client::Choice;
use crate::config::Config;
use crate::controller::{ControlError, Controller};
use crate::logger::LogSink;
use crate::theme;

const TITLE: &str = "Hazmel Translator";
const BUTTON_SIZE: f32 = 100.0;

struct AiDialog {
    models: Vec<String>,
    template: Option<Template>,
    model: usize,
}

struct Message {
    body: String,
    fatal: bool,
}

enum Mode {
    Main,
    Ai(AiDialog),
    Message(Message),
}

/// What the user asked for this frame; applied after drawing.
enum Intent {
    Submit(Choice),
    OpenAi,
    CloseDialog,
    Dismiss,
}

pub struct HazmelApp {
    controller: Controller,
    log: Arc<dyn LogSink>,
    text: String,
    mode: Mode,
}

impl HazmelApp {
    fn new(controller: Controller, log: Arc<dyn LogSink>) -> Self {
        let (text, mode) = match controller.selected_text() {
            Ok(text) => (text, Mode::Main),
            Err(e) => (String::new(), Mode::Message(error_message(&e))),
        };
        Self {
            controller,
            log,
            text,
            mode,
        }
    }

    fn apply(&mut self, ctx: &egui::Context, intent: Intent) {
        match intent {
            Intent::Submit(choice) => match self.controller.run(&choice) {
                Ok(_) => {
                    self.log.info("Browser launched; closing");
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                Err(e) => self.mode = Mode::Message(error_message(&e)),
            },
            Intent::OpenAi => {
                self.mode = match self.controller.models() {
                    Ok(models) => Mode::Ai(AiDialog {
                        models,
                        template: None,
                        model: 0,
                    }),
                    Err(e) => Mode::Message(error_message(&e)),
                }
            }
            Intent::CloseDialog => self.mode = Mode::Main,
            Intent::Dismiss => {
                if matches!(&self.mode, Mode::Message(m) if m.fatal) {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                self.mode = Mode::Main;
            }
        }
    }

    fn main_panel(&mut self, ui: &mut egui::Ui) -> Option<Intent> {
        let mut intent = None;
        ui.add(
            egui::TextEdit::singleline(&mut self.text)
                .font(egui::TextStyle::Heading)
                .margin(egui::vec2(10.0, 10.0))
                .desired_width(f32::INFINITY),
        );
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let buttons = [
                (Action::Translate, icons::TRANSLATE, "Translate"),
                (Action::Pronounce, icons::SPEAKER_HIGH, "Pronounce"),
                (Action::Ai, icons::ROBOT, "AI"),
                (Action::Image, icons::IMAGE, "Image"),
            ];
            for (action, icon, label) in buttons {
                let button = egui::Button::new(format!("{}\n{}", icon, label));
                if ui.add_sized([BUTTON_SIZE, BUTTON_SIZE], button).clicked() {
                    intent = Some(match action {
                        Action::Ai => Intent::OpenAi,
                        _ => Intent::Submit(Choice::plain(action, self.text.clone())),
                    });
                }
            }
        });
        intent
    }
}

fn ai_window(ctx: &egui::Context, dialog: &mut AiDialog, text: &str) -> Option<Intent> {
    let mut intent = None;
    egui::Window::new("AI Query Options")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label("Choose a template:");
            for template in TEMPLATES {
                let selected = dialog.template == Some(template);
                let response = ui.selectable_label(selected, template.label());
                if response.clicked() {
                    dialog.template = Some(template);
                }
                if response.double_clicked() && !dialog.models.is_empty() {
                    intent = Some(Intent::Submit(ai_choice(dialog, template, text)));
                }
            }
            ui.add_space(6.0);
            ui.label("Choose a model:");
            if dialog.models.is_empty() {
                ui.colored_label(egui::Color32::YELLOW, "No models available from the API.");
            } else {
                egui::ComboBox::from_id_source("model")
                    .selected_text(dialog.models[dialog.model].as_str())
                    .show_ui(ui, |ui| {
                        for (i, name) in dialog.models.iter().enumerate() {
                            ui.selectable_value(&mut dialog.model, i, name.as_str());
                        }
                    });
            }
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let ready = dialog.template.is_some() && !dialog.models.is_empty();
                if ui.add_enabled(ready, egui::Button::new("OK")).clicked() {
                    if let Some(template) = dialog.template {
                        intent = Some(Intent::Submit(ai_choice(dialog, template, text)));
                    }
                }
                if ui.button("Cancel").clicked() {
                    intent = Some(Intent::CloseDialog);
                }
            });
        });
    intent
}

fn ai_choice(dialog: &AiDialog, template: Template, text: &str) -> Choice {
    let model = dialog.models.get(dialog.model).cloned().unwrap_or_default();
    Choice::ai(text, template, model)
}

fn message_window(ctx: &egui::Context, message: &Message) -> Option<Intent> {
    let mut intent = None;
    egui::Window::new("Error")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(&message.body);
            if ui.button("OK").clicked() {
                intent = Some(Intent::Dismiss);
            }
        });
    intent
}

fn error_message(err: &ControlError) -> Message {
    Message {
        body: err.to_string(),
        fatal: err.is_fatal(),
    }
}

impl eframe::App for HazmelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let idle = matches!(self.mode, Mode::Main);
        let mut intent = egui::CentralPanel::default()
            .show(ctx, |ui| ui.add_enabled_ui(idle, |ui| self.main_panel(ui)).inner)
            .inner;

        let text = self.text.clone();
        let modal = match &mut self.mode {
            Mode::Main => None,
            Mode::Ai(dialog) => ai_window(ctx, dialog, &text),
            Mode::Message(message) => message_window(ctx, message),
        };
        if modal.is_some() {
            intent = modal;
        }
        if let Some(intent) = intent {
            self.apply(ctx, intent);
        }
    }
}

fn load_icon(path: &Path) -> anyhow::Result<egui::viewport::IconData> {
    let image = image::open(path)
        .with_context(|| format!("failed to read icon {}", path.display()))?
        .into_rgba8();
    let (width, height) = image.dimensions();
    Ok(egui::viewport::IconData {
        rgba: image.into_raw(),
        width,
        height,
    })
}

// Run the UI event loop on the main thread (blocking)
pub fn run(cfg: &Config, controller: Controller, log: Arc<dyn LogSink>) -> anyhow::Result<()> {
    let mut viewport = egui::ViewportBuilder::default()
        .with_title(TITLE)
        .with_inner_size([600.0, 400.0])
        .with_always_on_top();
    if let Some(path) = cfg.icon_path.as_deref() {
        match load_icon(path) {
            Ok(icon) => viewport = viewport.with_icon(icon),
            Err(e) => log.warn(&format!("{:#}", e)),
        }
    }
    let native_options = eframe::NativeOptions {
        viewport,
        centered: true,
        ..Default::default()
    };

    log.info("Main UI: starting event loop");
    let app = HazmelApp::new(controller, Arc::clone(&log));
    match eframe::run_native(
        TITLE,
        native_options,
        Box::new(|cc| {
            theme::apply(&cc.egui_ctx);
            Box::new(app)
        }),
    ) {
        Ok(_) => {
            log.info("Main UI: event loop exited");
            Ok(())
        }
        Err(e) => {
            log.error(&format!("Main UI error: {}", e));
            anyhow::bail!("UI failed: {}", e)
        }
    }
}
