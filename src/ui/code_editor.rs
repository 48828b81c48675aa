//! HTML/CSS snippet composer

use eframe::egui::{self, RichText, ScrollArea, TextEdit, Ui};

use super::highlight::layout_job;
use crate::core::post::PostBody;
use crate::core::publish::Draft;
use crate::core::session::{SessionContext, SessionWatch};

const STARTER: &str = r#"<div class="hello">
  <h1>Hello, ScriptShot!</h1>
  <p>Edit me.</p>
</div>

<style>
  .hello { padding: 24px; border-radius: 12px; }
</style>
"#;

/// Code composer state, rebuilt each time the page opens
pub struct CodeComposer {
    code: String,
    caption: String,
    session: SessionWatch,
}

impl CodeComposer {
    pub fn new(session: &SessionContext, ctx: &egui::Context) -> Self {
        let ctx = ctx.clone();
        Self {
            code: STARTER.to_string(),
            caption: String::new(),
            session: session.watch(move || ctx.request_repaint()),
        }
    }

    fn draft(&self) -> Draft {
        Draft {
            body: PostBody::Text {
                code: self.code.clone(),
            },
            caption: self.caption.trim().to_string(),
        }
    }

    /// Show the composer; returns a draft when the user publishes
    pub fn show(&mut self, ui: &mut Ui, busy: bool, font_size: f32, dark: bool) -> Option<Draft> {
        let mut publish = None;
        let signed_in = self.session.identity().is_some();

        ui.horizontal(|ui| {
            ui.heading("New snippet");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let draft = self.draft();
                let label = if busy { "Publishing..." } else { "Publish" };
                let response = ui.add_enabled(!busy && !draft.is_empty(), egui::Button::new(label));
                if response.clicked() {
                    publish = Some(draft);
                }
                if !signed_in {
                    ui.label(RichText::new("Sign in to publish").small().weak());
                }
            });
        });
        ui.separator();

        ui.label(RichText::new("Caption").small().weak());
        ui.add(
            TextEdit::singleline(&mut self.caption)
                .hint_text("Say something about it")
                .desired_width(f32::INFINITY),
        );
        ui.add_space(8.0);

        let available_width = ui.available_width();
        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.set_width(available_width / 2.0 - 8.0);
                ui.label(RichText::new("HTML / CSS").small().weak());
                ScrollArea::vertical()
                    .id_salt("code_editor_scroll")
                    .show(ui, |ui| {
                        ui.add(
                            TextEdit::multiline(&mut self.code)
                                .font(egui::FontId::monospace(font_size))
                                .code_editor()
                                .desired_width(f32::INFINITY)
                                .desired_rows(24),
                        );
                    });
            });

            ui.separator();

            ui.vertical(|ui| {
                ui.set_width(available_width / 2.0 - 8.0);
                ui.label(RichText::new("Highlighted").small().weak());
                ScrollArea::vertical()
                    .id_salt("code_preview_scroll")
                    .show(ui, |ui| {
                        egui::Frame::new()
                            .fill(ui.visuals().extreme_bg_color)
                            .inner_margin(egui::Margin::same(8))
                            .corner_radius(egui::CornerRadius::same(4))
                            .show(ui, |ui| {
                                ui.set_width(ui.available_width());
                                ui.label(layout_job(&self.code, font_size, dark));
                            });
                    });
            });
        });

        publish
    }
}
