//! Sign-in dialog

use eframe::egui::{self, RichText, TextEdit};

use crate::core::session::SessionContext;

/// The sign-in popup; dropped by the app once it reports `Closed`
#[derive(Debug, Default)]
pub struct SignInDialog {
    display_name: String,
    avatar_url: String,
    error: Option<String>,
}

/// Whether the dialog should stay on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Open,
    Closed,
}

impl SignInDialog {
    fn submit(&mut self, session: &SessionContext) -> DialogState {
        let avatar = Some(self.avatar_url.trim()).filter(|a| !a.is_empty());
        match session.sign_in(&self.display_name, avatar) {
            Ok(_) => DialogState::Closed,
            Err(e) => {
                tracing::warn!("Sign-in failed: {}", e);
                self.error = Some(e.to_string());
                DialogState::Open
            }
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, session: &SessionContext) -> DialogState {
        let mut open = true;
        let mut state = DialogState::Open;

        egui::Window::new("Sign in")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Display name");
                let name = ui.add(
                    TextEdit::singleline(&mut self.display_name)
                        .hint_text("How others will see you")
                        .desired_width(260.0),
                );
                ui.label("Avatar URL (optional)");
                ui.add(
                    TextEdit::singleline(&mut self.avatar_url)
                        .hint_text("https://...")
                        .desired_width(260.0),
                );

                if let Some(error) = &self.error {
                    ui.label(RichText::new(error).color(ui.visuals().error_fg_color));
                }

                ui.add_space(6.0);
                let enter = name.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                ui.horizontal(|ui| {
                    let can_submit = !self.display_name.trim().is_empty();
                    if ui.add_enabled(can_submit, egui::Button::new("Sign in")).clicked()
                        || (enter && can_submit)
                    {
                        state = self.submit(session);
                    }
                    if ui.button("Cancel").clicked() {
                        state = DialogState::Closed;
                    }
                });
            });

        if !open {
            state = DialogState::Closed;
        }
        state
    }
}
