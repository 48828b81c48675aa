//! Post detail page

use eframe::egui::{self, RichText, ScrollArea, Ui};

use super::block_renderer::render_blocks;
use super::highlight::layout_job;
use super::post_card::avatar;
use super::Route;
use crate::core::post::{Post, PostBody};

/// Post detail panel
pub struct PostView;

impl PostView {
    /// Show `post`, or why it is not there yet
    pub fn show(
        ui: &mut Ui,
        post: Option<&Post>,
        loading: bool,
        error: Option<&str>,
        dark: bool,
        code_font_size: f32,
    ) -> Option<Route> {
        let mut route = None;

        if ui.button("← Back to feed").clicked() {
            route = Some(Route::Feed);
        }
        ui.separator();

        let Some(post) = post else {
            ui.vertical_centered(|ui| {
                ui.add_space(50.0);
                if loading {
                    ui.spinner();
                } else if let Some(error) = error {
                    ui.label("Post not found");
                    ui.label(RichText::new(error).small().weak());
                } else {
                    ui.label("Post not found");
                }
            });
            return route;
        };

        ui.horizontal(|ui| {
            let avatar_clicked = avatar(ui, post.user_avatar.as_deref(), post.author_label(), 40.0).clicked();
            let name_clicked = ui.link(RichText::new(post.author_label()).strong()).clicked();
            if avatar_clicked || name_clicked {
                route = Some(Route::Profile(post.user_id.clone()));
            }
            ui.label(
                RichText::new(post.created_at.with_timezone(&chrono::Local).format("%b %e, %Y %H:%M").to_string())
                    .weak(),
            );
        });
        if !post.caption.is_empty() {
            ui.add_space(4.0);
            ui.label(&post.caption);
        }
        ui.horizontal(|ui| {
            ui.label(format!("♥ {}", post.likes));
            ui.label(format!("💬 {}", post.comments));
        });
        ui.separator();

        ScrollArea::vertical()
            .id_salt("post_view_scroll")
            .show(ui, |ui| match &post.body {
                PostBody::Text { code } => {
                    egui::Frame::new()
                        .fill(ui.visuals().extreme_bg_color)
                        .inner_margin(egui::Margin::same(10))
                        .corner_radius(egui::CornerRadius::same(4))
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.label(layout_job(code, code_font_size, dark));
                        });
                    ui.add_space(6.0);
                    if ui.button("📋 Copy code").clicked() {
                        ui.ctx().copy_text(code.clone());
                    }
                }
                PostBody::Block { blocks } => {
                    if blocks.is_empty() {
                        ui.label(RichText::new("This post has no blocks").weak());
                    } else if let Some(action) = render_blocks(ui, blocks) {
                        route = Some(action.into());
                    }
                }
            });

        route
    }
}
