//! Feed card for a single post

use eframe::egui::{self, Align2, Color32, CornerRadius, FontId, RichText, Sense, Ui};

use super::block_renderer::render_blocks;
use super::highlight::{excerpt, layout_job};
use super::Route;
use crate::core::post::{Post, PostBody};

/// Lines of code shown in a card before it is cut
const CODE_EXCERPT_LINES: usize = 12;
/// Blocks shown in a card that has no thumbnail
const BLOCK_EXCERPT: usize = 3;

const AVATAR_COLORS: [Color32; 5] = [
    Color32::from_rgb(97, 175, 239),
    Color32::from_rgb(198, 120, 221),
    Color32::from_rgb(229, 192, 123),
    Color32::from_rgb(152, 195, 121),
    Color32::from_rgb(224, 108, 117),
];

/// Round avatar: the image when there is one, else the name's initial
pub fn avatar(ui: &mut Ui, url: Option<&str>, name: &str, size: f32) -> egui::Response {
    if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
        return ui.add(
            egui::Image::from_uri(url.trim().to_string())
                .fit_to_exact_size(egui::vec2(size, size))
                .corner_radius(CornerRadius::same((size / 2.0) as u8))
                .sense(Sense::click()),
        );
    }

    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), Sense::click());
    let color = AVATAR_COLORS[name.bytes().map(usize::from).sum::<usize>() % AVATAR_COLORS.len()];
    let initial = name
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "?".to_string());
    let painter = ui.painter();
    painter.circle_filled(rect.center(), size / 2.0, color);
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        initial,
        FontId::proportional(size * 0.5),
        Color32::WHITE,
    );
    response
}

/// Draw `post` as a feed card
pub fn post_card(ui: &mut Ui, post: &Post, dark: bool, code_font_size: f32) -> Option<Route> {
    let mut route = None;

    egui::Frame::new()
        .fill(ui.visuals().panel_fill)
        .stroke(ui.visuals().widgets.noninteractive.bg_stroke)
        .inner_margin(egui::Margin::same(12))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());

            ui.horizontal(|ui| {
                let to_profile = Route::Profile(post.user_id.clone());
                if avatar(ui, post.user_avatar.as_deref(), post.author_label(), 32.0).clicked() {
                    route = Some(to_profile.clone());
                }
                ui.vertical(|ui| {
                    if ui.link(RichText::new(post.author_label()).strong()).clicked() {
                        route = Some(to_profile);
                    }
                    let when = post.created_at.with_timezone(&chrono::Local);
                    ui.label(RichText::new(when.format("%b %e, %Y %H:%M").to_string()).small().weak());
                });
            });
            ui.add_space(8.0);

            match &post.body {
                PostBody::Text { code } => {
                    egui::Frame::new()
                        .fill(ui.visuals().extreme_bg_color)
                        .inner_margin(egui::Margin::same(8))
                        .corner_radius(CornerRadius::same(4))
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.label(layout_job(&excerpt(code, CODE_EXCERPT_LINES), code_font_size, dark));
                        });
                }
                PostBody::Block { blocks } => match post.thumbnail.as_deref() {
                    Some(url) => {
                        let response = ui.add(
                            egui::Image::from_uri(url.to_string())
                                .max_width(ui.available_width())
                                .corner_radius(CornerRadius::same(4))
                                .sense(Sense::click()),
                        );
                        if response.clicked() {
                            route = Some(Route::Post(post.id.clone()));
                        }
                    }
                    None => {
                        let shown = &blocks[..blocks.len().min(BLOCK_EXCERPT)];
                        ui.push_id(&post.id, |ui| {
                            if let Some(action) = render_blocks(ui, shown) {
                                route = Some(action.into());
                            }
                        });
                        if blocks.len() > BLOCK_EXCERPT {
                            ui.label(
                                RichText::new(format!("+{} more blocks", blocks.len() - BLOCK_EXCERPT))
                                    .small()
                                    .weak(),
                            );
                        }
                    }
                },
            }

            if !post.caption.is_empty() {
                ui.add_space(6.0);
                ui.label(&post.caption);
            }

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(format!("♥ {}", post.likes));
                ui.label(format!("💬 {}", post.comments));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Open").clicked() {
                        route = Some(Route::Post(post.id.clone()));
                    }
                });
            });
        });

    route
}
