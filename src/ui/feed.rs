//! Feed page: hero line and every post, newest first

use std::time::Instant;

use eframe::egui::{self, RichText, ScrollArea, Ui};

use super::post_card::post_card;
use super::typewriter::Typewriter;
use super::Route;
use crate::core::post::Post;

/// Widest the feed column grows
const FEED_WIDTH: f32 = 640.0;

/// What the feed currently has to show
pub struct FeedView<'a> {
    pub posts: &'a [Post],
    pub loading: bool,
    pub error: Option<&'a str>,
    pub dark: bool,
    pub code_font_size: f32,
}

/// Feed page state that outlives navigation
pub struct FeedPage {
    typewriter: Typewriter,
    started: Instant,
}

impl Default for FeedPage {
    fn default() -> Self {
        Self {
            typewriter: Typewriter::default(),
            started: Instant::now(),
        }
    }
}

impl FeedPage {
    /// Show the feed
    pub fn show(&self, ui: &mut Ui, view: FeedView<'_>) -> Option<Route> {
        let mut route = None;

        ScrollArea::vertical()
            .id_salt("feed_scroll")
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.set_max_width(FEED_WIDTH);
                    ui.add_space(24.0);
                    self.typewriter.show(ui, self.started.elapsed(), 30.0);
                    ui.label(RichText::new("HTML/CSS snippets and block layouts from the community").weak());
                    ui.add_space(12.0);

                    ui.horizontal(|ui| {
                        if ui.button("✏ New snippet").clicked() {
                            route = Some(Route::ComposeCode);
                        }
                        if ui.button("🧱 New block post").clicked() {
                            route = Some(Route::ComposeBlocks);
                        }
                        if ui.add_enabled(!view.loading, egui::Button::new("⟳ Refresh")).clicked() {
                            route = Some(Route::Feed);
                        }
                    });
                    ui.add_space(16.0);

                    if let Some(error) = view.error {
                        ui.colored_label(ui.visuals().error_fg_color, format!("Could not load posts: {}", error));
                        ui.add_space(8.0);
                    }

                    if view.loading && view.posts.is_empty() {
                        ui.spinner();
                    } else if view.posts.is_empty() && view.error.is_none() {
                        Self::show_empty(ui);
                    }

                    for post in view.posts {
                        ui.push_id(&post.id, |ui| {
                            if let Some(r) = post_card(ui, post, view.dark, view.code_font_size) {
                                route = Some(r);
                            }
                        });
                        ui.add_space(12.0);
                    }
                });
            });

        route
    }

    fn show_empty(ui: &mut Ui) {
        ui.add_space(40.0);
        ui.label("No posts yet");
        ui.label(RichText::new("Be the first to share a snippet.").weak());
    }
}
