//! Profile page: one user's posts and totals

use eframe::egui::{RichText, ScrollArea, Ui};

use super::post_card::{avatar, post_card};
use super::Route;
use crate::core::post::{posts_by_user, Post};
use crate::core::session::Identity;

/// Profile panel
pub struct ProfilePage;

impl ProfilePage {
    /// Show the profile of `user_id`, built from the loaded feed.
    ///
    /// `viewer` is the signed-in identity; the own profile gets a sign-out action.
    pub fn show(
        ui: &mut Ui,
        user_id: &str,
        posts: &[Post],
        viewer: Option<&Identity>,
        dark: bool,
        code_font_size: f32,
    ) -> Option<Route> {
        let mut route = None;
        let (own_posts, stats) = posts_by_user(posts, user_id);
        let is_self = viewer.is_some_and(|v| v.id == user_id);

        // Prefer the live identity for the viewer, else the newest post's snapshot
        let (name, avatar_url) = match (viewer.filter(|_| is_self), own_posts.first()) {
            (Some(v), _) => (v.display_name.clone(), v.avatar_url.clone()),
            (None, Some(p)) => (p.author_label().to_string(), p.user_avatar.clone()),
            (None, None) => ("Unknown user".to_string(), None),
        };

        if ui.button("← Back to feed").clicked() {
            route = Some(Route::Feed);
        }
        ui.separator();

        ui.horizontal(|ui| {
            avatar(ui, avatar_url.as_deref(), &name, 64.0);
            ui.vertical(|ui| {
                ui.heading(&name);
                ui.label(
                    RichText::new(format!(
                        "{} posts · ♥ {} · 💬 {}",
                        stats.posts, stats.likes, stats.comments
                    ))
                    .weak(),
                );
                if is_self && ui.button("Sign out").clicked() {
                    route = Some(Route::SignOut);
                }
            });
        });
        ui.separator();

        ScrollArea::vertical()
            .id_salt("profile_scroll")
            .show(ui, |ui| {
                if own_posts.is_empty() {
                    ui.vertical_centered(|ui| {
                        ui.add_space(30.0);
                        ui.label(RichText::new("No posts yet").weak());
                    });
                }
                for post in own_posts {
                    ui.push_id(&post.id, |ui| {
                        if let Some(r) = post_card(ui, post, dark, code_font_size) {
                            route = Some(r);
                        }
                    });
                    ui.add_space(12.0);
                }
            });

        route
    }
}
