//! Sidebar navigation and the signed-in user

use eframe::egui::{self, RichText, Ui};

use super::post_card::avatar;
use super::Route;
use crate::core::session::Identity;

/// Sidebar with navigation links and the session controls
pub struct Sidebar;

impl Sidebar {
    /// Show the sidebar; `active` is the route of the page on screen
    pub fn show(ui: &mut Ui, identity: Option<&Identity>, active: &Route) -> Option<Route> {
        let mut route = None;

        ui.vertical(|ui| {
            ui.add_space(8.0);
            ui.heading("ScriptShot");
            ui.add_space(12.0);

            let mut links = vec![
                ("🏠 Feed", Route::Feed),
                ("✏ New snippet", Route::ComposeCode),
                ("🧱 New block post", Route::ComposeBlocks),
            ];
            if let Some(identity) = identity {
                links.push(("👤 Profile", Route::Profile(identity.id.clone())));
            }
            for (label, target) in links {
                if ui.selectable_label(*active == target, label).clicked() {
                    route = Some(target);
                }
            }

            ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
                ui.add_space(8.0);
                match identity {
                    Some(identity) => {
                        if ui.button("Sign out").clicked() {
                            route = Some(Route::SignOut);
                        }
                        ui.horizontal(|ui| {
                            let clicked = avatar(
                                ui,
                                identity.avatar_url.as_deref(),
                                &identity.display_name,
                                28.0,
                            )
                            .clicked();
                            ui.label(RichText::new(&identity.display_name).strong());
                            if clicked {
                                route = Some(Route::Profile(identity.id.clone()));
                            }
                        });
                    }
                    None => {
                        if ui.button("Sign in").clicked() {
                            route = Some(Route::SignIn);
                        }
                        ui.label(RichText::new("Not signed in").weak());
                    }
                }
                ui.separator();
            });
        });

        route
    }
}
