//! Block rendering
//!
//! Two renderers switch over the same block kinds: `render_block` draws the
//! read-only preview used by the editor and by published posts, and
//! `edit_block` draws the form that edits a block in place. Both go through
//! `youtube_id` and the typed `Card`, so the editor and the post view agree.

use eframe::egui::{self, Color32, FontId, RichText, Ui};

use crate::core::block::{
    youtube_id, youtube_thumbnail_url, youtube_watch_url, Block, BlockContent, Card, CardField,
};
use crate::core::document::BlockDocument;

/// Action that can be triggered by block interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockAction {
    /// Open external URL
    OpenUrl(String),
}

fn placeholder(ui: &mut Ui, icon: &str, text: &str) {
    egui::Frame::new()
        .fill(ui.visuals().faint_bg_color)
        .stroke(egui::Stroke::new(1.0, Color32::from_rgb(90, 90, 90)))
        .inner_margin(egui::Margin::same(12))
        .corner_radius(egui::CornerRadius::same(4))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(icon).font(FontId::proportional(24.0)));
                ui.label(RichText::new(text).weak());
            });
        });
}

/// Render a block read-only
pub fn render_block(ui: &mut Ui, block: &Block) -> Option<BlockAction> {
    let action = match &block.content {
        BlockContent::Heading(text) => {
            ui.label(RichText::new(text).font(FontId::proportional(26.0)).strong());
            None
        }
        BlockContent::Text(text) => {
            ui.label(RichText::new(text).font(FontId::proportional(15.0)));
            None
        }
        BlockContent::Image(url) => {
            render_image(ui, url);
            None
        }
        BlockContent::Button(label) => {
            let _ = ui.button(RichText::new(label).strong());
            None
        }
        BlockContent::Divider => {
            ui.separator();
            None
        }
        BlockContent::Input(hint) => {
            let mut empty = String::new();
            ui.add_enabled(
                false,
                egui::TextEdit::singleline(&mut empty)
                    .hint_text(hint.as_str())
                    .desired_width(ui.available_width()),
            );
            None
        }
        BlockContent::Card(card) => render_card(ui, card),
        BlockContent::Youtube(url) => render_youtube(ui, url),
    };
    ui.add_space(6.0);
    action
}

/// Render a whole block list
pub fn render_blocks(ui: &mut Ui, blocks: &[Block]) -> Option<BlockAction> {
    let mut action = None;
    for block in blocks {
        ui.push_id(&block.id, |ui| {
            if let Some(a) = render_block(ui, block) {
                action = Some(a);
            }
        });
    }
    action
}

fn render_image(ui: &mut Ui, url: &str) {
    if url.trim().is_empty() {
        placeholder(ui, "🖼", "No image yet");
        return;
    }
    ui.add(
        egui::Image::from_uri(url.trim().to_string())
            .max_width(ui.available_width())
            .corner_radius(egui::CornerRadius::same(4)),
    );
}

fn render_card(ui: &mut Ui, card: &Card) -> Option<BlockAction> {
    egui::Frame::new()
        .fill(ui.visuals().extreme_bg_color)
        .stroke(egui::Stroke::new(1.0, Color32::from_rgb(70, 70, 70)))
        .inner_margin(egui::Margin::same(10))
        .corner_radius(egui::CornerRadius::same(6))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            if !card.img.trim().is_empty() {
                render_image(ui, &card.img);
                ui.add_space(6.0);
            }
            if !card.title.is_empty() {
                ui.label(RichText::new(&card.title).font(FontId::proportional(18.0)).strong());
            }
            if !card.desc.is_empty() {
                ui.label(RichText::new(&card.desc).weak());
            }
            if !card.btn.is_empty() {
                ui.add_space(4.0);
                let _ = ui.button(&card.btn);
            }
        });
    None
}

fn render_youtube(ui: &mut Ui, url: &str) -> Option<BlockAction> {
    let Some(id) = youtube_id(url) else {
        placeholder(ui, "▶", "Paste a YouTube link to embed a video");
        return None;
    };

    let mut action = None;
    let response = ui.add(
        egui::Image::from_uri(youtube_thumbnail_url(id))
            .max_width(ui.available_width())
            .corner_radius(egui::CornerRadius::same(4))
            .sense(egui::Sense::click()),
    );
    if response.clicked() {
        action = Some(BlockAction::OpenUrl(youtube_watch_url(id)));
    }
    response.on_hover_text("Watch on YouTube");
    action
}

/// Whether a block form changed this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormChange {
    Unchanged,
    Edited,
}

fn text_field(ui: &mut Ui, label: &str, value: &str, multiline: bool) -> Option<String> {
    let mut text = value.to_string();
    ui.label(RichText::new(label).small().weak());
    let edit = if multiline {
        egui::TextEdit::multiline(&mut text).desired_rows(3)
    } else {
        egui::TextEdit::singleline(&mut text)
    };
    let response = ui.add(edit.desired_width(ui.available_width()));
    response.changed().then_some(text)
}

/// Edit block `id` of `doc` in place
pub fn edit_block(ui: &mut Ui, doc: &mut BlockDocument, id: &str) -> FormChange {
    let Some(content) = doc.get(id).map(|b| b.content.clone()) else {
        return FormChange::Unchanged;
    };

    let mut changed = false;
    match &content {
        BlockContent::Heading(text) => {
            if let Some(new) = text_field(ui, "Heading", text, false) {
                changed = doc.update_content(id, &new);
            }
        }
        BlockContent::Text(text) => {
            if let Some(new) = text_field(ui, "Text", text, true) {
                changed = doc.update_content(id, &new);
            }
        }
        BlockContent::Image(url) => {
            if let Some(new) = text_field(ui, "Image URL", url, false) {
                changed = doc.update_content(id, &new);
            }
            if ui.button("Choose file...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp"])
                    .pick_file()
                {
                    changed = doc.update_content(id, &format!("file://{}", path.display()));
                }
            }
        }
        BlockContent::Button(label) => {
            if let Some(new) = text_field(ui, "Button label", label, false) {
                changed = doc.update_content(id, &new);
            }
        }
        BlockContent::Divider => {
            ui.label(RichText::new("Divider has no settings").small().weak());
        }
        BlockContent::Input(hint) => {
            if let Some(new) = text_field(ui, "Placeholder", hint, false) {
                changed = doc.update_content(id, &new);
            }
        }
        BlockContent::Card(card) => {
            for (field, label, multiline) in [
                (CardField::Title, "Title", false),
                (CardField::Desc, "Description", true),
                (CardField::Btn, "Button", false),
                (CardField::Img, "Image URL", false),
            ] {
                if let Some(new) = text_field(ui, label, card.field(field), multiline) {
                    changed |= doc.update_card(id, field, &new);
                }
            }
        }
        BlockContent::Youtube(url) => {
            if let Some(new) = text_field(ui, "YouTube URL", url, false) {
                changed = doc.update_content(id, &new);
            }
            let status = match youtube_id(url) {
                Some(video) => RichText::new(format!("Video id: {}", video)).small().color(Color32::from_rgb(120, 190, 120)),
                None if url.trim().is_empty() => RichText::new("Supports watch?v=, youtu.be/ and embed/ links").small().weak(),
                None => RichText::new("Not a recognised YouTube link").small().color(Color32::from_rgb(220, 120, 100)),
            };
            ui.label(status);
        }
    }

    if changed {
        FormChange::Edited
    } else {
        FormChange::Unchanged
    }
}
