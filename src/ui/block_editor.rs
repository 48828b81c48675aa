//! Block post editor
//!
//! Three columns: a toolbox that appends blocks, the ordered block list
//! with a drag handle and form per block, and a live read-only preview.
//! Rows are reordered by dragging the handle onto another row; the drop
//! position is the gap nearest the pointer.

use eframe::egui::{self, Color32, RichText, ScrollArea, TextEdit, Ui};

use super::block_renderer::{edit_block, render_blocks};
use super::Route;
use crate::core::block::BlockKind;
use crate::core::document::BlockDocument;
use crate::core::post::PostBody;
use crate::core::publish::Draft;
use crate::core::session::{SessionContext, SessionWatch};

const TOOLBOX_WIDTH: f32 = 140.0;

/// What the editor asks of the app this frame
#[derive(Debug)]
pub enum EditorOutcome {
    Publish(Draft),
    Navigate(Route),
}

/// Target index for `move_block` when the row at `from` is dropped into
/// gap `gap` (0 = before the first row, `len` = after the last)
pub fn drop_index(from: usize, gap: usize) -> usize {
    if gap > from {
        gap - 1
    } else {
        gap
    }
}

/// Block editor state, rebuilt each time the page opens
pub struct BlockEditor {
    doc: BlockDocument,
    caption: String,
    session: SessionWatch,
}

impl BlockEditor {
    pub fn new(session: &SessionContext, ctx: &egui::Context) -> Self {
        let ctx = ctx.clone();
        Self {
            doc: BlockDocument::new(),
            caption: String::new(),
            session: session.watch(move || ctx.request_repaint()),
        }
    }

    fn draft(&self) -> Draft {
        Draft {
            body: PostBody::Block {
                blocks: self.doc.blocks().to_vec(),
            },
            caption: self.caption.trim().to_string(),
        }
    }

    /// Show the editor
    pub fn show(&mut self, ui: &mut Ui, busy: bool) -> Option<EditorOutcome> {
        let mut outcome = None;
        let signed_in = self.session.identity().is_some();

        ui.horizontal(|ui| {
            ui.heading("New block post");
            ui.label(RichText::new(format!("{} blocks", self.doc.len())).weak());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let label = if busy { "Publishing..." } else { "Publish" };
                let response = ui.add_enabled(!busy && !self.doc.is_empty(), egui::Button::new(label));
                if response.clicked() {
                    outcome = Some(EditorOutcome::Publish(self.draft()));
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
        let column_width = (available_width - TOOLBOX_WIDTH) / 2.0 - 12.0;
        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.set_width(TOOLBOX_WIDTH);
                self.show_toolbox(ui);
            });

            ui.separator();

            ui.vertical(|ui| {
                ui.set_width(column_width);
                ScrollArea::vertical()
                    .id_salt("block_list_scroll")
                    .show(ui, |ui| self.show_block_list(ui));
            });

            ui.separator();

            ui.vertical(|ui| {
                ui.set_width(column_width);
                ui.label(RichText::new("Preview").small().weak());
                ScrollArea::vertical()
                    .id_salt("block_preview_scroll")
                    .show(ui, |ui| {
                        if self.doc.is_empty() {
                            ui.label(RichText::new("Nothing to preview yet").weak());
                        } else if let Some(action) = render_blocks(ui, self.doc.blocks()) {
                            outcome = Some(EditorOutcome::Navigate(action.into()));
                        }
                    });
            });
        });

        outcome
    }

    fn show_toolbox(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Add block").small().weak());
        for kind in BlockKind::ALL {
            let button = egui::Button::new(kind.label()).min_size(egui::vec2(TOOLBOX_WIDTH, 0.0));
            if ui.add(button).clicked() {
                let id = self.doc.append(kind);
                tracing::debug!("Added {} block {}", kind.label(), id);
            }
        }
    }

    fn show_block_list(&mut self, ui: &mut Ui) {
        if self.doc.is_empty() {
            ui.add_space(20.0);
            ui.label(RichText::new("Pick a block from the toolbox to start").weak());
            return;
        }

        let rows: Vec<(String, BlockKind)> = self
            .doc
            .blocks()
            .iter()
            .map(|b| (b.id.clone(), b.kind()))
            .collect();
        let mut remove = None;
        let mut dropped = None;

        for (idx, (id, kind)) in rows.iter().enumerate() {
            let row = ui.push_id(id, |ui| {
                egui::Frame::new()
                    .fill(ui.visuals().faint_bg_color)
                    .stroke(ui.visuals().widgets.noninteractive.bg_stroke)
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(egui::CornerRadius::same(6))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            ui.dnd_drag_source(egui::Id::new(("block_handle", id)), idx, |ui| {
                                ui.label(RichText::new("⠿").strong());
                            })
                            .response
                            .on_hover_text("Drag to reorder");
                            ui.label(RichText::new(kind.label()).strong());
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.small_button("✕").on_hover_text("Remove block").clicked() {
                                    remove = Some(id.clone());
                                }
                            });
                        });
                        edit_block(ui, &mut self.doc, id);
                    })
                    .response
            });
            let response = row.inner;

            if let (Some(pointer), Some(dragged)) = (
                ui.input(|i| i.pointer.interact_pos()),
                response.dnd_hover_payload::<usize>(),
            ) {
                let rect = response.rect;
                let stroke = egui::Stroke::new(2.0, Color32::from_rgb(97, 175, 239));
                let gap = if *dragged == idx {
                    idx
                } else if pointer.y < rect.center().y {
                    ui.painter().hline(rect.x_range(), rect.top() - 2.0, stroke);
                    idx
                } else {
                    ui.painter().hline(rect.x_range(), rect.bottom() + 2.0, stroke);
                    idx + 1
                };
                if let Some(from) = response.dnd_release_payload::<usize>() {
                    dropped = Some((*from, gap));
                }
            }
            ui.add_space(6.0);
        }

        if let Some(id) = remove {
            self.doc.remove(&id);
        }
        if let Some((from, gap)) = dropped {
            self.doc.move_block(from, drop_index(from, gap));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(doc: &BlockDocument) -> Vec<String> {
        doc.blocks().iter().map(|b| b.id.clone()).collect()
    }

    #[test]
    fn test_drop_index_in_both_directions() {
        let mut doc = BlockDocument::new();
        for kind in [BlockKind::Heading, BlockKind::Text, BlockKind::Divider, BlockKind::Card] {
            doc.append(kind);
        }
        let original = ids(&doc);

        // Drag the first row into the gap after the third
        doc.move_block(0, drop_index(0, 3));
        assert_eq!(
            ids(&doc),
            vec![original[1].clone(), original[2].clone(), original[0].clone(), original[3].clone()]
        );

        // Drag the last row to the very top
        doc.move_block(3, drop_index(3, 0));
        assert_eq!(ids(&doc)[0], original[3]);
    }

    #[test]
    fn test_drop_into_own_gap_is_noop() {
        assert_eq!(drop_index(2, 2), 2);
        assert_eq!(drop_index(2, 3), 2);
    }
}
