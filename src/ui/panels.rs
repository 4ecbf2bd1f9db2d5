use eframe::egui::{self, Color32, Margin, RichText, Ui};

use crate::data::aggregate::OutputBundle;
use crate::state::AppState;
use crate::theme::{CARD_BG, CARD_TEXT};

// ---------------------------------------------------------------------------
// Top bar – title and job title selector
// ---------------------------------------------------------------------------

/// Render the dashboard heading and the job title dropdown.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(
            RichText::new("Data Science Salaries Dashboard")
                .size(28.0)
                .color(Color32::WHITE),
        );
    });
    ui.add_space(8.0);

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Job title");

        let mut picked = None;
        egui::ComboBox::from_id_salt("job_title")
            .selected_text(state.selection.to_string())
            .width(280.0)
            .show_ui(ui, |ui: &mut Ui| {
                for choice in &state.choices {
                    if ui
                        .selectable_label(*choice == state.selection, choice.to_string())
                        .clicked()
                    {
                        picked = Some(choice.clone());
                    }
                }
            });
        if let Some(selection) = picked {
            state.select(selection);
        }

        ui.separator();
        ui.label(format!(
            "{} of {} records",
            state.bundle.row_count,
            state.dataset.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Summary statistic cards
// ---------------------------------------------------------------------------

/// Render the average / maximum / minimum salary cards side by side.
pub fn summary_cards(ui: &mut Ui, bundle: &OutputBundle) {
    ui.columns(bundle.stats.len(), |cols: &mut [Ui]| {
        for (col, card) in cols.iter_mut().zip(&bundle.stats) {
            egui::Frame::default()
                .fill(CARD_BG)
                .inner_margin(Margin::same(40))
                .show(col, |ui: &mut Ui| {
                    ui.vertical_centered(|ui: &mut Ui| {
                        ui.label(RichText::new(card.to_string()).size(20.0).color(CARD_TEXT));
                    });
                });
        }
    });
}
