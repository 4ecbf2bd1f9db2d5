use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::theme;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalaryDashApp {
    pub state: AppState,
}

impl SalaryDashApp {
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        cc.egui_ctx.set_visuals(theme::dashboard_visuals());
        Self { state }
    }
}

impl eframe::App for SalaryDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: heading + selector ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: stats and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let state = &self.state;
            let [trend, titles, experience, years, remote] = &state.bundle.charts;
            let colors = &state.level_colors;

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    panels::summary_cards(ui, &state.bundle);
                    ui.add_space(20.0);

                    ui.columns(2, |cols: &mut [Ui]| {
                        plot::chart(&mut cols[0], trend, colors);
                        plot::chart(&mut cols[1], titles, colors);
                    });
                    ui.add_space(20.0);

                    plot::chart(ui, experience, colors);
                    ui.add_space(20.0);

                    ui.columns(2, |cols: &mut [Ui]| {
                        plot::chart(&mut cols[0], years, colors);
                        plot::chart(&mut cols[1], remote, colors);
                    });
                });
        });
    }
}
