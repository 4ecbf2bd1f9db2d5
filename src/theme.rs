use eframe::egui::{self, Color32};

use crate::data::aggregate::ChartSpec;

// ---------------------------------------------------------------------------
// Page palette
// ---------------------------------------------------------------------------

/// Dashboard page background.
pub const PAGE_BG: Color32 = Color32::from_rgb(0x00, 0x08, 0x14);

/// Background of the summary statistic cards.
pub const CARD_BG: Color32 = Color32::from_rgb(0xfb, 0xb1, 0xbd);

/// Text colour on the summary statistic cards.
pub const CARD_TEXT: Color32 = Color32::from_rgb(0x10, 0x10, 0x10);

const LIGHT_BLUE: Color32 = Color32::from_rgb(0xad, 0xd8, 0xe6);
const CHART_BG: Color32 = Color32::from_rgb(0x38, 0x34, 0x34);

// ---------------------------------------------------------------------------
// Per-chart theme
// ---------------------------------------------------------------------------

/// Colours used when drawing one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartTheme {
    pub plot_bg: Color32,
    pub paper_bg: Color32,
    pub font: Color32,
    pub title_font: Color32,
}

impl ChartTheme {
    /// Dark background with light blue text.
    pub const DARK: ChartTheme = ChartTheme {
        plot_bg: CHART_BG,
        paper_bg: CHART_BG,
        font: LIGHT_BLUE,
        title_font: LIGHT_BLUE,
    };

    /// Unstyled: egui's default light look.
    pub const PLAIN: ChartTheme = ChartTheme {
        plot_bg: Color32::WHITE,
        paper_bg: Color32::WHITE,
        font: Color32::DARK_GRAY,
        title_font: Color32::BLACK,
    };
}

impl Default for ChartTheme {
    fn default() -> Self {
        ChartTheme::PLAIN
    }
}

/// Apply the dashboard's dark theme to a chart.
pub fn apply_dark_mode(mut chart: ChartSpec) -> ChartSpec {
    chart.theme = ChartTheme::DARK;
    chart
}

/// Global egui visuals for the dashboard window.
pub fn dashboard_visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = PAGE_BG;
    visuals.window_fill = PAGE_BG;
    visuals
}
