use std::collections::BTreeSet;
use std::f32::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

use eframe::egui::{
    self, Align2, Color32, FontId, Margin, RichText, Sense, Shape, Stroke, Ui, Vec2, vec2,
};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::aggregate::{ChartData, ChartKind, ChartSpec, Share};
use crate::theme::ChartTheme;

const CHART_HEIGHT: f32 = 320.0;
const SERIES_COLOR: Color32 = Color32::from_rgb(0x63, 0x6e, 0xfa);

// ---------------------------------------------------------------------------
// Chart panel
// ---------------------------------------------------------------------------

/// Draw one chart with its title, in its own themed frame.
///
/// `level_colors` colours the experience-level series of grouped bar charts.
pub fn chart(ui: &mut Ui, spec: &ChartSpec, level_colors: &ColorMap) {
    let theme = spec.theme;
    egui::Frame::default()
        .fill(theme.paper_bg)
        .inner_margin(Margin::same(12))
        .show(ui, |ui: &mut Ui| {
            ui.label(
                RichText::new(spec.title)
                    .size(16.0)
                    .strong()
                    .color(theme.title_font),
            );

            let visuals = ui.visuals_mut();
            visuals.override_text_color = Some(theme.font);
            visuals.extreme_bg_color = theme.plot_bg;

            if spec.data.is_empty() {
                placeholder(ui, theme);
                return;
            }

            match &spec.data {
                ChartData::YearSeries(series) => {
                    let points: Vec<[f64; 2]> =
                        series.iter().map(|p| [p.year as f64, p.value]).collect();
                    plot_for(spec)
                        .x_axis_formatter(year_label)
                        .show(ui, |plot_ui| {
                            plot_ui.line(
                                Line::new(PlotPoints::from(points.clone()))
                                    .color(SERIES_COLOR)
                                    .width(2.0),
                            );
                            plot_ui.points(
                                Points::new(PlotPoints::from(points))
                                    .color(SERIES_COLOR)
                                    .radius(4.0),
                            );
                        });
                }
                ChartData::Categories(values) => {
                    let labels: Vec<String> = values.iter().map(|v| v.label.clone()).collect();
                    let bars = values
                        .iter()
                        .enumerate()
                        .map(|(i, v)| Bar::new(i as f64, v.value).name(&v.label).width(0.7))
                        .collect();
                    let chart = BarChart::new(bars).color(SERIES_COLOR);
                    plot_for(spec)
                        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
                        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
                }
                ChartData::Histogram(bins) => {
                    let bars = bins
                        .iter()
                        .map(|b| {
                            Bar::new((b.lower + b.upper) / 2.0, b.count as f64)
                                .width(b.upper - b.lower)
                                .name(format!("{:.0} to {:.0}", b.lower, b.upper))
                        })
                        .collect();
                    let chart = BarChart::new(bars).color(SERIES_COLOR);
                    plot_for(spec).show(ui, |plot_ui| plot_ui.bar_chart(chart));
                }
                ChartData::Grouped(groups) => {
                    let levels: BTreeSet<&str> = groups
                        .iter()
                        .flat_map(|g| g.values.iter().map(|v| v.label.as_str()))
                        .collect();
                    let slot = 0.8 / levels.len().max(1) as f64;

                    let charts: Vec<BarChart> = levels
                        .iter()
                        .enumerate()
                        .map(|(i, level)| {
                            let offset = -0.4 + slot * (i as f64 + 0.5);
                            let bars = groups
                                .iter()
                                .filter_map(|g| {
                                    let v = g.values.iter().find(|v| v.label == *level)?;
                                    Some(
                                        Bar::new(g.year as f64 + offset, v.value)
                                            .width(slot * 0.95)
                                            .name(format!("{level} {}", g.year)),
                                    )
                                })
                                .collect();
                            BarChart::new(bars)
                                .name(level)
                                .color(level_colors.color_for(level))
                        })
                        .collect();

                    plot_for(spec)
                        .legend(Legend::default())
                        .x_axis_formatter(year_label)
                        .show(ui, |plot_ui| {
                            for c in charts {
                                plot_ui.bar_chart(c);
                            }
                        });
                }
                ChartData::Shares(shares) => {
                    let hole = match spec.kind {
                        ChartKind::Donut { hole } => hole,
                        _ => 0.0,
                    };
                    pie(ui, shares, hole, theme);
                }
            }
        });
}

/// Common plot settings: fixed height, axis labels, no panning.
fn plot_for(spec: &ChartSpec) -> Plot {
    Plot::new(spec.title)
        .height(CHART_HEIGHT)
        .x_axis_label(spec.x_label)
        .y_axis_label(spec.y_label)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
}

fn placeholder(ui: &mut Ui, theme: ChartTheme) {
    let (rect, _) = ui.allocate_exact_size(vec2(ui.available_width(), CHART_HEIGHT), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, theme.plot_bg);
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        "No data",
        FontId::proportional(16.0),
        theme.font,
    );
}

/// Only whole years get a tick label.
fn year_label(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    if mark.value.fract() == 0.0 {
        format!("{}", mark.value as i64)
    } else {
        String::new()
    }
}

fn category_label(labels: &[String], value: f64) -> String {
    if value.fract() != 0.0 || value < 0.0 {
        return String::new();
    }
    labels.get(value as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Pie / donut
// ---------------------------------------------------------------------------

/// Draw slices clockwise from twelve o'clock, each labelled with its name
/// and percentage.  `hole` is the inner radius as a fraction of the outer.
fn pie(ui: &mut Ui, shares: &[Share], hole: f32, theme: ChartTheme) {
    let (rect, response) =
        ui.allocate_exact_size(vec2(ui.available_width(), CHART_HEIGHT), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, theme.plot_bg);

    let colors = ColorMap::new(shares.iter().map(|s| s.label.as_str()));
    let center = rect.center();
    let radius = rect.width().min(rect.height()) * 0.42;
    let inner = radius * hole;

    let mut start = -FRAC_PI_2;
    for share in shares {
        let sweep = (share.percent / 100.0) as f32 * TAU;
        let color = colors.color_for(&share.label);

        // Thin convex segments so the donut ring can be filled.
        let steps = ((sweep / TAU) * 96.0).ceil().max(1.0) as usize;
        for k in 0..steps {
            let a0 = start + sweep * k as f32 / steps as f32;
            let a1 = start + sweep * (k + 1) as f32 / steps as f32;
            let outer0 = center + radius * Vec2::angled(a0);
            let outer1 = center + radius * Vec2::angled(a1);
            let points = if inner > 0.0 {
                vec![
                    center + inner * Vec2::angled(a0),
                    outer0,
                    outer1,
                    center + inner * Vec2::angled(a1),
                ]
            } else {
                vec![center, outer0, outer1]
            };
            painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
        }

        let mid = start + sweep / 2.0;
        let label_radius = if inner > 0.0 {
            (radius + inner) / 2.0
        } else {
            radius * 0.65
        };
        painter.text(
            center + label_radius * Vec2::angled(mid),
            Align2::CENTER_CENTER,
            format!("{}\n{:.1}%", share.label, share.percent),
            FontId::proportional(13.0),
            Color32::WHITE,
        );

        start += sweep;
    }

    let details: Vec<String> = shares
        .iter()
        .map(|s| format!("{}: {} rows ({:.1}%)", s.label, s.count, s.percent))
        .collect();
    response.on_hover_text(details.join("\n"));
}
