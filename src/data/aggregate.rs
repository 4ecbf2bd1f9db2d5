use std::collections::BTreeMap;
use std::fmt;

use super::filter::{ViewError, filtered_records};
use super::model::{RemoteRatio, SalaryDataset, SalaryRecord, Selection};
use crate::theme::{ChartTheme, apply_dark_mode};

/// Number of bins in the single-title salary histogram.
pub const HISTOGRAM_BINS: usize = 20;

/// Relative radius of the hole in the remote ratio donut.
pub const DONUT_HOLE: f32 = 0.4;

// ---------------------------------------------------------------------------
// Chart data shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartKind {
    Line,
    Bar,
    Histogram,
    GroupedBar,
    Pie,
    /// Pie with a hole; `hole` is the inner radius as a fraction of the outer.
    Donut { hole: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledValue {
    pub label: String,
    pub value: f64,
}

/// One histogram bar covering `[lower, upper)`; the last bin also includes
/// its upper edge.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Means of one year, one entry per experience level present that year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearGroup {
    pub year: i32,
    pub values: Vec<LabeledValue>,
}

/// One pie slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub label: String,
    pub count: usize,
    /// Share of the subset's row count, 0..=100.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    YearSeries(Vec<YearValue>),
    Categories(Vec<LabeledValue>),
    Histogram(Vec<HistogramBin>),
    Grouped(Vec<YearGroup>),
    Shares(Vec<Share>),
}

impl ChartData {
    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match self {
            ChartData::YearSeries(v) => v.is_empty(),
            ChartData::Categories(v) => v.is_empty(),
            ChartData::Histogram(v) => v.is_empty(),
            ChartData::Grouped(v) => v.is_empty(),
            ChartData::Shares(v) => v.is_empty(),
        }
    }
}

/// Everything the UI needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub data: ChartData,
    pub theme: ChartTheme,
}

impl ChartSpec {
    fn new(
        kind: ChartKind,
        title: &'static str,
        x_label: &'static str,
        y_label: &'static str,
        data: ChartData,
    ) -> Self {
        ChartSpec {
            kind,
            title,
            x_label,
            y_label,
            data,
            theme: ChartTheme::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryStats {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

/// Mean, max and min salary of `rows`.  Undefined for an empty subset.
pub fn summary_stats(rows: &[&SalaryRecord]) -> Result<SalaryStats, ViewError> {
    if rows.is_empty() {
        return Err(ViewError::NoData);
    }
    let mut sum = 0.0;
    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;
    for rec in rows {
        sum += rec.salary_in_usd;
        max = max.max(rec.salary_in_usd);
        min = min.min(rec.salary_in_usd);
    }
    Ok(SalaryStats {
        mean: sum / rows.len() as f64,
        max,
        min,
    })
}

/// A labelled salary figure shown above the charts.
#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub label: &'static str,
    /// `None` when the subset is empty.
    pub value: Option<f64>,
}

impl fmt::Display for StatCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(v) => write!(f, "{}: ${v:.2}", self.label),
            None => write!(f, "{}: no data", self.label),
        }
    }
}

fn stat_cards(stats: Option<SalaryStats>) -> [StatCard; 3] {
    [
        StatCard {
            label: "Average Salary",
            value: stats.map(|s| s.mean),
        },
        StatCard {
            label: "Maximum Salary",
            value: stats.map(|s| s.max),
        },
        StatCard {
            label: "Minimum Salary",
            value: stats.map(|s| s.min),
        },
    ]
}

// ---------------------------------------------------------------------------
// Output bundle
// ---------------------------------------------------------------------------

/// The full result of one dashboard recompute.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputBundle {
    pub selection: Selection,
    /// Rows in the filtered subset.
    pub row_count: usize,
    /// Average, maximum, minimum salary.
    pub stats: [StatCard; 3],
    /// Year trend, title/distribution view, experience by year, year
    /// distribution, remote ratio distribution.
    pub charts: [ChartSpec; 5],
}

/// Build every stat and chart for `selection`.
///
/// Fails only when `selection` is not one of the dataset's choices.  An empty
/// subset yields "no data" stats and empty charts.
pub fn compute(dataset: &SalaryDataset, selection: &Selection) -> Result<OutputBundle, ViewError> {
    let rows = filtered_records(dataset, selection)?;
    log::debug!("Recomputing dashboard for '{selection}': {} rows", rows.len());

    let stats = match summary_stats(&rows) {
        Ok(s) => Some(s),
        Err(e) => {
            log::debug!("{e}");
            None
        }
    };

    let title_view = if selection.is_all() {
        average_by_title(&rows, dataset.top_titles().titles())
    } else {
        salary_distribution(&rows)
    };

    let charts = [
        salary_by_year(&rows),
        title_view,
        salary_by_experience_and_year(&rows),
        year_distribution(&rows),
        remote_ratio_distribution(&rows),
    ]
    .map(apply_dark_mode);

    Ok(OutputBundle {
        selection: selection.clone(),
        row_count: rows.len(),
        stats: stat_cards(stats),
        charts,
    })
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
    }

    fn value(self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Mean salary per year, ascending.
pub fn salary_by_year(rows: &[&SalaryRecord]) -> ChartSpec {
    let mut by_year: BTreeMap<i32, Mean> = BTreeMap::new();
    for rec in rows {
        by_year.entry(rec.year).or_default().push(rec.salary_in_usd);
    }
    let series = by_year
        .into_iter()
        .map(|(year, m)| YearValue {
            year,
            value: m.value(),
        })
        .collect();

    ChartSpec::new(
        ChartKind::Line,
        "Average Salary by Work Year",
        "Year",
        "Salary (USD)",
        ChartData::YearSeries(series),
    )
}

/// Mean salary per job title, for `titles` only, ordered by title.
pub fn average_by_title(rows: &[&SalaryRecord], titles: &[String]) -> ChartSpec {
    let mut by_title: BTreeMap<&str, Mean> = BTreeMap::new();
    for rec in rows {
        if titles.contains(&rec.job_title) {
            by_title
                .entry(rec.job_title.as_str())
                .or_default()
                .push(rec.salary_in_usd);
        }
    }
    let bars = by_title
        .into_iter()
        .map(|(title, m)| LabeledValue {
            label: title.to_string(),
            value: m.value(),
        })
        .collect();

    ChartSpec::new(
        ChartKind::Bar,
        "Average Salary by Job Title",
        "Job Title",
        "Salary (USD)",
        ChartData::Categories(bars),
    )
}

/// Histogram of salaries with [`HISTOGRAM_BINS`] equal-width bins.
pub fn salary_distribution(rows: &[&SalaryRecord]) -> ChartSpec {
    ChartSpec::new(
        ChartKind::Histogram,
        "Salary Distribution",
        "Salary (USD)",
        "Count",
        ChartData::Histogram(histogram(rows, HISTOGRAM_BINS)),
    )
}

/// Split `[min, max]` of the salaries into `bins` equal-width bins.
///
/// A zero-width range is widened to `[v, v + 1)`.  No rows → no bins.
pub fn histogram(rows: &[&SalaryRecord], bins: usize) -> Vec<HistogramBin> {
    let Ok(stats) = summary_stats(rows) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    let lower = stats.min;
    let upper = if stats.max > stats.min {
        stats.max
    } else {
        stats.min + 1.0
    };
    let width = (upper - lower) / bins as f64;

    let mut counts = vec![0usize; bins];
    for rec in rows {
        let idx = ((rec.salary_in_usd - lower) / width) as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lower + i as f64 * width,
            upper: if i + 1 == bins {
                upper
            } else {
                lower + (i + 1) as f64 * width
            },
            count,
        })
        .collect()
}

/// Mean salary per (year, experience level).  Missing pairs are absent.
pub fn salary_by_experience_and_year(rows: &[&SalaryRecord]) -> ChartSpec {
    let mut groups: BTreeMap<i32, BTreeMap<&str, Mean>> = BTreeMap::new();
    for rec in rows {
        groups
            .entry(rec.year)
            .or_default()
            .entry(rec.experience_level.as_str())
            .or_default()
            .push(rec.salary_in_usd);
    }
    let buckets = groups
        .into_iter()
        .map(|(year, levels)| YearGroup {
            year,
            values: levels
                .into_iter()
                .map(|(level, m)| LabeledValue {
                    label: level.to_string(),
                    value: m.value(),
                })
                .collect(),
        })
        .collect();

    ChartSpec::new(
        ChartKind::GroupedBar,
        "Average Salary by Experience Level and Year",
        "Year",
        "Average Salary",
        ChartData::Grouped(buckets),
    )
}

/// Row count per year, with each year's share of the subset.
pub fn year_distribution(rows: &[&SalaryRecord]) -> ChartSpec {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for rec in rows {
        *counts.entry(rec.year).or_default() += 1;
    }
    ChartSpec::new(
        ChartKind::Pie,
        "Work Year Distribution",
        "",
        "",
        ChartData::Shares(shares(counts, rows.len())),
    )
}

/// Row count per remote ratio, with each ratio's share of the subset.
pub fn remote_ratio_distribution(rows: &[&SalaryRecord]) -> ChartSpec {
    let mut counts: BTreeMap<RemoteRatio, usize> = BTreeMap::new();
    for rec in rows {
        *counts.entry(rec.remote_ratio).or_default() += 1;
    }
    ChartSpec::new(
        ChartKind::Donut { hole: DONUT_HOLE },
        "Remote Ratio Distribution",
        "",
        "",
        ChartData::Shares(shares(counts, rows.len())),
    )
}

fn shares<K: fmt::Display>(counts: BTreeMap<K, usize>, total: usize) -> Vec<Share> {
    counts
        .into_iter()
        .map(|(key, count)| Share {
            label: key.to_string(),
            count,
            percent: count as f64 * 100.0 / total as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;

    fn scenario() -> SalaryDataset {
        SalaryDataset::from_records(vec![
            record("Engineer", 2020, 100.0),
            record("Engineer", 2021, 200.0),
            record("Analyst", 2020, 300.0),
        ])
        .unwrap()
    }

    fn year_counts(bundle: &OutputBundle) -> Vec<(String, usize)> {
        match &bundle.charts[3].data {
            ChartData::Shares(s) => s.iter().map(|s| (s.label.clone(), s.count)).collect(),
            other => panic!("unexpected year distribution data: {other:?}"),
        }
    }

    #[test]
    fn test_engineer_scenario() {
        let ds = scenario();
        let bundle = compute(&ds, &Selection::Title("Engineer".into())).unwrap();

        assert_eq!(bundle.row_count, 2);
        assert_eq!(bundle.stats[0].value, Some(150.0));
        assert_eq!(bundle.stats[1].value, Some(200.0));
        assert_eq!(bundle.stats[2].value, Some(100.0));
        assert_eq!(
            bundle.charts[0].data,
            ChartData::YearSeries(vec![
                YearValue { year: 2020, value: 100.0 },
                YearValue { year: 2021, value: 200.0 },
            ])
        );
    }

    #[test]
    fn test_analyze_all_scenario() {
        let ds = scenario();
        let bundle = compute(&ds, &Selection::All).unwrap();

        assert_eq!(bundle.row_count, ds.len());
        assert_eq!(bundle.stats[0].value, Some(200.0));
        assert_eq!(bundle.stats[1].value, Some(300.0));
        assert_eq!(bundle.stats[2].value, Some(100.0));
        assert_eq!(
            year_counts(&bundle),
            vec![("2020".to_string(), 2), ("2021".to_string(), 1)]
        );
    }

    #[test]
    fn test_year_counts_sum_to_subset_size() {
        let ds = scenario();
        for selection in ds.top_titles().choices() {
            let bundle = compute(&ds, &selection).unwrap();
            let total: usize = year_counts(&bundle).iter().map(|(_, c)| c).sum();
            let expected = match &selection {
                Selection::All => ds.len(),
                Selection::Title(t) => ds.records().iter().filter(|r| &r.job_title == t).count(),
            };
            assert_eq!(total, expected, "selection {selection}");
            assert_eq!(bundle.stats.len(), 3);
            assert_eq!(bundle.charts.len(), 5);
        }
    }

    #[test]
    fn test_title_view_switches_with_selection() {
        let ds = scenario();
        let all = compute(&ds, &Selection::All).unwrap();
        assert_eq!(all.charts[1].kind, ChartKind::Bar);
        assert_eq!(all.charts[1].title, "Average Salary by Job Title");

        let one = compute(&ds, &Selection::Title("Analyst".into())).unwrap();
        assert_eq!(one.charts[1].kind, ChartKind::Histogram);
        assert_eq!(one.charts[1].title, "Salary Distribution");
    }

    #[test]
    fn test_every_chart_is_dark_themed() {
        let ds = scenario();
        let bundle = compute(&ds, &Selection::All).unwrap();
        assert!(bundle.charts.iter().all(|c| c.theme == ChartTheme::DARK));
    }

    #[test]
    fn test_invalid_selection_fails_loudly() {
        let ds = scenario();
        let err = compute(&ds, &Selection::Title("Chef".into())).unwrap_err();
        assert_eq!(err, ViewError::InvalidSelection("Chef".into()));
    }

    #[test]
    fn test_singleton_mean_and_ordering() {
        let rec = record("Solo", 2022, 1234.5);
        let stats = summary_stats(&[&rec]).unwrap();
        assert_eq!(stats.mean, 1234.5);

        let ds = scenario();
        let rows: Vec<&SalaryRecord> = ds.records().iter().collect();
        let stats = summary_stats(&rows).unwrap();
        assert!(stats.min <= stats.mean && stats.mean <= stats.max);
    }

    #[test]
    fn test_empty_subset_degrades() {
        assert_eq!(summary_stats(&[]), Err(ViewError::NoData));

        let charts = [
            salary_by_year(&[]),
            salary_distribution(&[]),
            salary_by_experience_and_year(&[]),
            year_distribution(&[]),
            remote_ratio_distribution(&[]),
        ];
        assert!(charts.iter().all(|c| c.data.is_empty()));

        let cards = stat_cards(None);
        assert_eq!(cards[0].to_string(), "Average Salary: no data");
    }

    #[test]
    fn test_stat_card_format() {
        let card = StatCard {
            label: "Average Salary",
            value: Some(123456.784),
        };
        assert_eq!(card.to_string(), "Average Salary: $123456.78");
    }

    #[test]
    fn test_remote_ratio_percentages() {
        let rows: Vec<SalaryRecord> = [0, 0, 50, 100]
            .into_iter()
            .map(|ratio| SalaryRecord {
                remote_ratio: RemoteRatio::try_from(ratio).unwrap(),
                ..record("Engineer", 2022, 1.0)
            })
            .collect();
        let refs: Vec<&SalaryRecord> = rows.iter().collect();

        let chart = remote_ratio_distribution(&refs);
        assert_eq!(chart.kind, ChartKind::Donut { hole: DONUT_HOLE });
        let ChartData::Shares(slices) = chart.data else {
            panic!("expected shares");
        };
        let got: Vec<(&str, f64)> = slices.iter().map(|s| (s.label.as_str(), s.percent)).collect();
        assert_eq!(got, vec![("0", 50.0), ("50", 25.0), ("100", 25.0)]);
    }

    #[test]
    fn test_histogram_bins() {
        let rows: Vec<SalaryRecord> = (0..=20)
            .map(|i| record("Engineer", 2022, i as f64 * 10.0))
            .collect();
        let refs: Vec<&SalaryRecord> = rows.iter().collect();

        let bins = histogram(&refs, HISTOGRAM_BINS);
        assert_eq!(bins.len(), HISTOGRAM_BINS);
        assert_eq!(bins[0].lower, 0.0);
        assert_eq!(bins[HISTOGRAM_BINS - 1].upper, 200.0);
        // max lands in the last bin
        assert_eq!(bins[HISTOGRAM_BINS - 1].count, 2);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), rows.len());
    }

    #[test]
    fn test_histogram_single_value() {
        let rec = record("Engineer", 2022, 500.0);
        let bins = histogram(&[&rec, &rec], HISTOGRAM_BINS);
        assert_eq!(bins.len(), HISTOGRAM_BINS);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[0].lower, 500.0);
        assert_eq!(bins[HISTOGRAM_BINS - 1].upper, 501.0);
    }

    #[test]
    fn test_average_by_title_only_top_titles() {
        let rows = [
            record("Engineer", 2020, 100.0),
            record("Engineer", 2021, 300.0),
            record("Analyst", 2020, 50.0),
            record("Rare", 2020, 9999.0),
        ];
        let refs: Vec<&SalaryRecord> = rows.iter().collect();
        let titles = vec!["Engineer".to_string(), "Analyst".to_string()];

        let chart = average_by_title(&refs, &titles);
        assert_eq!(
            chart.data,
            ChartData::Categories(vec![
                LabeledValue { label: "Analyst".into(), value: 50.0 },
                LabeledValue { label: "Engineer".into(), value: 200.0 },
            ])
        );
    }

    #[test]
    fn test_experience_groups_skip_missing_pairs() {
        let mut rows = vec![
            record("Engineer", 2020, 100.0),
            record("Engineer", 2020, 200.0),
            record("Engineer", 2021, 400.0),
        ];
        rows[0].experience_level = "EN".into();
        rows[1].experience_level = "SE".into();
        rows[2].experience_level = "EN".into();
        let refs: Vec<&SalaryRecord> = rows.iter().collect();

        let chart = salary_by_experience_and_year(&refs);
        let ChartData::Grouped(groups) = chart.data else {
            panic!("expected grouped data");
        };
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].year, 2020);
        assert_eq!(groups[0].values.len(), 2);
        assert_eq!(groups[1].year, 2021);
        assert_eq!(
            groups[1].values,
            vec![LabeledValue { label: "EN".into(), value: 400.0 }]
        );
    }
}
