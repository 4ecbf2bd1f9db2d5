use std::collections::HashMap;
use std::fmt;

use anyhow::{Result, bail};

/// Number of job titles offered by the selector besides "Analyze All".
pub const TOP_TITLE_COUNT: usize = 10;

/// Label of the "no filter" choice in the selector.
pub const ANALYZE_ALL: &str = "Analyze All";

// ---------------------------------------------------------------------------
// RemoteRatio – share of remote work for one record
// ---------------------------------------------------------------------------

/// Remote work share.  The source stores this as 0, 50 or 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RemoteRatio {
    OnSite,
    Hybrid,
    FullyRemote,
}

impl RemoteRatio {
    /// The percentage value as stored in the source.
    pub fn percent(self) -> i64 {
        match self {
            RemoteRatio::OnSite => 0,
            RemoteRatio::Hybrid => 50,
            RemoteRatio::FullyRemote => 100,
        }
    }
}

impl TryFrom<i64> for RemoteRatio {
    type Error = anyhow::Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(RemoteRatio::OnSite),
            50 => Ok(RemoteRatio::Hybrid),
            100 => Ok(RemoteRatio::FullyRemote),
            other => bail!("remote_ratio must be 0, 50 or 100, got {other}"),
        }
    }
}

impl fmt::Display for RemoteRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.percent())
    }
}

// ---------------------------------------------------------------------------
// SalaryRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single employment record.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryRecord {
    pub job_title: String,
    pub experience_level: String,
    pub year: i32,
    /// Salary normalised to USD.  Always finite and non-negative.
    pub salary_in_usd: f64,
    pub remote_ratio: RemoteRatio,
}

// ---------------------------------------------------------------------------
// Selection – the value of the job title dropdown
// ---------------------------------------------------------------------------

/// The filter chosen in the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    /// "Analyze All": no filtering.
    #[default]
    All,
    /// Only rows with this exact job title.
    Title(String),
}

impl Selection {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "{ANALYZE_ALL}"),
            Selection::Title(t) => write!(f, "{t}"),
        }
    }
}

// ---------------------------------------------------------------------------
// TopTitles – most frequent job titles, fixed at load time
// ---------------------------------------------------------------------------

/// The most frequent job titles, most frequent first.
///
/// Ties in row count are broken by first appearance in the source, so the
/// same file always produces the same list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopTitles {
    titles: Vec<String>,
}

impl TopTitles {
    /// Rank titles by row count and keep the first `limit`.
    pub fn from_records(records: &[SalaryRecord], limit: usize) -> Self {
        // (title, count) in first-seen order
        let mut counts: Vec<(&str, usize)> = Vec::new();
        let mut position: HashMap<&str, usize> = HashMap::new();

        for rec in records {
            match position.get(rec.job_title.as_str()) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    position.insert(rec.job_title.as_str(), counts.len());
                    counts.push((rec.job_title.as_str(), 1));
                }
            }
        }

        // Stable sort keeps first-seen order among equal counts.
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        TopTitles {
            titles: counts
                .into_iter()
                .take(limit)
                .map(|(t, _)| t.to_string())
                .collect(),
        }
    }

    /// Real job titles, most frequent first.
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.iter().any(|t| t == title)
    }

    /// Selector choices: every real title followed by "Analyze All".
    pub fn choices(&self) -> Vec<Selection> {
        self.titles
            .iter()
            .cloned()
            .map(Selection::Title)
            .chain(std::iter::once(Selection::All))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// SalaryDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with its pre-computed title ranking.
#[derive(Debug, Clone)]
pub struct SalaryDataset {
    records: Vec<SalaryRecord>,
    top_titles: TopTitles,
}

impl SalaryDataset {
    /// Build the dataset and rank its job titles.  An empty table is an error.
    pub fn from_records(records: Vec<SalaryRecord>) -> Result<Self> {
        if records.is_empty() {
            bail!("dataset contains no rows");
        }
        let top_titles = TopTitles::from_records(&records, TOP_TITLE_COUNT);
        Ok(SalaryDataset {
            records,
            top_titles,
        })
    }

    pub fn records(&self) -> &[SalaryRecord] {
        &self.records
    }

    pub fn top_titles(&self) -> &TopTitles {
        &self.top_titles
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a constructed dataset; kept alongside `len`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn record(title: &str, year: i32, salary: f64) -> SalaryRecord {
    SalaryRecord {
        job_title: title.to_string(),
        experience_level: "SE".to_string(),
        year,
        salary_in_usd: salary,
        remote_ratio: RemoteRatio::FullyRemote,
    }
}
