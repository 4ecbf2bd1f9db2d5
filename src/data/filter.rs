use thiserror::Error;

use super::model::{SalaryDataset, SalaryRecord, Selection};

// ---------------------------------------------------------------------------
// Errors raised while building a view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// The selection is neither "Analyze All" nor one of the top job titles.
    #[error("'{0}' is not one of the selectable job titles")]
    InvalidSelection(String),

    /// The filtered subset has no rows, so salary statistics are undefined.
    #[error("no rows match the current selection")]
    NoData,
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return the rows matching `selection`, in source order.
///
/// * `Selection::All` → every row
/// * `Selection::Title(t)` → rows whose job title is exactly `t`; `t` must be
///   one of the dataset's top titles
pub fn filtered_records<'a>(
    dataset: &'a SalaryDataset,
    selection: &Selection,
) -> Result<Vec<&'a SalaryRecord>, ViewError> {
    match selection {
        Selection::All => Ok(dataset.records().iter().collect()),
        Selection::Title(title) => {
            if !dataset.top_titles().contains(title) {
                return Err(ViewError::InvalidSelection(title.clone()));
            }
            Ok(dataset
                .records()
                .iter()
                .filter(|rec| rec.job_title == *title)
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;

    fn dataset() -> SalaryDataset {
        SalaryDataset::from_records(vec![
            record("Engineer", 2020, 100.0),
            record("Engineer", 2021, 200.0),
            record("Analyst", 2020, 300.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_all_returns_every_row() {
        let ds = dataset();
        let rows = filtered_records(&ds, &Selection::All).unwrap();
        assert_eq!(rows.len(), ds.len());
    }

    #[test]
    fn test_title_returns_matching_rows_only() {
        let ds = dataset();
        let rows = filtered_records(&ds, &Selection::Title("Engineer".into())).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.job_title == "Engineer"));
        assert_eq!(rows[0].year, 2020);
        assert_eq!(rows[1].year, 2021);
    }

    #[test]
    fn test_unknown_title_is_rejected() {
        let ds = dataset();
        let err = filtered_records(&ds, &Selection::Title("Astronaut".into())).unwrap_err();
        assert_eq!(err, ViewError::InvalidSelection("Astronaut".into()));
    }

    #[test]
    fn test_title_matching_is_exact() {
        let ds = dataset();
        let err = filtered_records(&ds, &Selection::Title("engineer".into())).unwrap_err();
        assert!(matches!(err, ViewError::InvalidSelection(_)));
    }
}
