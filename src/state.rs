use crate::color::ColorMap;
use crate::data::aggregate::{OutputBundle, compute};
use crate::data::model::{SalaryDataset, Selection};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset, immutable for the life of the process.
    pub dataset: SalaryDataset,

    /// Current dropdown value.
    pub selection: Selection,

    /// Selector choices, fixed at startup.
    pub choices: Vec<Selection>,

    /// Stats and charts for `selection`.
    pub bundle: OutputBundle,

    /// Experience level colours, shared by every selection so a level keeps
    /// its colour when the filter changes.
    pub level_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the initial state with "Analyze All" selected.
    pub fn new(dataset: SalaryDataset) -> anyhow::Result<Self> {
        let selection = Selection::All;
        let bundle = compute(&dataset, &selection)?;
        let choices = dataset.top_titles().choices();
        let level_colors = ColorMap::new(
            dataset
                .records()
                .iter()
                .map(|r| r.experience_level.as_str()),
        );
        Ok(Self {
            dataset,
            selection,
            choices,
            bundle,
            level_colors,
            status_message: None,
        })
    }

    /// Change the selection and recompute every output.
    ///
    /// On failure the previous selection and bundle are kept.
    pub fn select(&mut self, selection: Selection) {
        if selection == self.selection {
            return;
        }
        match compute(&self.dataset, &selection) {
            Ok(bundle) => {
                self.selection = selection;
                self.bundle = bundle;
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Cannot show '{selection}': {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
