/// Rendering: selector + summary cards (`panels`) and charts (`plot`).
pub mod panels;
pub mod plot;
