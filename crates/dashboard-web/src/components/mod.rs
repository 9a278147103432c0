mod column_toggles;
mod facet_dropdown;
mod project_selector;
mod report_table;
mod section;
mod time_range;

pub use column_toggles::ColumnToggles;
pub use facet_dropdown::FacetDropdown;
pub use project_selector::ProjectSelector;
pub use report_table::ReportTable;
pub use section::Section;
pub use time_range::TimeRangeInputs;
