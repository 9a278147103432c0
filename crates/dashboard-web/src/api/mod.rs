mod dashboard;
mod http;

pub use dashboard::{fetch_filter_options, fetch_report};
