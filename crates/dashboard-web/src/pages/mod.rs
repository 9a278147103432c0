mod transaction_analysis;

pub use transaction_analysis::TransactionAnalysisPage;
