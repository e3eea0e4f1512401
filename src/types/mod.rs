pub mod query;
pub mod report;
pub mod search_result;

pub use query::{Query, QueryError};
pub use report::{Report, ReportSection};
pub use search_result::SearchResult;
