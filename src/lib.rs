pub mod cli;
pub mod config;
pub mod fallback;
pub mod llm;
pub mod logging;
pub mod pipeline;
pub mod research;
pub mod search;
pub mod types;
pub mod web;

// Re-export commonly used types
pub use config::Settings;
pub use research::{ResearchOutcome, ResearchService};
pub use web::{AppState, create_app};
