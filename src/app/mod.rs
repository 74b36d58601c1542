pub mod context;
pub mod error;

pub use context::{AppContext, RunSummary};
pub use error::{Result, TapError};
