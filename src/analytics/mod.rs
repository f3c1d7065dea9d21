pub mod aggregator;
pub mod classifier;
pub mod report;
pub mod session;
pub mod tally;
pub mod window;


pub use aggregator::*;
pub use report::*;
pub use session::*;
pub use tally::{Leader, Tally};
pub use window::{AnalysisWindow, ReportTimezone};
