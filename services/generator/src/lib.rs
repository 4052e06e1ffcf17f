pub mod errors;
pub mod master_data;
pub mod publish;
pub mod transactions;

pub use errors::{PipelineError, PipelineResult};
