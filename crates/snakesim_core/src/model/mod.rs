mod ids;
mod results;

pub use ids::TransitionId;
pub use results::{AbortReason, RunStatus, SimulationResults, TransitionUsage};
