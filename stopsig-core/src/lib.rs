pub mod feedback;
pub mod phase;
pub mod response;
pub mod stimulus;
pub mod task;
pub mod trial;

pub use feedback::Feedback;
pub use phase::SessionPhase;
pub use response::ResponseKey;
pub use stimulus::StimulusType;
pub use task::TaskType;
pub use trial::{TrialResult, TrialState};
