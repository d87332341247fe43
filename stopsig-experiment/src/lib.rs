pub mod config;
pub mod instructions;
pub mod keymap;
pub mod sequence;
pub mod session;
pub mod staircase;
pub mod state;
pub mod trial;

pub use config::ExperimentConfig;
pub use session::{Demographics, ParticipantRecord, ResultSink};
pub use staircase::Staircase;
pub use state::{ExperimentEvent, ExperimentStateMachine, PracticeSummary};
pub use trial::{Response, Trial};
