use serde::{Deserialize, Serialize};

/// Which block a trial belongs to. The two real tasks share parameters and
/// differ in name only; practice has its own deadlines and response key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Practice,
    Simple,
    Complex,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Practice => "practice",
            TaskType::Simple => "simple",
            TaskType::Complex => "complex",
        }
    }
}
