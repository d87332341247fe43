use serde::{Deserialize, Serialize};

use crate::response::ResponseKey;
use crate::task::TaskType;

/// Stimulus kinds across all blocks. The practice block only ever shows the
/// up arrow; the two task blocks draw from the four shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StimulusType {
    Circle,
    Square,
    Hash,
    Spiral,
    #[serde(rename = "arrow")]
    UpArrow,
}

impl StimulusType {
    /// Display glyph drawn at screen center.
    pub fn glyph(&self) -> &'static str {
        match self {
            StimulusType::Circle => "⬤",
            StimulusType::Square => "■",
            StimulusType::Hash => "#",
            StimulusType::Spiral => "ᘓ",
            StimulusType::UpArrow => "↑",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StimulusType::Circle => "circle",
            StimulusType::Square => "square",
            StimulusType::Hash => "hash",
            StimulusType::Spiral => "spiral",
            StimulusType::UpArrow => "arrow",
        }
    }

    /// The key that scores as correct for this stimulus.
    pub fn response_key(&self) -> ResponseKey {
        match self {
            StimulusType::Circle => ResponseKey::S,
            StimulusType::Square => ResponseKey::A,
            StimulusType::Hash => ResponseKey::K,
            StimulusType::Spiral => ResponseKey::L,
            StimulusType::UpArrow => ResponseKey::Space,
        }
    }
}

/// Stimulus set a task draws from, uniformly at random.
pub fn stimulus_set(task: TaskType) -> &'static [StimulusType] {
    match task {
        TaskType::Practice => &[StimulusType::UpArrow],
        TaskType::Simple | TaskType::Complex => &[
            StimulusType::Circle,
            StimulusType::Square,
            StimulusType::Hash,
            StimulusType::Spiral,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_blocks_share_the_four_shapes() {
        assert_eq!(stimulus_set(TaskType::Simple), stimulus_set(TaskType::Complex));
        assert_eq!(stimulus_set(TaskType::Simple).len(), 4);
    }

    #[test]
    fn practice_only_shows_the_arrow() {
        assert_eq!(stimulus_set(TaskType::Practice), &[StimulusType::UpArrow][..]);
        assert_eq!(StimulusType::UpArrow.response_key(), ResponseKey::Space);
    }

    #[test]
    fn shape_key_mapping() {
        assert_eq!(StimulusType::Circle.response_key(), ResponseKey::S);
        assert_eq!(StimulusType::Square.response_key(), ResponseKey::A);
        assert_eq!(StimulusType::Hash.response_key(), ResponseKey::K);
        assert_eq!(StimulusType::Spiral.response_key(), ResponseKey::L);
    }
}
