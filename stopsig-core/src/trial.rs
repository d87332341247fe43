use serde::{Deserialize, Serialize};

use crate::stimulus::StimulusType;
use crate::task::TaskType;

/// Trial state machine states. Scoring happens on the transition out of
/// `AwaitingResponse`, whether a keypress or the deadline resolved it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialState {
    Presenting,
    AwaitingResponse,
    AttentionPrompt,
    Feedback,
    InterTrialInterval,
    Complete,
}

/// Recorded outcome of one executed trial. Immutable once created; the
/// serialized field names match the stored-record wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialResult {
    pub participant_id: String,
    pub task_type: TaskType,
    pub stimulus_type: StimulusType,
    pub stop_trial: bool,
    pub response_time: Option<u64>,
    pub correct: bool,
    pub ssd: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_serializes_with_wire_field_names() {
        let result = TrialResult {
            participant_id: "123456".into(),
            task_type: TaskType::Simple,
            stimulus_type: StimulusType::Circle,
            stop_trial: false,
            response_time: Some(412),
            correct: true,
            ssd: 350,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["participantId"], "123456");
        assert_eq!(json["taskType"], "simple");
        assert_eq!(json["stimulusType"], "circle");
        assert_eq!(json["stopTrial"], false);
        assert_eq!(json["responseTime"], 412);
        assert_eq!(json["correct"], true);
        assert_eq!(json["ssd"], 350);
    }

    #[test]
    fn absent_response_time_serializes_as_null() {
        let result = TrialResult {
            participant_id: "123456".into(),
            task_type: TaskType::Complex,
            stimulus_type: StimulusType::Spiral,
            stop_trial: true,
            response_time: None,
            correct: true,
            ssd: 425,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["responseTime"].is_null());
    }
}
