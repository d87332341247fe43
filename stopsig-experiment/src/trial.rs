use stopsig_core::{Feedback, ResponseKey, StimulusType, TaskType, TrialState};

/// A captured keypress: which logical key, and when.
#[derive(Debug, Clone, Copy)]
pub struct Response {
    pub key: ResponseKey,
    pub at_ns: u64,
}

/// One in-flight trial. The stop/go flag comes from the block plan; the SSD
/// is snapshotted from the staircase when the trial starts, not when the
/// plan was generated.
#[derive(Debug, Clone)]
pub struct Trial {
    pub index: usize,
    pub task: TaskType,
    pub stimulus: StimulusType,
    pub stop_trial: bool,
    pub ssd_at_selection_ms: u64,
    pub state: TrialState,
    pub onset_ns: u64,
    pub state_entered_ns: u64,
    pub response: Option<Response>,
    pub stop_signal_shown: bool,
    pub feedback: Feedback,
    pub feedback_hold_ms: u64,
    pub iti_ms: u64,
}

impl Trial {
    pub fn new(
        index: usize,
        task: TaskType,
        stimulus: StimulusType,
        stop_trial: bool,
        ssd_at_selection_ms: u64,
        onset_ns: u64,
    ) -> Self {
        Self {
            index,
            task,
            stimulus,
            stop_trial,
            ssd_at_selection_ms,
            state: TrialState::Presenting,
            onset_ns,
            state_entered_ns: onset_ns,
            response: None,
            stop_signal_shown: false,
            feedback: Feedback::None,
            feedback_hold_ms: 0,
            iti_ms: 0,
        }
    }

    pub fn enter(&mut self, state: TrialState, now_ns: u64) {
        self.state = state;
        self.state_entered_ns = now_ns;
    }

    /// Milliseconds spent in the current state.
    pub fn in_state_ms(&self, now_ns: u64) -> u64 {
        now_ns.saturating_sub(self.state_entered_ns) / 1_000_000
    }

    /// Milliseconds since stimulus onset.
    pub fn since_onset_ms(&self, now_ns: u64) -> u64 {
        now_ns.saturating_sub(self.onset_ns) / 1_000_000
    }

    pub fn response_time_ms(&self) -> Option<u64> {
        self.response
            .map(|r| r.at_ns.saturating_sub(self.onset_ns) / 1_000_000)
    }
}
