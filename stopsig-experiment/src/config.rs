use stopsig_core::TaskType;

/// Fixed task parameters. Durations are milliseconds.
#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    pub initial_ssd_ms: u64,
    pub practice_initial_ssd_ms: u64,
    pub step_ssd_ms: u64,
    pub min_ssd_ms: u64,
    pub max_ssd_ms: u64,
    pub go_duration_simple_ms: u64,
    pub go_duration_complex_ms: u64,
    pub go_duration_practice_ms: u64,
    pub inter_trial_interval_ms: (u64, u64),
    pub stop_ratio: f64,
    pub trials_per_task: usize,
    pub practice_trials: usize,
    pub practice_stop_trials: usize,
    pub slow_response_ms: u64,
    pub attention_miss_threshold: u32,
    pub attention_prompt_ms: u64,
    pub stop_feedback_ms: u64,
    pub completion_hold_ms: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            initial_ssd_ms: 350,
            practice_initial_ssd_ms: 300,
            step_ssd_ms: 25,
            min_ssd_ms: 50,
            max_ssd_ms: 1000,
            go_duration_simple_ms: 900,
            go_duration_complex_ms: 900,
            go_duration_practice_ms: 700,
            inter_trial_interval_ms: (500, 1000),
            stop_ratio: 0.25,
            trials_per_task: 200,
            practice_trials: 10,
            practice_stop_trials: 4,
            slow_response_ms: 500,
            attention_miss_threshold: 5,
            attention_prompt_ms: 2000,
            stop_feedback_ms: 1000,
            completion_hold_ms: 2000,
        }
    }
}

impl ExperimentConfig {
    /// Response deadline from stimulus onset.
    pub fn go_duration_ms(&self, task: TaskType) -> u64 {
        match task {
            TaskType::Simple => self.go_duration_simple_ms,
            TaskType::Complex => self.go_duration_complex_ms,
            TaskType::Practice => self.go_duration_practice_ms,
        }
    }

    /// Staircase starting point for a block.
    pub fn initial_ssd_for(&self, task: TaskType) -> u64 {
        match task {
            TaskType::Practice => self.practice_initial_ssd_ms,
            TaskType::Simple | TaskType::Complex => self.initial_ssd_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn practice_runs_on_shorter_deadline_and_lower_ssd() {
        let config = ExperimentConfig::default();
        assert!(config.go_duration_ms(TaskType::Practice) < config.go_duration_ms(TaskType::Simple));
        assert!(config.initial_ssd_for(TaskType::Practice) < config.initial_ssd_for(TaskType::Simple));
        assert_eq!(
            config.go_duration_ms(TaskType::Simple),
            config.go_duration_ms(TaskType::Complex)
        );
    }
}
