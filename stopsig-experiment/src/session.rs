use rand::Rng;
use serde::{Deserialize, Serialize};
use stopsig_core::TrialResult;

/// Demographic record captured once at intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Demographics {
    pub age: u32,
    pub gender: String,
    pub hand: String,
    pub timestamp: String,
}

/// The bundle handed to persistence at session end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRecord {
    pub participant_id: String,
    pub demographic: Demographics,
    pub results: Vec<TrialResult>,
}

/// Append-only accumulator for the session's trial results.
#[derive(Debug, Default)]
pub struct ResultSink {
    results: Vec<TrialResult>,
}

impl ResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: TrialResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn results(&self) -> &[TrialResult] {
        &self.results
    }

    pub fn bundle(&self, participant_id: &str, demographic: &Demographics) -> ParticipantRecord {
        ParticipantRecord {
            participant_id: participant_id.to_owned(),
            demographic: demographic.clone(),
            results: self.results.clone(),
        }
    }
}

/// Six random digits, assigned once per participant.
pub fn generate_participant_id<R: Rng>(rng: &mut R) -> String {
    (0..6)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use stopsig_core::{StimulusType, TaskType};

    fn demographics() -> Demographics {
        Demographics {
            age: 31,
            gender: "female".into(),
            hand: "right".into(),
            timestamp: "2025-05-02T10:00:00Z".into(),
        }
    }

    #[test]
    fn participant_ids_are_six_digits() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let id = generate_participant_id(&mut rng);
            assert_eq!(id.len(), 6);
            assert!(id.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn sink_appends_in_order_and_bundles_everything() {
        let mut sink = ResultSink::new();
        for i in 0..3u64 {
            sink.push(TrialResult {
                participant_id: "042317".into(),
                task_type: TaskType::Simple,
                stimulus_type: StimulusType::Hash,
                stop_trial: false,
                response_time: Some(300 + i),
                correct: true,
                ssd: 350,
            });
        }
        assert_eq!(sink.len(), 3);

        let record = sink.bundle("042317", &demographics());
        assert_eq!(record.participant_id, "042317");
        assert_eq!(record.results.len(), 3);
        assert_eq!(record.results[2].response_time, Some(302));
    }
}
