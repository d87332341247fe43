//! Durable persistence for the finished session: one pretty-printed JSON
//! document per participant under the results directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use stopsig_experiment::ParticipantRecord;

pub fn save_record(record: &ParticipantRecord, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("cannot create results directory {}", dir.display()))?;
    let path = dir.join(format!("{}.json", record.participant_id));
    let json = serde_json::to_string_pretty(record).context("cannot serialize record")?;
    fs::write(&path, json).with_context(|| format!("cannot write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stopsig_core::{StimulusType, TaskType, TrialResult};
    use stopsig_experiment::Demographics;

    #[test]
    fn record_round_trips_through_disk() {
        let record = ParticipantRecord {
            participant_id: "031415".into(),
            demographic: Demographics {
                age: 22,
                gender: "female".into(),
                hand: "right".into(),
                timestamp: "2025-05-02T10:00:00Z".into(),
            },
            results: vec![TrialResult {
                participant_id: "031415".into(),
                task_type: TaskType::Simple,
                stimulus_type: StimulusType::Circle,
                stop_trial: true,
                response_time: None,
                correct: true,
                ssd: 400,
            }],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = save_record(&record, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "031415.json");

        let data = fs::read_to_string(&path).unwrap();
        let loaded: ParticipantRecord = serde_json::from_str(&data).unwrap();
        assert_eq!(loaded.participant_id, record.participant_id);
        assert_eq!(loaded.results.len(), 1);
        assert_eq!(loaded.results[0].ssd, 400);
        assert!(data.contains("\"stopTrial\": true"));
    }
}
