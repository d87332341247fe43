//! Flattens stored participant records into analysis-ready CSV.

use stopsig_core::TaskType;
use stopsig_experiment::ParticipantRecord;

pub const CSV_HEADERS: [&str; 7] = [
    "participantId",
    "taskType",
    "stimulusType",
    "stopTrial",
    "responseTime",
    "correct",
    "ssd",
];

/// One CSV document per stored record: header row, then one row per
/// non-practice trial. Absent response times become empty cells.
pub fn record_to_csv(record: &ParticipantRecord) -> String {
    let mut rows = vec![CSV_HEADERS.join(",")];
    for trial in &record.results {
        if trial.task_type == TaskType::Practice {
            continue;
        }
        let response_time = trial
            .response_time
            .map(|rt| rt.to_string())
            .unwrap_or_default();
        rows.push(format!(
            "{},{},{},{},{},{},{}",
            record.participant_id,
            trial.task_type.as_str(),
            trial.stimulus_type.as_str(),
            trial.stop_trial,
            response_time,
            trial.correct,
            trial.ssd,
        ));
    }
    rows.join("\n")
}

/// Number of rows excluded by the practice filter.
pub fn excluded_practice_rows(record: &ParticipantRecord) -> usize {
    record
        .results
        .iter()
        .filter(|t| t.task_type == TaskType::Practice)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stopsig_core::{StimulusType, TrialResult};
    use stopsig_experiment::Demographics;

    fn record() -> ParticipantRecord {
        let trial = |task_type, stop_trial, response_time, correct| TrialResult {
            participant_id: "271828".into(),
            task_type,
            stimulus_type: StimulusType::Square,
            stop_trial,
            response_time,
            correct,
            ssd: 375,
        };
        ParticipantRecord {
            participant_id: "271828".into(),
            demographic: Demographics {
                age: 40,
                gender: "male".into(),
                hand: "right".into(),
                timestamp: "2025-05-02T10:00:00Z".into(),
            },
            results: vec![
                trial(TaskType::Practice, false, Some(420), true),
                trial(TaskType::Practice, true, None, true),
                trial(TaskType::Simple, false, Some(388), true),
                trial(TaskType::Simple, true, None, true),
                trial(TaskType::Complex, true, Some(301), false),
            ],
        }
    }

    #[test]
    fn practice_rows_are_dropped() {
        let csv = record_to_csv(&record());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4); // header + 3 task rows
        assert!(!csv.contains("practice"));
        assert_eq!(excluded_practice_rows(&record()), 2);
    }

    #[test]
    fn header_and_row_shape_match_the_stored_record() {
        let csv = record_to_csv(&record());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "participantId,taskType,stimulusType,stopTrial,responseTime,correct,ssd"
        );
        assert_eq!(lines[1], "271828,simple,square,false,388,true,375");
        assert_eq!(lines[2], "271828,simple,square,true,,true,375");
        assert_eq!(lines[3], "271828,complex,square,true,301,false,375");
    }

    #[test]
    fn export_is_idempotent() {
        let record = record();
        let first = record_to_csv(&record);
        let second = record_to_csv(&record);
        assert_eq!(first, second);
        assert_eq!(
            excluded_practice_rows(&record),
            excluded_practice_rows(&record)
        );
    }
}
