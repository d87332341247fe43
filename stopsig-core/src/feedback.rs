/// Per-trial feedback category. Purely presentational; never stored in a
/// trial result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feedback {
    WrongKey,
    SlowCorrect,
    Miss,
    Perfect,
    FailedInhibition,
    #[default]
    None,
}

impl Feedback {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Feedback::WrongKey => Some("Wrong key"),
            Feedback::SlowCorrect => Some("Try to go faster!"),
            Feedback::Miss => Some("Miss - you must go faster!"),
            Feedback::Perfect => Some("Perfect!"),
            Feedback::FailedInhibition => Some("Try not to respond to stop trials!"),
            Feedback::None => None,
        }
    }
}

/// Derive the feedback category from a scored trial. `slow_threshold_ms`
/// separates fast from slow correct go responses.
pub fn classify(
    stop_trial: bool,
    response_time_ms: Option<u64>,
    correct: bool,
    slow_threshold_ms: u64,
) -> Feedback {
    if !stop_trial {
        match response_time_ms {
            Some(_) if !correct => Feedback::WrongKey,
            Some(rt) if rt >= slow_threshold_ms => Feedback::SlowCorrect,
            Some(_) => Feedback::Perfect,
            None => Feedback::Miss,
        }
    } else if correct {
        Feedback::Perfect
    } else {
        Feedback::FailedInhibition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLOW: u64 = 500;

    #[test]
    fn go_trial_categories() {
        assert_eq!(classify(false, Some(300), false, SLOW), Feedback::WrongKey);
        assert_eq!(classify(false, Some(650), true, SLOW), Feedback::SlowCorrect);
        assert_eq!(classify(false, Some(499), true, SLOW), Feedback::Perfect);
        assert_eq!(classify(false, None, false, SLOW), Feedback::Miss);
    }

    #[test]
    fn stop_trial_categories() {
        assert_eq!(classify(true, None, true, SLOW), Feedback::Perfect);
        assert_eq!(
            classify(true, Some(210), false, SLOW),
            Feedback::FailedInhibition
        );
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        assert_eq!(classify(false, Some(500), true, SLOW), Feedback::SlowCorrect);
    }
}
