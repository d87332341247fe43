//! Instruction screen texts, shown between blocks.

use crate::state::PracticeSummary;

pub const WELCOME: &str = "\
In the upcoming experiment, you will be exposed to different shapes and will
be instructed to respond using different keys.

The experiment takes approximately 20 minutes. While you may exit the
experiment at any time, you must complete the entire experiment to receive
payment.

Press SPACE to continue.";

pub const PRACTICE: &str = "\
Practice Session

In this practice session, you will learn how to perform the task.

When you see an UP ARROW, press the SPACE key.
If a red frame appears, try to stop yourself from pressing any key.

Press SPACE to start the practice.";

pub const SIMPLE_TASK: &str = "\
In the following task, different shapes will appear on the screen.

When a circle appears, press the S key
When a square appears, press the A key
When a hash appears, press the K key
When a wave appears, press the L key

If a red frame appears on the screen, you must stop and not press any key
until the next symbol appears.

Try to respond as accurately and quickly as possible. Your performance will
be measured based on both response accuracy and reaction time.

Press SPACE to begin.";

pub const COMPLEX_TASK: &str = "\
You have completed the first part of the first session.
Continue to the second part when you feel ready.

Press SPACE to continue.";

pub const COMPLETED: &str = "\
The experiment is now complete. Thank you for your participation!";

pub const KEY_REMINDER: &str = "■ - A | ⬤ - S | # - K | ᘓ - L";

pub const ATTENTION_PROMPT: &str = "Please try to respond faster!";

/// Post-practice summary screen, with the block's hit and stop counts.
pub fn practice_debrief(summary: &PracticeSummary) -> String {
    format!(
        "Practice session completed!\n\n\
         Your performance:\n\
         - You correctly pressed SPACE {} times out of {} opportunities\n\
         - You successfully stopped {} times out of {} stop signals\n\n\
         Press SPACE to continue to the real experiment.",
        summary.go_hits, summary.go_total, summary.stop_successes, summary.stop_total
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debrief_reports_both_counts() {
        let text = practice_debrief(&PracticeSummary {
            go_hits: 5,
            go_total: 6,
            stop_successes: 3,
            stop_total: 4,
        });
        assert!(text.contains("5 times out of 6"));
        assert!(text.contains("3 times out of 4"));
    }
}
