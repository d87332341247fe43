use rand::Rng;
use stopsig_core::feedback;
use stopsig_core::stimulus;
use stopsig_core::{Feedback, ResponseKey, SessionPhase, StimulusType, TaskType, TrialResult, TrialState};
use stopsig_timing::Timer;
use tracing::{debug, info};

use crate::config::ExperimentConfig;
use crate::instructions;
use crate::sequence;
use crate::session::{Demographics, ParticipantRecord, ResultSink};
use crate::staircase::Staircase;
use crate::trial::{Response, Trial};

#[derive(Debug, Clone, PartialEq)]
pub enum ExperimentEvent {
    SpacePressed,
    ResponseReceived(ResponseKey),
    TrialComplete,
    PhaseComplete,
    SkipBlock,
    EndSession,
}

/// Practice block tallies for the debrief screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct PracticeSummary {
    pub go_hits: usize,
    pub go_total: usize,
    pub stop_successes: usize,
    pub stop_total: usize,
}

/// Drives one session: sequences blocks, executes trials against the clock,
/// scores outcomes, feeds the staircase and the result sink.
///
/// Poll-driven: the host loop calls `update()` every frame and feeds the
/// returned events (plus raw input events) back through `handle_event()`.
/// Input only resolves a trial while it is awaiting a response, so a
/// keypress and a deadline can never both score the same trial.
pub struct ExperimentStateMachine<T, R>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    pub timer: T,
    pub rng: R,
    pub config: ExperimentConfig,
    phase: SessionPhase,
    staircase: Staircase,
    participant_id: String,
    demographic: Demographics,
    sink: ResultSink,
    plan: Vec<bool>,
    trial_index: usize,
    current: Option<Trial>,
    consecutive_misses: u32,
    practice: PracticeSummary,
    skip_requested: bool,
    ended: bool,
}

impl<T, R> ExperimentStateMachine<T, R>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    pub fn new(
        config: ExperimentConfig,
        timer: T,
        rng: R,
        participant_id: String,
        demographic: Demographics,
    ) -> Self {
        let staircase = Staircase::new(&config);
        Self {
            timer,
            rng,
            config,
            phase: SessionPhase::default(),
            staircase,
            participant_id,
            demographic,
            sink: ResultSink::new(),
            plan: Vec::new(),
            trial_index: 0,
            current: None,
            consecutive_misses: 0,
            practice: PracticeSummary::default(),
            skip_requested: false,
            ended: false,
        }
    }

    /// One poll step. Returns events for the host loop to feed back in.
    pub fn update(&mut self) -> Vec<ExperimentEvent> {
        let mut events = Vec::new();
        if self.ended {
            return events;
        }
        if self.phase.task().is_some() {
            self.update_trial(&mut events);
            if self.current.is_none() && self.trial_index >= self.plan.len() {
                events.push(ExperimentEvent::PhaseComplete);
            }
        }
        events
    }

    pub fn handle_event(&mut self, event: ExperimentEvent) -> bool {
        match (self.phase, &event) {
            (phase, ExperimentEvent::SpacePressed) if phase.is_instruction() => {
                self.advance_phase();
                true
            }
            (phase, ExperimentEvent::ResponseReceived(key)) if phase.task().is_some() => {
                self.record_response(*key)
            }
            (phase, ExperimentEvent::TrialComplete) if phase.task().is_some() => {
                self.finish_trial();
                true
            }
            (_, ExperimentEvent::PhaseComplete) => {
                self.advance_phase();
                true
            }
            (phase, ExperimentEvent::SkipBlock) if phase.task().is_some() => {
                if !self.skip_requested {
                    self.skip_requested = true;
                    info!("block skip requested; takes effect at the next trial boundary");
                }
                true
            }
            (phase, ExperimentEvent::EndSession)
                if phase.is_instruction() || phase.is_terminal() =>
            {
                info!("session end requested");
                self.ended = true;
                true
            }
            _ => false,
        }
    }

    fn advance_phase(&mut self) {
        match self.phase.next() {
            Some(next) => {
                self.phase = next;
                info!(phase = ?self.phase, "phase advanced");
                if let Some(task) = self.phase.task() {
                    self.begin_block(task);
                }
            }
            None => self.ended = true,
        }
    }

    fn begin_block(&mut self, task: TaskType) {
        self.plan = match task {
            TaskType::Practice => sequence::practice_sequence(
                &mut self.rng,
                self.config.practice_trials,
                self.config.practice_stop_trials,
            ),
            TaskType::Simple | TaskType::Complex => sequence::generate_stop_sequence(
                &mut self.rng,
                self.config.trials_per_task,
                self.config.stop_ratio,
            ),
        };
        self.staircase.reset(self.config.initial_ssd_for(task));
        self.trial_index = 0;
        self.consecutive_misses = 0;
        self.skip_requested = false;
        if task == TaskType::Practice {
            self.practice = PracticeSummary {
                go_total: self.plan.iter().filter(|&&stop| !stop).count(),
                stop_total: self.plan.iter().filter(|&&stop| stop).count(),
                ..PracticeSummary::default()
            };
        }
        info!(
            ?task,
            trials = self.plan.len(),
            stops = self.plan.iter().filter(|&&stop| stop).count(),
            ssd = self.staircase.current_ms(),
            "block started"
        );
        self.start_trial();
    }

    fn start_trial(&mut self) {
        let Some(task) = self.phase.task() else { return };
        let set = stimulus::stimulus_set(task);
        let chosen = set[self.rng.random_range(0..set.len())];
        let stop_trial = self.plan[self.trial_index];
        let trial = Trial::new(
            self.trial_index,
            task,
            chosen,
            stop_trial,
            self.staircase.current_ms(),
            self.timer.now(),
        );
        debug!(
            index = trial.index,
            stop = stop_trial,
            stimulus = chosen.as_str(),
            ssd = trial.ssd_at_selection_ms,
            "trial started"
        );
        self.current = Some(trial);
    }

    fn update_trial(&mut self, events: &mut Vec<ExperimentEvent>) {
        let now_ns = self.timer.now();

        let mut due_timeout = false;
        let mut enter_iti = false;
        if let Some(trial) = self.current.as_mut() {
            match trial.state {
                TrialState::Presenting => {
                    trial.enter(TrialState::AwaitingResponse, now_ns);
                }
                TrialState::AwaitingResponse => {
                    if trial.stop_trial
                        && !trial.stop_signal_shown
                        && trial.since_onset_ms(now_ns) >= trial.ssd_at_selection_ms
                    {
                        trial.stop_signal_shown = true;
                        debug!(index = trial.index, ssd = trial.ssd_at_selection_ms, "stop signal onset");
                    }
                    due_timeout =
                        trial.since_onset_ms(now_ns) >= self.config.go_duration_ms(trial.task);
                }
                TrialState::AttentionPrompt => {
                    if trial.in_state_ms(now_ns) >= self.config.attention_prompt_ms {
                        trial.enter(TrialState::Feedback, now_ns);
                    }
                }
                TrialState::Feedback => {
                    if trial.in_state_ms(now_ns) >= trial.feedback_hold_ms {
                        enter_iti = true;
                    }
                }
                TrialState::InterTrialInterval => {
                    if trial.in_state_ms(now_ns) >= trial.iti_ms {
                        trial.enter(TrialState::Complete, now_ns);
                        events.push(ExperimentEvent::TrialComplete);
                    }
                }
                TrialState::Complete => {}
            }
        }

        if due_timeout {
            self.score_current(now_ns);
        }
        if enter_iti {
            let (min, max) = self.config.inter_trial_interval_ms;
            let iti_ms = self.rng.random_range(min..=max);
            if let Some(trial) = self.current.as_mut() {
                trial.iti_ms = iti_ms;
                trial.enter(TrialState::InterTrialInterval, now_ns);
            }
        }
    }

    /// Accepts the first qualifying keypress while the response window is
    /// open; anything later is ignored.
    fn record_response(&mut self, key: ResponseKey) -> bool {
        let now_ns = self.timer.now();
        let armed = match self.current.as_mut() {
            Some(trial)
                if trial.state == TrialState::AwaitingResponse && trial.response.is_none() =>
            {
                trial.response = Some(Response { key, at_ns: now_ns });
                true
            }
            _ => false,
        };
        if armed {
            self.score_current(now_ns);
        }
        armed
    }

    /// Scores the current trial off whatever resolved the response window,
    /// records the result, and moves the trial on. A timeout is a normal
    /// scoreable outcome here, not a failure.
    fn score_current(&mut self, now_ns: u64) {
        let Some(trial) = self.current.as_mut() else { return };
        debug_assert_eq!(trial.state, TrialState::AwaitingResponse);

        let response_time = trial.response_time_ms();
        let correct = if trial.stop_trial {
            trial.response.is_none()
        } else {
            trial
                .response
                .is_some_and(|r| r.key == trial.stimulus.response_key())
        };

        if trial.stop_trial {
            // Affects the signal-onset delay of the next stop trial only.
            self.staircase.adjust(correct);
            // A failed inhibition shows the marker through the hold even if
            // the response beat the signal onset.
            trial.stop_signal_shown = true;
        }

        self.sink.push(TrialResult {
            participant_id: self.participant_id.clone(),
            task_type: trial.task,
            stimulus_type: trial.stimulus,
            stop_trial: trial.stop_trial,
            response_time,
            correct,
            ssd: trial.ssd_at_selection_ms,
        });

        if trial.task == TaskType::Practice {
            if trial.stop_trial {
                if correct {
                    self.practice.stop_successes += 1;
                }
            } else if trial.response.is_some() {
                self.practice.go_hits += 1;
            }
        }

        let mut attention = false;
        if trial.task != TaskType::Practice {
            if trial.response.is_some() {
                self.consecutive_misses = 0;
            } else if !trial.stop_trial {
                self.consecutive_misses += 1;
                if self.consecutive_misses >= self.config.attention_miss_threshold {
                    attention = true;
                    self.consecutive_misses = 0;
                }
            }
        }

        trial.feedback = if trial.task == TaskType::Practice {
            Feedback::None
        } else {
            feedback::classify(
                trial.stop_trial,
                response_time,
                correct,
                self.config.slow_response_ms,
            )
        };
        trial.feedback_hold_ms = if trial.stop_trial {
            self.config.stop_feedback_ms
        } else {
            0
        };

        debug!(
            index = trial.index,
            stop = trial.stop_trial,
            correct,
            rt = ?response_time,
            next_ssd = self.staircase.current_ms(),
            "trial scored"
        );

        if attention {
            trial.enter(TrialState::AttentionPrompt, now_ns);
        } else {
            trial.enter(TrialState::Feedback, now_ns);
        }
    }

    fn finish_trial(&mut self) {
        self.current = None;
        self.trial_index += 1;
        if self.skip_requested {
            // The abort lands at the trial boundary; recorded results stay.
            self.trial_index = self.plan.len();
            self.skip_requested = false;
            info!("block skipped");
        }
        if self.trial_index < self.plan.len() {
            self.start_trial();
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn instruction_text(&self) -> Option<String> {
        match self.phase {
            SessionPhase::Welcome => Some(instructions::WELCOME.to_owned()),
            SessionPhase::PracticeIntro => Some(instructions::PRACTICE.to_owned()),
            SessionPhase::PracticeDebrief => Some(instructions::practice_debrief(&self.practice)),
            SessionPhase::SimpleIntro => Some(instructions::SIMPLE_TASK.to_owned()),
            SessionPhase::ComplexIntro => Some(instructions::COMPLEX_TASK.to_owned()),
            SessionPhase::Completed => Some(instructions::COMPLETED.to_owned()),
            _ => None,
        }
    }

    /// Stimulus glyph and stop-marker flag, while the trial is visually live.
    pub fn stimulus_display(&self) -> Option<(StimulusType, bool)> {
        self.current.as_ref().and_then(|t| match t.state {
            TrialState::Presenting | TrialState::AwaitingResponse | TrialState::Feedback => {
                Some((t.stimulus, t.stop_signal_shown))
            }
            _ => None,
        })
    }

    pub fn feedback(&self) -> Feedback {
        self.current.as_ref().map_or(Feedback::None, |t| match t.state {
            TrialState::Feedback | TrialState::InterTrialInterval => t.feedback,
            _ => Feedback::None,
        })
    }

    pub fn attention_prompt_active(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|t| t.state == TrialState::AttentionPrompt)
    }

    pub fn trial_progress(&self) -> Option<(usize, usize)> {
        match self.phase {
            SessionPhase::Simple | SessionPhase::Complex => {
                Some((self.trial_index.min(self.plan.len()), self.plan.len()))
            }
            _ => None,
        }
    }

    pub fn key_reminder(&self) -> Option<&'static str> {
        matches!(self.phase, SessionPhase::Simple | SessionPhase::Complex)
            .then_some(instructions::KEY_REMINDER)
    }

    pub fn block_plan(&self) -> &[bool] {
        &self.plan
    }

    pub fn current_trial(&self) -> Option<&Trial> {
        self.current.as_ref()
    }

    pub fn current_ssd_ms(&self) -> u64 {
        self.staircase.current_ms()
    }

    pub fn results(&self) -> &[TrialResult] {
        self.sink.results()
    }

    pub fn practice_summary(&self) -> &PracticeSummary {
        &self.practice
    }

    /// Bundle everything recorded so far for persistence.
    pub fn snapshot_record(&self) -> ParticipantRecord {
        self.sink.bundle(&self.participant_id, &self.demographic)
    }
}
