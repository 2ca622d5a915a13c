//! Stateful session orchestrator.
//!
//! Lifecycle: `NotStarted -> Active -> Finished`, never backwards. The engine
//! finishes itself when the last task is answered; [`SessionEngine::finish`]
//! then hands out the [`SessionResult`] exactly once.
//!
//! ## Adaptive difficulty
//!
//! Each skill keeps a [`StreakState`]. A correct answer within the current
//! level's speed threshold and without hints extends the fast streak; any
//! other correct answer resets it. A wrong answer resets the fast streak and
//! extends the wrong streak. Three fast answers raise the level, two wrong
//! answers lower it, and either transition clears both counters. Skills never
//! influence each other.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::practice_engine::{
    error::{EngineError, Result},
    generator::{build_session_seed, build_skill_sequence, generate_task_for_skill, TaskRequest},
    i18n::{Catalog, Locale, Translator},
    models::*,
    registry::skill_definition,
    rng::SeededRng,
};

/// Fast correct answers in a row that raise a skill's difficulty.
pub const FAST_STREAK_TO_LEVEL_UP: u32 = 3;
/// Wrong answers in a row that lower a skill's difficulty.
pub const WRONG_STREAK_TO_LEVEL_DOWN: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub fast_correct: u32,
    pub wrong: u32,
}

impl StreakState {
    /// Apply one graded attempt and return the skill's new difficulty.
    pub fn record(
        &mut self,
        current: Difficulty,
        speed_threshold_ms: u64,
        is_correct: bool,
        response_ms: u64,
        hint_level_used: HintLevel,
    ) -> Difficulty {
        if is_correct {
            self.wrong = 0;
            let fast = response_ms <= speed_threshold_ms && hint_level_used == HintLevel::None;
            self.fast_correct = if fast { self.fast_correct + 1 } else { 0 };
        } else {
            self.fast_correct = 0;
            self.wrong += 1;
        }

        if self.fast_correct >= FAST_STREAK_TO_LEVEL_UP {
            *self = StreakState::default();
            return current.harder();
        }
        if self.wrong >= WRONG_STREAK_TO_LEVEL_DOWN {
            *self = StreakState::default();
            return current.easier();
        }
        current
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EnginePhase {
    NotStarted,
    Active,
    Finished,
}

/// One practice session. Single writer, driven in order:
/// `start`, then `submit_answer`/`use_hint` until done, then `finish`.
pub struct SessionEngine {
    phase: EnginePhase,
    result_produced: bool,
    translator: Box<dyn Translator>,
    rng: SeededRng,
    session_id: String,
    started_at: Option<DateTime<Utc>>,
    locale: Locale,
    length: usize,
    sequence: Vec<Skill>,
    index: usize,
    current_task: Option<Task>,
    hint_level: HintLevel,
    attempts: Vec<AttemptRecord>,
    difficulty: PerSkill<Difficulty>,
    streaks: PerSkill<StreakState>,
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEngine {
    /// Every skill starts at the default difficulty (2).
    pub fn new() -> Self {
        Self::with_initial_difficulty(PerSkill::default())
    }

    pub fn with_initial_difficulty(difficulty: PerSkill<Difficulty>) -> Self {
        SessionEngine {
            phase: EnginePhase::NotStarted,
            result_produced: false,
            translator: Box::new(Catalog),
            rng: SeededRng::from_seed_str(""),
            session_id: String::new(),
            started_at: None,
            locale: Locale::default(),
            length: 0,
            sequence: Vec::new(),
            index: 0,
            current_task: None,
            hint_level: HintLevel::None,
            attempts: Vec::new(),
            difficulty,
            streaks: PerSkill::default(),
        }
    }

    /// Carry difficulty over from a stored snapshot.
    pub fn from_progress(progress: &PersistedProgress) -> Self {
        Self::with_initial_difficulty(progress.difficulty_by_skill())
    }

    /// Replace the built-in message catalog.
    pub fn with_translator(mut self, translator: impl Translator + 'static) -> Self {
        self.translator = Box::new(translator);
        self
    }

    /// Seed the stream, build the skill sequence and generate task 0.
    pub fn start(&mut self, request: SessionRequest) -> Result<()> {
        if self.phase != EnginePhase::NotStarted {
            return Err(EngineError::AlreadyStarted);
        }

        let length = request.length.max(1);
        self.session_id = request.seed.unwrap_or_else(build_session_seed);
        self.rng = SeededRng::from_seed_str(&self.session_id);
        self.started_at = Some(Utc::now());
        self.locale = request.locale;
        self.length = length;
        self.sequence = build_skill_sequence(&mut self.rng, length, request.mode);
        self.index = 0;
        self.hint_level = HintLevel::None;
        self.attempts.clear();
        self.phase = EnginePhase::Active;
        self.current_task = Some(self.generate_current(None));

        info!(
            session_id = %self.session_id,
            length,
            mode = %request.mode,
            locale = %self.locale,
            "session started"
        );
        Ok(())
    }

    fn generate_current(&mut self, previous: Option<&Task>) -> Task {
        let skill = self.sequence[self.index];
        let request = TaskRequest {
            skill,
            difficulty: self.difficulty[skill],
            locale: self.locale,
            index: self.index,
            previous,
        };
        let task = generate_task_for_skill(&mut self.rng, self.translator.as_ref(), &request);
        debug!(task_id = %task.id, %skill, difficulty = %request.difficulty, "task generated");
        task
    }

    fn active_task(&self) -> Result<&Task> {
        match self.phase {
            EnginePhase::NotStarted => Err(EngineError::NotStarted),
            _ => self.current_task.as_ref().ok_or(EngineError::NoActiveTask),
        }
    }

    pub fn current_task(&self) -> Result<&Task> {
        self.active_task()
    }

    /// Reveal the next hint. Levels cap at 2; further calls repeat hint 2.
    pub fn use_hint(&mut self) -> Result<HintReveal> {
        let level = self.hint_level.next();
        let message = match level {
            HintLevel::Second => self.active_task()?.hints[1].clone(),
            _                 => self.active_task()?.hints[0].clone(),
        };
        if level != self.hint_level {
            debug!(hint_level = u8::from(level), "hint revealed");
        }
        self.hint_level = level;
        Ok(HintReveal { hint_level: level, message })
    }

    /// Grade, log the attempt, adapt difficulty, then advance or finish.
    pub fn submit_answer(&mut self, submission: Submission) -> Result<SubmitOutcome> {
        let (task_id, skill, is_correct) = {
            let task = self.active_task()?;
            (task.id.clone(), task.skill, task.answer.accepts(&submission.value))
        };

        let attempt = AttemptRecord {
            task_id,
            skill,
            is_correct,
            value: submission.value,
            response_ms: clamp_latency(submission.response_ms),
            hint_level_used: self.hint_level,
        };
        self.update_difficulty(&attempt);
        self.attempts.push(attempt);

        let next_task_ready = self.index + 1 < self.length;
        if next_task_ready {
            let previous = self.current_task.take();
            self.index += 1;
            self.current_task = Some(self.generate_current(previous.as_ref()));
            self.hint_level = HintLevel::None;
        } else {
            self.current_task = None;
            self.phase = EnginePhase::Finished;
            debug!(session_id = %self.session_id, "last task answered");
        }

        Ok(SubmitOutcome { is_correct, next_task_ready })
    }

    fn update_difficulty(&mut self, attempt: &AttemptRecord) {
        let skill = attempt.skill;
        let current = self.difficulty[skill];
        let threshold = skill_definition(skill).difficulty_config(current).speed_threshold_ms;
        let next = self.streaks[skill].record(
            current,
            threshold,
            attempt.is_correct,
            attempt.response_ms,
            attempt.hint_level_used,
        );
        if next != current {
            debug!(%skill, from = %current, to = %next, "difficulty adjusted");
        }
        self.difficulty[skill] = next;
    }

    /// Aggregate the attempt log. Valid once every task has been answered,
    /// and only once.
    pub fn finish(&mut self) -> Result<SessionResult> {
        match self.phase {
            EnginePhase::NotStarted => return Err(EngineError::NotStarted),
            EnginePhase::Active => {
                return Err(EngineError::SessionIncomplete {
                    completed: self.attempts.len(),
                    total: self.length,
                })
            }
            EnginePhase::Finished if self.result_produced => return Err(EngineError::AlreadyFinished),
            EnginePhase::Finished => {}
        }

        let finished_at = Utc::now();
        let mut by_skill = PerSkill::<SkillTally>::default();
        let mut correct = 0u32;
        let mut hint_uses = 0u32;
        let mut total_response_ms = 0u64;

        for attempt in &self.attempts {
            by_skill[attempt.skill].total += 1;
            if attempt.is_correct {
                correct += 1;
                by_skill[attempt.skill].correct += 1;
            }
            hint_uses += u32::from(u8::from(attempt.hint_level_used));
            total_response_ms = total_response_ms.saturating_add(attempt.response_ms);
        }

        let total_tasks = self.attempts.len() as u32;
        let avg_response_ms = if total_tasks > 0 {
            (total_response_ms as f64 / total_tasks as f64).round() as u64
        } else {
            0
        };

        self.result_produced = true;
        info!(session_id = %self.session_id, correct, total_tasks, hint_uses, avg_response_ms, "session finished");

        Ok(SessionResult {
            session_id: self.session_id.clone(),
            started_at: self.started_at.unwrap_or(finished_at),
            finished_at,
            total_tasks,
            correct,
            hint_uses,
            avg_response_ms,
            by_skill,
            next_difficulty_by_skill: self.difficulty,
        })
    }

    pub fn progress(&self) -> Progress {
        Progress {
            current: (self.index + 1).min(self.length),
            completed: self.attempts.len(),
            total: self.length,
        }
    }

    pub fn current_hint_level(&self) -> HintLevel {
        self.hint_level
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn skill_sequence(&self) -> &[Skill] {
        &self.sequence
    }

    pub fn attempts(&self) -> &[AttemptRecord] {
        &self.attempts
    }

    pub fn difficulty_by_skill(&self) -> PerSkill<Difficulty> {
        self.difficulty
    }

    pub fn streak(&self, skill: Skill) -> StreakState {
        self.streaks[skill]
    }
}

/// Negative and NaN latencies become 0; the rest round to whole millis.
fn clamp_latency(response_ms: f64) -> u64 {
    if response_ms.is_nan() {
        return 0;
    }
    response_ms.max(0.0).round() as u64
}
