//! # arith_drill_gen
//!
//! A fully offline, deterministic practice-session engine for early
//! arithmetic drills.
//!
//! Three skills are practiced: counting a flashed ten-frame, completing ten,
//! and subtracting across ten. Each skill has its own difficulty level
//! (1–5) which adapts during a session from streaks of fast correct or wrong
//! answers.
//!
//! ## How it works
//!
//! 1. Create a [`SessionEngine`], optionally with difficulty carried over
//!    from [`PersistedProgress`].
//! 2. Call [`SessionEngine::start`] with a [`SessionRequest`]. The engine
//!    seeds its stream from the request's seed string, builds the skill
//!    sequence and generates the first task.
//! 3. Show [`SessionEngine::current_task`], reveal hints with
//!    [`SessionEngine::use_hint`], and grade with
//!    [`SessionEngine::submit_answer`] until no next task is ready.
//! 4. Call [`SessionEngine::finish`] for the [`SessionResult`] and hand it to
//!    a [`ProgressStore`].
//!
//! ## Key features
//!
//! - **Deterministic**: the same seed, length, mode and starting difficulty
//!   replay the exact same tasks.
//! - **Localized**: prompts and hints come from a [`Translator`]; the built-in
//!   [`Catalog`] ships German and English.
//! - **Tolerant persistence**: stored progress that is malformed or from
//!   another version is treated as no progress.
//!
//! ## Quick start
//!
//! ```rust
//! use arith_drill_gen::{SessionEngine, SessionRequest, Submission};
//!
//! let mut engine = SessionEngine::new();
//! engine.start(SessionRequest::new(5).with_seed("doc-1")).unwrap();
//!
//! loop {
//!     let answer = engine.current_task().unwrap().answer.correct.clone();
//!     let outcome = engine.submit_answer(Submission { value: answer, response_ms: 1200.0 }).unwrap();
//!     if !outcome.next_task_ready {
//!         break;
//!     }
//! }
//!
//! let result = engine.finish().unwrap();
//! assert_eq!(result.correct, 5);
//! ```

pub mod practice_engine;

// Convenience re-exports so callers can use `arith_drill_gen::SessionEngine`
// directly without reaching into `practice_engine::`.
pub use practice_engine::{
    build_skill_sequence, generate_task_for_skill, list_skills, skill_definition,
    AnswerValue, AttemptRecord, Catalog, ConfigError, Difficulty, DrillConfig, EngineError,
    EnginePhase, HintLevel, HintReveal, Interaction, JsonFileStore, Locale, MemoryStore,
    ParseError, PerSkill, PersistedProgress, Progress, ProgressStore, SeededRng, SessionEngine,
    SessionMode, SessionRequest, SessionResult, Skill, SkillSnapshot, SkillTally, Stimulus,
    StoreError, StreakState, Submission, SubmitOutcome, Task, TaskKind, TaskRequest, Translator,
};

#[cfg(test)]
mod tests;
