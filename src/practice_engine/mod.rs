//! Core practice engine: task generation, grading and adaptive difficulty.
//!
//! ## Module overview
//!
//! | Module        | Purpose |
//! |---------------|---------|
//! | `models`      | Shared types: skills, difficulty, tasks, attempts, results, stored progress |
//! | `rng`         | String-seeded mulberry32 stream and sampling helpers |
//! | `registry`    | Per-skill difficulty tables and generator dispatch |
//! | `helpers`     | Builders shared by the skill generators |
//! | `skills`      | One generator per skill |
//! | `generator`   | Duplicate-avoiding task generation and skill sequences |
//! | `engine`      | `SessionEngine` state machine and the streak rule |
//! | `i18n`        | Locales, message catalog, `{name}` interpolation |
//! | `persistence` | Versioned progress record and stores |
//! | `config`      | TOML configuration |
//! | `error`       | Error types |

pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod i18n;
pub mod models;
pub mod persistence;
pub mod registry;
pub mod rng;
pub mod skills;

// Re-export the public API surface so callers can use
// `practice_engine::SessionEngine` without reaching into sub-modules.
pub use config::DrillConfig;
pub use engine::{EnginePhase, SessionEngine, StreakState};
pub use error::{ConfigError, EngineError, ParseError, StoreError};
pub use generator::{build_skill_sequence, generate_task_for_skill, TaskRequest};
pub use i18n::{Catalog, Locale, Translator};
pub use models::{
    AnswerValue, AttemptRecord, Difficulty, HintLevel, HintReveal, Interaction,
    PerSkill, PersistedProgress, Progress, SessionMode, SessionRequest, SessionResult,
    Skill, SkillSnapshot, SkillTally, Stimulus, Submission, SubmitOutcome, Task, TaskKind,
};
pub use persistence::{JsonFileStore, MemoryStore, ProgressStore};
pub use registry::{list_skills, skill_definition};
pub use rng::SeededRng;
