use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::practice_engine::{error::ParseError, i18n::Locale};

// ---------------------------------------------------------------------------
// Skills and difficulty
// ---------------------------------------------------------------------------

/// The practiced arithmetic abilities. Each is tracked independently for
/// difficulty and proficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Skill {
    /// Subitizing: how many dots were flashed on a ten-frame.
    Quantity,
    /// Complement to ten: `7 + ? = 10`.
    MakeTen,
    /// Subtraction that crosses ten: `13 - 5 = ?`.
    BridgeSubtract,
}

impl Skill {
    /// All skills in canonical registry order.
    pub const ALL: [Skill; 3] = [Skill::Quantity, Skill::MakeTen, Skill::BridgeSubtract];

    /// Stable identifier used in storage and message keys.
    pub fn id(self) -> &'static str {
        match self {
            Skill::Quantity       => "quantity",
            Skill::MakeTen        => "makeTen",
            Skill::BridgeSubtract => "bridgeSubtract",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Skill {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Skill::ALL
            .into_iter()
            .find(|skill| skill.id() == s.trim())
            .ok_or_else(|| ParseError::UnknownSkill(s.to_string()))
    }
}

/// Difficulty level in `1..=5`. Every constructor clamps, so a value outside
/// the range cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: Difficulty = Difficulty(1);
    pub const MAX: Difficulty = Difficulty(5);

    /// Level `level`, clamped into `1..=5`.
    pub const fn new(level: u8) -> Self {
        if level < Self::MIN.0 {
            Self::MIN
        } else if level > Self::MAX.0 {
            Self::MAX
        } else {
            Difficulty(level)
        }
    }

    /// Clamp an arbitrary integer into `1..=5`.
    pub fn clamped(value: i64) -> Self {
        Difficulty(value.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// One level harder, saturating at 5.
    pub fn harder(self) -> Self {
        Self::clamped(self.0 as i64 + 1)
    }

    /// One level easier, saturating at 1.
    pub fn easier(self) -> Self {
        Self::clamped(self.0 as i64 - 1)
    }

    pub fn all() -> [Difficulty; 5] {
        [1, 2, 3, 4, 5].map(Difficulty)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty(2)
    }
}

impl From<u8> for Difficulty {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(value: Difficulty) -> Self {
        value.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One value per skill. Field access is exhaustive, so adding a skill forces
/// every per-skill map in the crate to be updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerSkill<T> {
    pub quantity: T,
    pub make_ten: T,
    pub bridge_subtract: T,
}

impl<T> PerSkill<T> {
    pub fn from_fn(mut f: impl FnMut(Skill) -> T) -> Self {
        PerSkill {
            quantity: f(Skill::Quantity),
            make_ten: f(Skill::MakeTen),
            bridge_subtract: f(Skill::BridgeSubtract),
        }
    }

    /// Iterate `(skill, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Skill, &T)> + '_ {
        Skill::ALL.into_iter().map(move |skill| (skill, &self[skill]))
    }
}

impl<T> Index<Skill> for PerSkill<T> {
    type Output = T;

    fn index(&self, skill: Skill) -> &T {
        match skill {
            Skill::Quantity       => &self.quantity,
            Skill::MakeTen        => &self.make_ten,
            Skill::BridgeSubtract => &self.bridge_subtract,
        }
    }
}

impl<T> IndexMut<Skill> for PerSkill<T> {
    fn index_mut(&mut self, skill: Skill) -> &mut T {
        match skill {
            Skill::Quantity       => &mut self.quantity,
            Skill::MakeTen        => &mut self.make_ten,
            Skill::BridgeSubtract => &mut self.bridge_subtract,
        }
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskKind {
    TenFrameFlashCount,
    MissingToTen,
    BackToTenSubtract,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskKind::TenFrameFlashCount => "tenFrameFlashCount",
            TaskKind::MissingToTen       => "missingToTen",
            TaskKind::BackToTenSubtract  => "backToTenSubtract",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FrameLayout {
    TenFrame,
}

/// Kind-specific stimulus. The `type` tag doubles as the task kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Stimulus {
    #[serde(rename_all = "camelCase")]
    TenFrameFlashCount {
        count: i32,
        flash_ms: u32,
        layout: FrameLayout,
    },
    #[serde(rename_all = "camelCase")]
    MissingToTen {
        start: i32,
        target: i32,
        equation: String,
    },
    #[serde(rename_all = "camelCase")]
    BackToTenSubtract {
        start: i32,
        subtract: i32,
        bridge_step: i32,
        equation: String,
    },
}

impl Stimulus {
    pub fn kind(&self) -> TaskKind {
        match self {
            Stimulus::TenFrameFlashCount { .. } => TaskKind::TenFrameFlashCount,
            Stimulus::MissingToTen { .. }       => TaskKind::MissingToTen,
            Stimulus::BackToTenSubtract { .. }  => TaskKind::BackToTenSubtract,
        }
    }
}

/// How the learner answers: pick from fixed choices, or type a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum Interaction {
    SingleChoice {
        options: Vec<i32>,
    },
    TapInput {
        min: i32,
        max: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<Vec<i32>>,
    },
}

/// A submitted or expected answer; numbers and strings compare by their
/// normalized text form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(i64),
    Text(String),
}

impl AnswerValue {
    /// Numbers become their decimal string, strings are trimmed.
    pub fn normalized(&self) -> String {
        match self {
            AnswerValue::Number(n) => n.to_string(),
            AnswerValue::Text(s)   => s.trim().to_string(),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Number(n) => write!(f, "{}", n),
            AnswerValue::Text(s)   => write!(f, "{}", s),
        }
    }
}

impl From<i32> for AnswerValue {
    fn from(value: i32) -> Self {
        AnswerValue::Number(value as i64)
    }
}

impl From<i64> for AnswerValue {
    fn from(value: i64) -> Self {
        AnswerValue::Number(value)
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAnswer {
    pub correct: AnswerValue,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<AnswerValue>,
}

impl TaskAnswer {
    pub fn single(correct: impl Into<AnswerValue>) -> Self {
        TaskAnswer { correct: correct.into(), alternatives: Vec::new() }
    }

    /// True if `value` normalizes to the canonical answer or any alternative.
    pub fn accepts(&self, value: &AnswerValue) -> bool {
        let submitted = value.normalized();
        std::iter::once(&self.correct)
            .chain(self.alternatives.iter())
            .any(|candidate| candidate.normalized() == submitted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scoring {
    pub max_points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_bonus_ms: Option<u32>,
}

/// A fully specified practice task. Never mutated after generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Encodes kind, sequence index and key stimulus values, e.g.
    /// `"bridgesub-3-13-5"`. Traceable, not globally unique.
    pub id: String,
    pub skill: Skill,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub stimulus: Stimulus,
    pub interaction: Interaction,
    pub answer: TaskAnswer,
    /// Strategy hint first, value-specific worked hint second.
    pub hints: [String; 2],
    pub scoring: Scoring,
}

impl Task {
    pub fn kind(&self) -> TaskKind {
        self.stimulus.kind()
    }

    /// Compact identity of kind + defining stimulus values, used to detect
    /// immediate repetition.
    pub fn signature(&self) -> String {
        match &self.stimulus {
            Stimulus::TenFrameFlashCount { count, .. } =>
                format!("{}:{}", self.kind(), count),
            Stimulus::MissingToTen { start, .. } =>
                format!("{}:{}", self.kind(), start),
            Stimulus::BackToTenSubtract { start, subtract, .. } =>
                format!("{}:{}-{}", self.kind(), start, subtract),
        }
    }
}

// ---------------------------------------------------------------------------
// Attempts and results
// ---------------------------------------------------------------------------

/// How many hints had been revealed for the current task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HintLevel {
    #[default]
    None,
    First,
    Second,
}

impl HintLevel {
    /// Next level, capped at `Second`.
    pub fn next(self) -> Self {
        match self {
            HintLevel::None => HintLevel::First,
            HintLevel::First | HintLevel::Second => HintLevel::Second,
        }
    }
}

impl From<HintLevel> for u8 {
    fn from(level: HintLevel) -> Self {
        match level {
            HintLevel::None   => 0,
            HintLevel::First  => 1,
            HintLevel::Second => 2,
        }
    }
}

impl TryFrom<u8> for HintLevel {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(HintLevel::None),
            1 => Ok(HintLevel::First),
            2 => Ok(HintLevel::Second),
            other => Err(ParseError::HintLevel(other)),
        }
    }
}

/// One answered task. Append-only for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub task_id: String,
    pub skill: Skill,
    pub is_correct: bool,
    pub value: AnswerValue,
    pub response_ms: u64,
    pub hint_level_used: HintLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillTally {
    pub correct: u32,
    pub total: u32,
}

/// Aggregate produced once when a session finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_tasks: u32,
    pub correct: u32,
    pub hint_uses: u32,
    pub avg_response_ms: u64,
    pub by_skill: PerSkill<SkillTally>,
    pub next_difficulty_by_skill: PerSkill<Difficulty>,
}

// ---------------------------------------------------------------------------
// Persisted progress
// ---------------------------------------------------------------------------

pub const PROGRESS_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSnapshot {
    pub attempts: u32,
    pub correct: u32,
    pub hint_uses: u32,
    pub avg_response_ms: u64,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedProgress {
    pub version: u32,
    pub last_focus_skill: Option<Skill>,
    /// Most recent first.
    pub session_history: Vec<SessionResult>,
    pub skill_snapshot: PerSkill<SkillSnapshot>,
}

impl PersistedProgress {
    pub fn empty() -> Self {
        PersistedProgress {
            version: PROGRESS_VERSION,
            last_focus_skill: None,
            session_history: Vec::new(),
            skill_snapshot: PerSkill::default(),
        }
    }

    /// Difficulty per skill to carry into the next session.
    pub fn difficulty_by_skill(&self) -> PerSkill<Difficulty> {
        PerSkill::from_fn(|skill| self.skill_snapshot[skill].difficulty)
    }
}

impl Default for PersistedProgress {
    fn default() -> Self {
        Self::empty()
    }
}

// ---------------------------------------------------------------------------
// Session request / engine responses
// ---------------------------------------------------------------------------

/// Which skills a session draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SessionMode {
    /// Every skill once, padded uniformly.
    #[default]
    Mixed,
    /// Every skill once, padded with the focus skill weighted 3×.
    Focus(Skill),
    /// One skill for the whole session.
    Only(Skill),
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::Mixed        => write!(f, "mixed"),
            SessionMode::Focus(skill) => write!(f, "focus:{}", skill),
            SessionMode::Only(skill)  => write!(f, "{}", skill),
        }
    }
}

impl FromStr for SessionMode {
    type Err = ParseError;

    /// Accepts `"mixed"`, `"focus:<skill>"` or a bare `"<skill>"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "mixed" {
            return Ok(SessionMode::Mixed);
        }
        match s.strip_prefix("focus:") {
            Some(skill) => Ok(SessionMode::Focus(skill.parse()?)),
            None        => Ok(SessionMode::Only(s.parse()?)),
        }
    }
}

impl TryFrom<String> for SessionMode {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SessionMode> for String {
    fn from(mode: SessionMode) -> Self {
        mode.to_string()
    }
}

/// Parameters for [`SessionEngine::start`](crate::SessionEngine::start).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub length: usize,
    pub mode: SessionMode,
    /// `None` derives a fresh seed from the clock plus entropy.
    pub seed: Option<String>,
    pub locale: Locale,
}

impl SessionRequest {
    /// Mixed mode, fresh seed, default locale.
    pub fn new(length: usize) -> Self {
        SessionRequest {
            length,
            mode: SessionMode::Mixed,
            seed: None,
            locale: Locale::default(),
        }
    }

    pub fn with_mode(mut self, mode: SessionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub value: AnswerValue,
    /// Raw latency; clamped to `>= 0` and rounded when recorded.
    pub response_ms: f64,
}

impl Submission {
    pub fn new(value: impl Into<AnswerValue>, response_ms: f64) -> Self {
        Submission { value: value.into(), response_ms }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub is_correct: bool,
    pub next_task_ready: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HintReveal {
    pub hint_level: HintLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// 1-based position of the current task, capped at `total`.
    pub current: usize,
    pub completed: usize,
    pub total: usize,
}
