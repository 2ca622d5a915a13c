//! Static per-skill configuration and generator dispatch.
//!
//! Each [`Skill`] maps to one [`SkillDefinition`] holding a difficulty table
//! and a generator function pointer. The mapping is an exhaustive `match`, so
//! a new skill does not compile until it is registered here.
//!
//! Tables are monotonic in intent: a higher level has a tighter speed
//! threshold and a harder value range.

use rand::RngCore;
use serde::Serialize;

use crate::practice_engine::{
    i18n::{Locale, Translator},
    models::{Difficulty, Skill, Task},
    skills,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValueRange {
    pub min: i32,
    pub max: i32,
}

const fn range(min: i32, max: i32) -> ValueRange {
    ValueRange { min, max }
}

/// Constraint a generated value pair must satisfy relative to `base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CrossingRule {
    None,
    /// The task asks for the distance up to `base`.
    ReachBase,
    /// `start > base` and `start - subtract < base`.
    CrossBaseRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyConfig {
    pub speed_threshold_ms: u64,
    pub base: i32,
    pub crossing_rule: CrossingRule,
    pub range: ValueRange,
    pub secondary_range: Option<ValueRange>,
}

/// Everything a generator needs to build one task.
pub struct GeneratorInput<'a> {
    pub difficulty: Difficulty,
    pub config: DifficultyConfig,
    pub locale: Locale,
    pub rng: &'a mut dyn RngCore,
    /// Position of the task in the session sequence.
    pub index: usize,
    pub translator: &'a dyn Translator,
}

pub type TaskGenerator = fn(GeneratorInput<'_>) -> Task;

pub struct SkillDefinition {
    pub skill: Skill,
    /// Message key for the skill's display name.
    pub label_key: &'static str,
    /// Indexed by difficulty level minus one.
    difficulty_configs: [DifficultyConfig; 5],
    pub generate: TaskGenerator,
}

impl SkillDefinition {
    pub fn difficulty_config(&self, difficulty: Difficulty) -> DifficultyConfig {
        self.difficulty_configs[(difficulty.get() - 1) as usize]
    }
}

const fn counting(speed_threshold_ms: u64, value_range: ValueRange) -> DifficultyConfig {
    DifficultyConfig {
        speed_threshold_ms,
        base: 10,
        crossing_rule: CrossingRule::None,
        range: value_range,
        secondary_range: None,
    }
}

const fn reaching(speed_threshold_ms: u64, value_range: ValueRange) -> DifficultyConfig {
    DifficultyConfig {
        speed_threshold_ms,
        base: 10,
        crossing_rule: CrossingRule::ReachBase,
        range: value_range,
        secondary_range: None,
    }
}

const fn crossing(speed_threshold_ms: u64, start: ValueRange, subtract: ValueRange) -> DifficultyConfig {
    DifficultyConfig {
        speed_threshold_ms,
        base: 10,
        crossing_rule: CrossingRule::CrossBaseRequired,
        range: start,
        secondary_range: Some(subtract),
    }
}

static QUANTITY: SkillDefinition = SkillDefinition {
    skill: Skill::Quantity,
    label_key: "skill.quantity",
    difficulty_configs: [
        counting(4500, range(1, 5)),
        counting(4200, range(1, 7)),
        counting(3800, range(2, 10)),
        counting(3400, range(3, 10)),
        counting(3000, range(1, 10)),
    ],
    generate: skills::quantity::generate,
};

static MAKE_TEN: SkillDefinition = SkillDefinition {
    skill: Skill::MakeTen,
    label_key: "skill.makeTen",
    difficulty_configs: [
        reaching(5000, range(6, 9)),
        reaching(4700, range(6, 9)),
        reaching(4300, range(7, 9)),
        reaching(3900, range(7, 9)),
        reaching(3600, range(8, 9)),
    ],
    generate: skills::make_ten::generate,
};

static BRIDGE_SUBTRACT: SkillDefinition = SkillDefinition {
    skill: Skill::BridgeSubtract,
    label_key: "skill.bridgeSubtract",
    difficulty_configs: [
        crossing(5500, range(11, 13), range(2, 4)),
        crossing(5100, range(11, 15), range(2, 5)),
        crossing(4700, range(12, 16), range(3, 6)),
        crossing(4300, range(13, 18), range(4, 8)),
        crossing(4000, range(14, 19), range(5, 9)),
    ],
    generate: skills::bridge_subtract::generate,
};

pub fn skill_definition(skill: Skill) -> &'static SkillDefinition {
    match skill {
        Skill::Quantity       => &QUANTITY,
        Skill::MakeTen        => &MAKE_TEN,
        Skill::BridgeSubtract => &BRIDGE_SUBTRACT,
    }
}

/// Registered skills in canonical order.
pub fn list_skills() -> Vec<Skill> {
    Skill::ALL.to_vec()
}
