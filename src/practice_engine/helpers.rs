//! Shared builder functions used by every skill generator.
//!
//! Generators differ only in how they pick stimulus values; choice building,
//! message lookup and final task assembly live here.

use rand::RngCore;
use tracing::warn;

use crate::practice_engine::{
    i18n::MessageParams,
    models::*,
    registry::{DifficultyConfig, GeneratorInput, ValueRange},
    rng::{random_int, shuffle},
};

/// Answer options offered per task unless a generator asks otherwise.
pub const DEFAULT_CHOICE_COUNT: usize = 4;

/// Draws allowed to find a pair that crosses the base.
pub const MAX_CROSSING_ATTEMPTS: usize = 30;

pub const MAX_POINTS: u32 = 100;

/// `correct` plus distinct random distractors from `min..=max`, shuffled.
///
/// The range must hold enough distinct values; if it does not, the result is
/// capped at what the range can supply instead of looping forever.
pub fn build_number_choices<R: RngCore + ?Sized>(
    rng: &mut R,
    correct: i32,
    min: i32,
    max: i32,
    size: usize,
) -> Vec<i32> {
    let available = (max - min + 1).max(0) as usize + usize::from(correct < min || correct > max);
    let target = size.min(available).max(1);

    let mut values = vec![correct];
    while values.len() < target {
        let candidate = random_int(rng, min, max);
        if !values.contains(&candidate) {
            values.push(candidate);
        }
    }
    shuffle(rng, &values)
}

/// Pick `(start, subtract)` with `start > base` and `start - subtract < base`.
///
/// Falls back to `(base + 3, 5)` when the retry budget runs out; that pair
/// always crosses.
pub fn pick_bridge_subtract_pair<R: RngCore + ?Sized>(
    rng: &mut R,
    config: &DifficultyConfig,
) -> (i32, i32) {
    let base = config.base;
    let start_range = config.range;
    let subtract_range = config
        .secondary_range
        .unwrap_or(ValueRange { min: 1, max: base - 1 });

    for _ in 0..MAX_CROSSING_ATTEMPTS {
        let start = random_int(rng, start_range.min, start_range.max);
        let subtract = random_int(rng, subtract_range.min, subtract_range.max.min(start - 1));
        if start > base && start - subtract < base {
            return (start, subtract);
        }
    }

    warn!(base, ?start_range, ?subtract_range, "no crossing pair found, using fallback");
    (base + 3, 5)
}

/// Prompt text for `skill` in the session locale.
pub fn prompt(input: &GeneratorInput<'_>, skill: Skill) -> String {
    let key = format!("task.{}.prompt", skill.id());
    input.translator.translate(input.locale, &key, &[])
}

/// Strategy hint and worked hint for `skill`. `params` feed the worked hint.
pub fn hints(input: &GeneratorInput<'_>, skill: Skill, params: &MessageParams<'_>) -> [String; 2] {
    let first = format!("task.{}.hint1", skill.id());
    let second = format!("task.{}.hint2", skill.id());
    [
        input.translator.translate(input.locale, &first, &[]),
        input.translator.translate(input.locale, &second, params),
    ]
}

/// Assemble a single-choice [`Task`] from its parts.
///
/// This is the last call in every generator.
pub fn single_choice_task(
    id: String,
    input: &GeneratorInput<'_>,
    skill: Skill,
    stimulus: Stimulus,
    options: Vec<i32>,
    correct: i32,
    hints: [String; 2],
    speed_bonus_ms: u32,
) -> Task {
    Task {
        id,
        skill,
        difficulty: input.difficulty,
        prompt: Some(prompt(input, skill)),
        stimulus,
        interaction: Interaction::SingleChoice { options },
        answer: TaskAnswer::single(correct),
        hints,
        scoring: Scoring {
            max_points: MAX_POINTS,
            speed_bonus_ms: Some(speed_bonus_ms),
        },
    }
}
