//! One task generator per skill.
//!
//! Every generator has the same shape and is registered as a
//! [`TaskGenerator`](crate::practice_engine::registry::TaskGenerator):
//!
//! ```ignore
//! pub fn generate(input: GeneratorInput<'_>) -> Task
//! ```
//!
//! All values are drawn through `input.rng` so a session replays exactly
//! from its seed.

/// Ten-frame flash counting (`quantity-` ids).
pub mod quantity;
/// Complement to ten (`maketen-` ids).
pub mod make_ten;
/// Subtraction across ten (`bridgesub-` ids).
pub mod bridge_subtract;

#[cfg(test)]
pub(crate) fn run_generator(skill: crate::Skill, difficulty: crate::Difficulty, seed: &str, index: usize) -> crate::Task {
    use crate::practice_engine::{i18n::{Catalog, Locale}, registry::{skill_definition, GeneratorInput}, rng::SeededRng};

    let def = skill_definition(skill);
    let mut rng = SeededRng::from_seed_str(seed);
    (def.generate)(GeneratorInput {
        difficulty,
        config: def.difficulty_config(difficulty),
        locale: Locale::En,
        rng: &mut rng,
        index,
        translator: &Catalog,
    })
}
