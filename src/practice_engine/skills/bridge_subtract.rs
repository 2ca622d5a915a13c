use crate::practice_engine::{
    helpers::{build_number_choices, hints, pick_bridge_subtract_pair, single_choice_task, DEFAULT_CHOICE_COUNT},
    models::{Skill, Stimulus, Task},
    registry::GeneratorInput,
};

const SPEED_BONUS_MS: u32 = 3500;

pub fn generate(mut input: GeneratorInput<'_>) -> Task {
    let base = input.config.base;
    let (start, subtract) = pick_bridge_subtract_pair(&mut *input.rng, &input.config);
    let bridge_step = start - base;
    let correct = start - subtract;
    let options = build_number_choices(&mut *input.rng, correct, 1, 2 * base - 1, DEFAULT_CHOICE_COUNT);

    let stimulus = Stimulus::BackToTenSubtract {
        start,
        subtract,
        bridge_step,
        equation: format!("{start} - {subtract} = ?"),
    };
    let hints = hints(&input, Skill::BridgeSubtract, &[
        ("start", start.to_string()),
        ("bridgeStep", bridge_step.to_string()),
        ("leftover", (subtract - bridge_step).to_string()),
    ]);

    single_choice_task(
        format!("bridgesub-{}-{}-{}", input.index, start, subtract),
        &input, Skill::BridgeSubtract, stimulus, options, correct, hints, SPEED_BONUS_MS,
    )
}
