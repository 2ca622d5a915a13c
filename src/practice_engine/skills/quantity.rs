use crate::practice_engine::{
    helpers::{build_number_choices, hints, single_choice_task, DEFAULT_CHOICE_COUNT},
    models::{Difficulty, FrameLayout, Skill, Stimulus, Task},
    registry::GeneratorInput,
    rng::random_int,
};

const SPEED_BONUS_MS: u32 = 2500;

/// How long the ten-frame stays visible.
fn flash_ms(difficulty: Difficulty) -> u32 {
    match difficulty.get() {
        1 => 850,
        2 => 700,
        3 => 600,
        4 => 500,
        _ => 420,
    }
}

pub fn generate(mut input: GeneratorInput<'_>) -> Task {
    let range = input.config.range;
    let count = random_int(&mut *input.rng, range.min, range.max);
    let options = build_number_choices(&mut *input.rng, count, 1, input.config.base, DEFAULT_CHOICE_COUNT);

    let stimulus = Stimulus::TenFrameFlashCount {
        count,
        flash_ms: flash_ms(input.difficulty),
        layout: FrameLayout::TenFrame,
    };
    let hints = hints(&input, Skill::Quantity, &[]);

    single_choice_task(
        format!("quantity-{}-{}", input.index, count),
        &input, Skill::Quantity, stimulus, options, count, hints, SPEED_BONUS_MS,
    )
}
