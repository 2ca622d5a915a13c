use crate::practice_engine::{
    helpers::{build_number_choices, hints, single_choice_task, DEFAULT_CHOICE_COUNT},
    models::{Skill, Stimulus, Task},
    registry::GeneratorInput,
    rng::random_int,
};

const SPEED_BONUS_MS: u32 = 3000;

pub fn generate(mut input: GeneratorInput<'_>) -> Task {
    let base = input.config.base;
    let range = input.config.range;
    let start = random_int(&mut *input.rng, range.min, range.max.min(base - 1));
    let correct = base - start;
    let options = build_number_choices(&mut *input.rng, correct, 1, base - 1, DEFAULT_CHOICE_COUNT);

    let stimulus = Stimulus::MissingToTen {
        start,
        target: base,
        equation: format!("{start} + ? = {base}"),
    };
    let hints = hints(&input, Skill::MakeTen, &[("start", start.to_string())]);

    single_choice_task(
        format!("maketen-{}-{}", input.index, start),
        &input, Skill::MakeTen, stimulus, options, correct, hints, SPEED_BONUS_MS,
    )
}
