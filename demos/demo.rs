//! One practice session played end to end.
//!
//! Run with: `cargo run --example demo`
//!
//! Settings come from the TOML file named by `DRILL_CONFIG_PATH` (defaults
//! otherwise). Without a configured seed the demo uses `"demo"`, so the output
//! is reproducible. Log verbosity follows `LOG_LEVEL`, e.g.
//! `LOG_LEVEL=arith_drill_gen=debug`.
//!
//! ## Key concepts demonstrated
//!
//! - `SessionEngine::from_progress` carries difficulty over from a previous run.
//! - The first hint is revealed on every third task, which breaks the fast
//!   streak for that skill.
//! - Every fourth task is answered wrong on purpose so both adaptation
//!   directions show up in the log.
//! - With `[progress] path = "..."` set, the result is appended to that JSON
//!   file and the next run starts from the stored difficulty.

use arith_drill_gen::{
    skill_definition, AnswerValue, Catalog, DrillConfig, Interaction, JsonFileStore, MemoryStore,
    ProgressStore, SessionEngine, SessionResult, Stimulus, Submission, Task, Translator,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn describe_stimulus(stimulus: &Stimulus) -> String {
    match stimulus {
        Stimulus::TenFrameFlashCount { count, flash_ms, .. } => {
            format!("ten-frame with {count} dots, flashed for {flash_ms} ms")
        }
        Stimulus::MissingToTen { equation, .. } => equation.clone(),
        Stimulus::BackToTenSubtract { equation, bridge_step, .. } => {
            format!("{equation}   (bridge step {bridge_step})")
        }
    }
}

fn print_task(position: usize, total: usize, task: &Task) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  [{position}/{total}]  {}  level {}  ID: {}", task.skill, task.difficulty, task.id);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    if let Some(prompt) = &task.prompt {
        println!("  Q: {prompt}");
    }
    println!("     {}", describe_stimulus(&task.stimulus));
    match &task.interaction {
        Interaction::SingleChoice { options } => println!("     options: {options:?}"),
        Interaction::TapInput { min, max, .. } => println!("     type a number in {min}..={max}"),
    }
}

fn wrong_answer(task: &Task) -> AnswerValue {
    let correct = task.answer.correct.clone();
    if let Interaction::SingleChoice { options } = &task.interaction {
        if let Some(other) = options.iter().find(|&&o| !task.answer.accepts(&AnswerValue::from(o))) {
            return AnswerValue::from(*other);
        }
    }
    AnswerValue::Text(format!("{correct}?"))
}

fn print_result(engine: &SessionEngine, result: &SessionResult) {
    println!();
    println!("══ Session {} ══", result.session_id);
    println!(
        "  {}/{} correct, {} hints, avg {} ms",
        result.correct, result.total_tasks, result.hint_uses, result.avg_response_ms
    );
    for (skill, tally) in result.by_skill.iter() {
        let label = Catalog.translate(engine.locale(), skill_definition(skill).label_key, &[]);
        println!(
            "  {:<28} {}/{}  next level {}",
            label, tally.correct, tally.total, result.next_difficulty_by_skill[skill]
        );
    }
}

fn run(store: &mut dyn ProgressStore, config: &DrillConfig) {
    let progress = store.load_progress();
    if let Some(last) = progress.session_history.first() {
        println!("  Previous session: {} ({}/{} correct)", last.session_id, last.correct, last.total_tasks);
    }

    let mut request = config.session_request();
    if request.seed.is_none() {
        request = request.with_seed("demo");
    }

    let mut engine = SessionEngine::from_progress(&progress);
    engine.start(request).expect("fresh engine starts");

    loop {
        let task = engine.current_task().expect("active session has a task").clone();
        let at = engine.progress();
        print_task(at.current, at.total, &task);

        if at.current % 3 == 0 {
            let hint = engine.use_hint().expect("hint on active task");
            println!("  hint: {}", hint.message);
        }

        let (value, response_ms) = if at.current % 4 == 0 {
            (wrong_answer(&task), 4200.0)
        } else {
            (task.answer.correct.clone(), 900.0 + 150.0 * at.current as f64)
        };
        println!("  answer: {value}");

        let outcome = engine
            .submit_answer(Submission::new(value, response_ms))
            .expect("answer on active task");
        println!("  {}", if outcome.is_correct { "✓ correct" } else { "✗ wrong" });
        if !outcome.next_task_ready {
            break;
        }
    }

    let result = engine.finish().expect("all tasks answered");
    print_result(&engine, &result);

    match store.append_session_result(&result) {
        Ok(saved) => println!("  Stored history: {} session(s)", saved.session_history.len()),
        Err(e) => eprintln!("  Could not store progress: {e}"),
    }
}

fn main() {
    init_tracing();
    let config = DrillConfig::from_env();

    println!();
    println!("══ Practice session: {} tasks, mode {}, locale {} ══",
        config.session.length, config.session.mode, config.session.locale.code());
    println!();

    match &config.progress.path {
        Some(path) => run(&mut JsonFileStore::new(path), &config),
        None => run(&mut MemoryStore::new(), &config),
    }
}
