//! Unit tests for the `arith_drill_gen` crate.
//!
//! Included from `lib.rs` under `#[cfg(test)]`.
//!
//! | Group | What is tested |
//! |-------|----------------|
//! | Determinism | Same seed → identical sessions; different seeds → varied sessions |
//! | Structural | Options hold the answer exactly once; ids match their kind; hints and prompts present |
//! | Grading | Number/string normalization; wrong values rejected |
//! | Lifecycle | Precondition errors; finish aggregates |
//! | Adaptation | Level-up / level-down scenarios; difficulty stays in 1..=5 |
//! | Persistence | Session results flow into stored progress and back into a new engine |
//! | Locale | German and English text for the same seed |

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::practice_engine::{
    models::TaskAnswer,
    persistence::apply_session_result,
};
use crate::{
    build_skill_sequence, AnswerValue, Difficulty, EngineError, HintLevel, Interaction, Locale,
    MemoryStore, PerSkill, PersistedProgress, ProgressStore, SeededRng, SessionEngine,
    SessionMode, SessionRequest, Skill, Stimulus, Submission, Task, TaskKind,
};

// ── helpers ──────────────────────────────────────────────────────────────────

/// Deterministic request with the given length and seed, mixed mode.
fn req(length: usize, seed: &str) -> SessionRequest {
    SessionRequest::new(length).with_seed(seed)
}

fn started(request: SessionRequest) -> SessionEngine {
    let mut engine = SessionEngine::new();
    engine.start(request).expect("fresh engine starts");
    engine
}

/// Answer every task correctly and collect the tasks that were shown.
fn play_all_correct(engine: &mut SessionEngine, response_ms: f64) -> Vec<Task> {
    let mut shown = Vec::new();
    loop {
        let task = engine.current_task().expect("active task").clone();
        let value = task.answer.correct.clone();
        shown.push(task);
        let outcome = engine.submit_answer(Submission { value, response_ms }).unwrap();
        assert!(outcome.is_correct);
        if !outcome.next_task_ready {
            return shown;
        }
    }
}

/// The answer as an i32; every generated task has a numeric answer.
fn correct_number(task: &Task) -> i32 {
    match task.answer.correct {
        AnswerValue::Number(n) => n as i32,
        AnswerValue::Text(ref s) => panic!("non-numeric answer {s:?} in {}", task.id),
    }
}

const SEEDS: [&str; 5] = ["1", "42", "test-1", "classroom", "ÄÖÜ-seed"];

// ── determinism ──────────────────────────────────────────────────────────────

#[test]
fn same_seed_produces_identical_sessions() {
    for seed in SEEDS {
        let a = play_all_correct(&mut started(req(12, seed)), 500.0);
        let b = play_all_correct(&mut started(req(12, seed)), 500.0);
        assert_eq!(a, b, "sessions diverged for seed {seed}");
    }
}

#[test]
fn same_seed_produces_identical_sequences_per_mode() {
    for mode in [SessionMode::Mixed, SessionMode::Focus(Skill::Quantity), SessionMode::Only(Skill::MakeTen)] {
        let a = started(req(9, "modes").with_mode(mode));
        let b = started(req(9, "modes").with_mode(mode));
        assert_eq!(a.skill_sequence(), b.skill_sequence(), "sequence mismatch for {mode}");
        assert_eq!(a.current_task().unwrap(), b.current_task().unwrap());
    }
}

#[test]
fn different_seeds_produce_varied_sessions() {
    let mut same_count = 0usize;
    let pairs = 40;
    for seed in 0..pairs {
        let a = play_all_correct(&mut started(req(6, &format!("a-{seed}"))), 500.0);
        let b = play_all_correct(&mut started(req(6, &format!("b-{seed}"))), 500.0);
        let ids = |tasks: &[Task]| tasks.iter().map(|t| t.id.clone()).collect::<Vec<_>>();
        if ids(&a) == ids(&b) {
            same_count += 1;
        }
    }
    assert!(same_count < pairs / 4, "too many identical sessions ({same_count}/{pairs})");
}

#[test]
fn entropy_seed_produces_a_valid_session() {
    // Smoke test: no seed must not panic and must yield a usable session id.
    let mut engine = started(SessionRequest::new(3));
    assert!(!engine.session_id().is_empty());
    let shown = play_all_correct(&mut engine, 800.0);
    assert_eq!(shown.len(), 3);
}

// ── structural invariants ────────────────────────────────────────────────────

#[test]
fn every_task_offers_its_answer_among_distinct_options() {
    for seed in SEEDS {
        for task in play_all_correct(&mut started(req(15, seed)), 500.0) {
            let Interaction::SingleChoice { options } = &task.interaction else {
                panic!("generated tasks are single choice: {}", task.id);
            };
            let correct = correct_number(&task);
            assert_eq!(options.len(), 4, "option count for {}", task.id);
            assert_eq!(options.iter().filter(|&&o| o == correct).count(), 1, "{}", task.id);
            let mut unique = options.clone();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(unique.len(), options.len(), "duplicate options in {}", task.id);
        }
    }
}

#[test]
fn task_ids_and_kinds_match_their_skill() {
    let expected = [
        (Skill::Quantity,       TaskKind::TenFrameFlashCount, "quantity-"),
        (Skill::MakeTen,        TaskKind::MissingToTen,       "maketen-"),
        (Skill::BridgeSubtract, TaskKind::BackToTenSubtract,  "bridgesub-"),
    ];
    for (skill, kind, prefix) in expected {
        let tasks = play_all_correct(&mut started(req(4, "ids").with_mode(SessionMode::Only(skill))), 500.0);
        for (index, task) in tasks.iter().enumerate() {
            assert_eq!(task.skill, skill);
            assert_eq!(task.kind(), kind);
            assert!(
                task.id.starts_with(&format!("{prefix}{index}-")),
                "id '{}' for {skill} does not start with '{prefix}{index}-'",
                task.id
            );
        }
    }
}

#[test]
fn every_task_has_prompt_hints_and_scoring() {
    for task in play_all_correct(&mut started(req(15, "text")), 500.0) {
        assert!(task.prompt.as_deref().is_some_and(|p| !p.is_empty()), "{}", task.id);
        assert!(task.hints.iter().all(|h| !h.is_empty()), "{}", task.id);
        assert_ne!(task.hints[0], task.hints[1], "{}", task.id);
        assert_eq!(task.scoring.max_points, 100);
        assert!(task.scoring.speed_bonus_ms.is_some());
    }
}

#[test]
fn answers_are_arithmetically_correct() {
    for task in play_all_correct(&mut started(req(30, "math")), 500.0) {
        let correct = correct_number(&task);
        match task.stimulus {
            Stimulus::TenFrameFlashCount { count, .. } => assert_eq!(correct, count),
            Stimulus::MissingToTen { start, target, .. } => assert_eq!(start + correct, target),
            Stimulus::BackToTenSubtract { start, subtract, .. } => {
                assert_eq!(correct, start - subtract);
                assert!(start > 10 && correct < 10, "{} does not cross ten", task.id);
            }
        }
    }
}

#[test]
fn consecutive_tasks_rarely_repeat() {
    let tasks = play_all_correct(
        &mut started(req(40, "repeat").with_mode(SessionMode::Only(Skill::Quantity))),
        500.0,
    );
    for pair in tasks.windows(2) {
        assert_ne!(pair[0].signature(), pair[1].signature(), "{} repeated", pair[1].id);
    }
}

#[test]
fn task_json_shape_is_tagged() {
    let engine = started(req(1, "json").with_mode(SessionMode::Only(Skill::MakeTen)));
    let value = serde_json::to_value(engine.current_task().unwrap()).unwrap();
    assert_eq!(value["skill"], "makeTen");
    assert_eq!(value["stimulus"]["type"], "missingToTen");
    assert_eq!(value["interaction"]["mode"], "singleChoice");
    assert_eq!(value["scoring"]["maxPoints"], 100);
    assert!(value["difficulty"].is_u64());
}

// ── grading ──────────────────────────────────────────────────────────────────

#[test]
fn grading_normalizes_numbers_and_strings() {
    let answer = TaskAnswer::single(7);
    assert!(answer.accepts(&AnswerValue::Number(7)));
    assert!(answer.accepts(&"7".into()));
    assert!(answer.accepts(&" 7\n".into()));
    assert!(!answer.accepts(&AnswerValue::Number(8)));
    assert!(!answer.accepts(&"seven".into()));

    let with_alternatives = TaskAnswer {
        correct: AnswerValue::Number(7),
        alternatives: vec!["sieben".into(), "seven".into()],
    };
    assert!(with_alternatives.accepts(&" seven ".into()));
}

#[test]
fn wrong_submission_is_graded_incorrect() {
    let mut engine = started(req(2, "wrong"));
    let correct = correct_number(engine.current_task().unwrap());
    let outcome = engine.submit_answer(Submission::new(correct + 1, 300.0)).unwrap();
    assert!(!outcome.is_correct);
    assert!(outcome.next_task_ready);
    assert!(!engine.attempts()[0].is_correct);
    assert_eq!(engine.attempts()[0].value, AnswerValue::Number((correct + 1) as i64));
}

// ── lifecycle ────────────────────────────────────────────────────────────────

#[test]
fn finish_aggregates_a_five_task_session() {
    let mut engine = started(req(5, "five"));
    let mut responses = Vec::new();
    for i in 0..5 {
        let task = engine.current_task().unwrap();
        let value = if i < 3 {
            task.answer.correct.clone()
        } else {
            AnswerValue::Number(-1)
        };
        if i == 1 {
            engine.use_hint().unwrap();
        }
        let response_ms = 1000.0 * (i + 1) as f64;
        responses.push(response_ms);
        engine.submit_answer(Submission { value, response_ms }).unwrap();
    }

    let result = engine.finish().unwrap();
    assert_eq!(result.correct, 3);
    assert_eq!(result.total_tasks, 5);
    assert_eq!(result.hint_uses, 1);
    assert_eq!(result.avg_response_ms, 3000);
    assert_eq!(result.session_id, "five");
    assert!(result.finished_at >= result.started_at);
    let total: u32 = result.by_skill.iter().map(|(_, t)| t.total).sum();
    let correct: u32 = result.by_skill.iter().map(|(_, t)| t.correct).sum();
    assert_eq!(total, 5);
    assert_eq!(correct, 3);
    assert_eq!(result.next_difficulty_by_skill, engine.difficulty_by_skill());
}

#[test]
fn finish_before_completion_is_rejected() {
    let mut engine = started(req(3, "early"));
    assert_eq!(
        engine.finish().unwrap_err(),
        EngineError::SessionIncomplete { completed: 0, total: 3 }
    );
    let value = engine.current_task().unwrap().answer.correct.clone();
    engine.submit_answer(Submission { value, response_ms: 10.0 }).unwrap();
    assert_eq!(
        engine.finish().unwrap_err(),
        EngineError::SessionIncomplete { completed: 1, total: 3 }
    );
    // The failed finish does not disturb the session.
    assert!(engine.current_task().is_ok());
}

#[test]
fn finished_engine_has_no_current_task() {
    let mut engine = started(req(2, "done"));
    play_all_correct(&mut engine, 100.0);
    assert_eq!(engine.current_task().unwrap_err(), EngineError::NoActiveTask);
    assert_eq!(engine.current_hint_level(), HintLevel::None);
}

#[test]
fn mixed_sequence_of_ten_covers_all_skills() {
    for seed in SEEDS {
        let mut rng = SeededRng::from_seed_str(seed);
        let seq = build_skill_sequence(&mut rng, 10, SessionMode::Mixed);
        assert_eq!(seq.len(), 10);
        for skill in Skill::ALL {
            assert!(seq.contains(&skill), "{skill} missing for seed {seed}");
        }
    }
}

// ── adaptation ───────────────────────────────────────────────────────────────

#[test]
fn end_to_end_all_correct_never_lowers_difficulty() {
    let initial = PerSkill::from_fn(|_| Difficulty::new(2));
    let mut engine = SessionEngine::with_initial_difficulty(initial);
    engine.start(req(5, "test-1").with_mode(SessionMode::Mixed)).unwrap();

    let shown = play_all_correct(&mut engine, 100.0);
    let result = engine.finish().unwrap();

    assert_eq!(result.correct, 5);
    for task in &shown {
        assert!(result.next_difficulty_by_skill[task.skill] >= initial[task.skill]);
    }
}

#[test]
fn three_fast_answers_raise_and_two_wrong_lower() {
    let mut initial = PerSkill::default();
    initial.quantity = Difficulty::new(3);
    let mut engine = SessionEngine::with_initial_difficulty(initial);
    engine
        .start(req(6, "adapt").with_mode(SessionMode::Only(Skill::Quantity)))
        .unwrap();

    for _ in 0..3 {
        assert_eq!(engine.current_task().unwrap().difficulty, Difficulty::new(3));
        let value = engine.current_task().unwrap().answer.correct.clone();
        engine.submit_answer(Submission { value, response_ms: 100.0 }).unwrap();
    }
    assert_eq!(engine.difficulty_by_skill().quantity, Difficulty::new(4));
    assert_eq!(engine.current_task().unwrap().difficulty, Difficulty::new(4));

    engine.submit_answer(Submission::new(-1, 100.0)).unwrap();
    engine.submit_answer(Submission::new(-1, 100.0)).unwrap();
    assert_eq!(engine.difficulty_by_skill().quantity, Difficulty::new(3));
}

#[test]
fn random_play_keeps_difficulty_in_range() {
    let mut rng = StdRng::seed_from_u64(7);
    for round in 0..5 {
        let mut engine = started(req(200, &format!("long-{round}")));
        loop {
            let task = engine.current_task().unwrap().clone();
            let value = if rng.gen_bool(0.5) { task.answer.correct.clone() } else { AnswerValue::Number(-1) };
            if rng.gen_bool(0.2) {
                engine.use_hint().unwrap();
            }
            let outcome = engine
                .submit_answer(Submission { value, response_ms: rng.gen_range(0.0..6000.0) })
                .unwrap();
            for (skill, d) in engine.difficulty_by_skill().iter() {
                assert!((1..=5).contains(&d.get()), "{skill} left range: {d}");
            }
            if !outcome.next_task_ready {
                break;
            }
        }
        assert_eq!(engine.finish().unwrap().total_tasks, 200);
    }
}

// ── persistence ──────────────────────────────────────────────────────────────

#[test]
fn result_carries_into_the_next_session() {
    let mut store = MemoryStore::new();
    let mut engine = SessionEngine::from_progress(&store.load_progress());
    engine
        .start(req(6, "carry").with_mode(SessionMode::Only(Skill::BridgeSubtract)))
        .unwrap();
    play_all_correct(&mut engine, 50.0);
    let result = engine.finish().unwrap();

    let progress = store.append_session_result(&result).unwrap();
    assert_eq!(progress.session_history[0], result);
    assert_eq!(progress.skill_snapshot.bridge_subtract.attempts, 6);
    assert_eq!(progress.skill_snapshot.bridge_subtract.correct, 6);
    // Two rounds of three fast answers.
    assert_eq!(progress.skill_snapshot.bridge_subtract.difficulty, Difficulty::new(4));

    let next = SessionEngine::from_progress(&store.load_progress());
    assert_eq!(next.difficulty_by_skill().bridge_subtract, Difficulty::new(4));
    assert_eq!(next.difficulty_by_skill().quantity, Difficulty::default());
}

#[test]
fn stored_result_json_round_trips() {
    let mut engine = started(req(3, "stored"));
    play_all_correct(&mut engine, 900.0);
    let progress = apply_session_result(&PersistedProgress::empty(), &engine.finish().unwrap());

    let raw = serde_json::to_string(&progress).unwrap();
    assert!(raw.contains("\"version\":1"));
    assert!(raw.contains("\"nextDifficultyBySkill\""));
    assert_eq!(MemoryStore::with_raw(raw).load_progress(), progress);
}

// ── locale ───────────────────────────────────────────────────────────────────

#[test]
fn locale_changes_text_but_not_values() {
    let de = started(req(4, "lang").with_locale(Locale::De).with_mode(SessionMode::Only(Skill::MakeTen)));
    let en = started(req(4, "lang").with_locale(Locale::En).with_mode(SessionMode::Only(Skill::MakeTen)));
    let (de, en) = (de.current_task().unwrap(), en.current_task().unwrap());

    assert_eq!(de.stimulus, en.stimulus);
    assert_eq!(de.answer, en.answer);
    assert_eq!(de.prompt.as_deref(), Some("Welche Zahl macht die 10 voll?"));
    assert_eq!(en.prompt.as_deref(), Some("What number completes ten?"));
    assert_ne!(de.hints, en.hints);
}
