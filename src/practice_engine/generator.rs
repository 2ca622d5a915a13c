use chrono::Utc;
use rand::{Rng, RngCore};
use tracing::debug;

use crate::practice_engine::{
    i18n::{Locale, Translator},
    models::{Difficulty, SessionMode, Skill, Task},
    registry::{list_skills, skill_definition, GeneratorInput},
    rng::{pick_weighted, shuffle, Weighted},
};

/// Regenerations allowed when a new task repeats the previous signature.
pub const MAX_DUPLICATE_RETRIES: usize = 20;

/// Padding weight of the focus skill relative to the others.
pub const FOCUS_WEIGHT: f64 = 3.0;

/// What to generate next, and what it must not repeat.
#[derive(Debug, Clone, Copy)]
pub struct TaskRequest<'a> {
    pub skill: Skill,
    pub difficulty: Difficulty,
    pub locale: Locale,
    pub index: usize,
    pub previous: Option<&'a Task>,
}

fn generate_single(rng: &mut dyn RngCore, translator: &dyn Translator, request: &TaskRequest<'_>) -> Task {
    let definition = skill_definition(request.skill);
    (definition.generate)(GeneratorInput {
        difficulty: request.difficulty,
        config: definition.difficulty_config(request.difficulty),
        locale: request.locale,
        rng,
        index: request.index,
        translator,
    })
}

/// Generate one task, regenerating up to [`MAX_DUPLICATE_RETRIES`] times while
/// its signature matches the previous task. After that the next result is
/// accepted even if it repeats.
pub fn generate_task_for_skill<R: RngCore>(
    rng: &mut R,
    translator: &dyn Translator,
    request: &TaskRequest<'_>,
) -> Task {
    let Some(previous) = request.previous else {
        return generate_single(rng, translator, request);
    };
    let avoid = previous.signature();

    for attempt in 0..MAX_DUPLICATE_RETRIES {
        let task = generate_single(rng, translator, request);
        if task.signature() != avoid {
            return task;
        }
        debug!(attempt, signature = %avoid, "regenerating repeated task");
    }

    debug!(signature = %avoid, "duplicate retries exhausted, accepting repeat");
    generate_single(rng, translator, request)
}

/// Ordered skills for a session of `length` tasks.
///
/// `Only` repeats one skill. `Mixed` and `Focus` start from one of every
/// registered skill, pad with weighted picks, shuffle, then truncate.
pub fn build_skill_sequence<R: RngCore>(rng: &mut R, length: usize, mode: SessionMode) -> Vec<Skill> {
    if length == 0 {
        return Vec::new();
    }

    let focus = match mode {
        SessionMode::Only(skill) => return vec![skill; length],
        SessionMode::Focus(skill) => Some(skill),
        SessionMode::Mixed => None,
    };

    let skills = list_skills();
    let options: Vec<Weighted<Skill>> = skills
        .iter()
        .map(|&skill| {
            let weight = if focus == Some(skill) { FOCUS_WEIGHT } else { 1.0 };
            Weighted::new(skill, weight)
        })
        .collect();

    let mut pool = skills.clone();
    for _ in 0..length.saturating_sub(skills.len()) {
        if let Some(&skill) = pick_weighted(rng, &options) {
            pool.push(skill);
        }
    }

    let mut sequence = shuffle(rng, &pool);
    sequence.truncate(length);
    sequence
}

/// Fresh seed: base-36 wall-clock millis plus a random suffix.
pub fn build_session_seed() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let entropy: u32 = rand::thread_rng().gen_range(1000..=99_999);
    format!("{}-{}", to_base36(millis), entropy)
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::practice_engine::{i18n::Catalog, rng::SeededRng};

    fn count(seq: &[Skill], skill: Skill) -> usize {
        seq.iter().filter(|&&s| s == skill).count()
    }

    #[test]
    fn mixed_sequence_covers_every_skill() {
        for seed in 0..30 {
            let mut rng = SeededRng::from_seed_str(&format!("seq-{seed}"));
            let seq = build_skill_sequence(&mut rng, 10, SessionMode::Mixed);
            assert_eq!(seq.len(), 10);
            for skill in Skill::ALL {
                assert!(seq.contains(&skill), "{skill} missing from {seq:?}");
            }
        }
    }

    #[test]
    fn short_mixed_sequence_is_truncated() {
        let mut rng = SeededRng::from_seed_str("short");
        let seq = build_skill_sequence(&mut rng, 2, SessionMode::Mixed);
        assert_eq!(seq.len(), 2);
        assert_ne!(seq[0], seq[1]);
    }

    #[test]
    fn zero_length_is_empty() {
        let mut rng = SeededRng::from_seed_str("zero");
        assert!(build_skill_sequence(&mut rng, 0, SessionMode::Mixed).is_empty());
        assert!(build_skill_sequence(&mut rng, 0, SessionMode::Only(Skill::MakeTen)).is_empty());
    }

    #[test]
    fn only_mode_repeats_one_skill() {
        let mut rng = SeededRng::from_seed_str("only");
        let seq = build_skill_sequence(&mut rng, 7, SessionMode::Only(Skill::BridgeSubtract));
        assert_eq!(seq, vec![Skill::BridgeSubtract; 7]);
    }

    #[test]
    fn focus_mode_biases_padding() {
        let mut rng = SeededRng::from_seed_str("focus");
        let mut focused = 0;
        let mut others = 0;
        for _ in 0..200 {
            let seq = build_skill_sequence(&mut rng, 20, SessionMode::Focus(Skill::MakeTen));
            for skill in Skill::ALL {
                assert!(seq.contains(&skill));
            }
            focused += count(&seq, Skill::MakeTen);
            others += count(&seq, Skill::Quantity) + count(&seq, Skill::BridgeSubtract);
        }
        // Expected share is 3/5 of the padding plus one guaranteed slot.
        assert!(focused > others, "focused={focused} others={others}");
    }

    #[test]
    fn next_task_avoids_previous_signature() {
        let mut rng = SeededRng::from_seed_str("dup");
        let mut previous: Option<Task> = None;
        for index in 0..40 {
            // Difficulty 5 makeTen only has two possible starts.
            let request = TaskRequest {
                skill: Skill::MakeTen,
                difficulty: Difficulty::MAX,
                locale: Locale::En,
                index,
                previous: previous.as_ref(),
            };
            let task = generate_task_for_skill(&mut rng, &Catalog, &request);
            if let Some(prev) = &previous {
                assert_ne!(task.signature(), prev.signature());
            }
            previous = Some(task);
        }
    }

    #[test]
    fn session_seed_has_two_parts() {
        let seed = build_session_seed();
        let (time, entropy) = seed.split_once('-').expect("seed has a dash");
        assert!(!time.is_empty());
        let entropy: u32 = entropy.parse().expect("numeric entropy");
        assert!((1000..=99_999).contains(&entropy));
    }

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
