//! Message lookup with `{name}` interpolation and locale fallback.
//!
//! The engine only needs prompt and hint text, but the built-in catalog also
//! carries skill labels and feedback lines so a front end can share it.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::practice_engine::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    De,
    En,
}

impl Locale {
    /// Used when a key is missing in the requested locale.
    pub const FALLBACK: Locale = Locale::En;
    pub const ALL: [Locale; 2] = [Locale::De, Locale::En];

    pub fn code(self) -> &'static str {
        match self {
            Locale::De => "de",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Locale {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::UnknownLocale(s.to_string()))
    }
}

/// Named placeholder values, e.g. `&[("start", "7".into())]`.
pub type MessageParams<'a> = [(&'a str, String)];

/// Message lookup. Implementors provide raw templates; `translate` handles
/// fallback and interpolation.
pub trait Translator {
    fn lookup(&self, locale: Locale, key: &str) -> Option<&str>;

    /// Requested locale, then [`Locale::FALLBACK`], then the key itself.
    fn translate(&self, locale: Locale, key: &str, params: &MessageParams<'_>) -> String {
        let template = self
            .lookup(locale, key)
            .or_else(|| self.lookup(Locale::FALLBACK, key));

        match template {
            Some(template) => interpolate(template, params),
            None => {
                warn!(%locale, key, "missing i18n key");
                key.to_string()
            }
        }
    }
}

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid")
});

/// Replace `{name}` tokens with matching params. Unknown tokens are kept.
pub fn interpolate(template: &str, params: &MessageParams<'_>) -> String {
    if params.is_empty() {
        return template.to_string();
    }
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let name = &caps[1];
            params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Built-in German and English messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog;

impl Catalog {
    fn messages(locale: Locale) -> &'static [(&'static str, &'static str)] {
        match locale {
            Locale::De => DE_MESSAGES,
            Locale::En => EN_MESSAGES,
        }
    }
}

impl Translator for Catalog {
    fn lookup(&self, locale: Locale, key: &str) -> Option<&str> {
        Catalog::messages(locale)
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }
}

const DE_MESSAGES: &[(&str, &str)] = &[
    ("skill.mixed", "Bunt gemischt!"),
    ("skill.quantity", "Punkte zählen"),
    ("skill.makeTen", "Auf 10 ergänzen"),
    ("skill.bridgeSubtract", "Subtrahieren"),
    ("session.hint.level", "Tipp {level}"),
    ("start.lastScore", "{correct} von {total} richtig!"),
    ("result.title", "Super gemacht!"),
    ("result.encouragement.perfect", "Perfekt! Du bist ein Mathe-Star!"),
    ("result.encouragement.great", "Richtig stark! Du wirst immer besser!"),
    ("result.encouragement.good", "Gut gemacht! Mit etwas Übung wird es noch besser!"),
    ("result.encouragement.try", "Toller Versuch! Mit jedem Mal wirst du stärker!"),
    ("task.quantity.prompt", "Wie viele Punkte hast du gesehen?"),
    ("task.quantity.hint1", "Achte auf Gruppen: erst bis 5, dann den Rest."),
    ("task.quantity.hint2", "Nutze 5 + Rest. Zum Beispiel: 8 ist 5 und 3."),
    ("task.makeTen.prompt", "Welche Zahl macht die 10 voll?"),
    ("task.makeTen.hint1", "Denk an 10 als 5 + 5. Wie weit bist du von 10 entfernt?"),
    ("task.makeTen.hint2", "Zähle von {start} bis 10 an deinen Fingern hoch."),
    ("task.bridgeSubtract.prompt", "Subtrahiere über die 10."),
    ("task.bridgeSubtract.hint1", "Erst bis 10 wegnehmen, dann den Rest."),
    ("task.bridgeSubtract.hint2", "{start} -> 10 nimmt {bridgeStep}. Danach nimm {leftover} weg."),
    ("feedback.correct", "Super!"),
    ("feedback.incorrect", "Fast!"),
    ("feedback.answerWas", "Es war {answer}"),
];

const EN_MESSAGES: &[(&str, &str)] = &[
    ("skill.mixed", "Mixed bag!"),
    ("skill.quantity", "Count the dots"),
    ("skill.makeTen", "Make ten"),
    ("skill.bridgeSubtract", "Subtract"),
    ("session.hint.level", "Hint {level}"),
    ("start.lastScore", "{correct} of {total} correct!"),
    ("result.title", "Well done!"),
    ("result.encouragement.perfect", "Perfect! You are a maths star!"),
    ("result.encouragement.great", "Really strong! You keep getting better!"),
    ("result.encouragement.good", "Good job! A little practice makes it even better!"),
    ("result.encouragement.try", "Great try! You get stronger every time!"),
    ("task.quantity.prompt", "How many dots did you see?"),
    ("task.quantity.hint1", "Look for groups: first to 5, then count extras."),
    ("task.quantity.hint2", "Use 5 + extras. For example, 8 is 5 and 3."),
    ("task.makeTen.prompt", "What number completes ten?"),
    ("task.makeTen.hint1", "Think of ten as 5 + 5. How far is your number from 10?"),
    ("task.makeTen.hint2", "Count up from {start} to 10 with your fingers."),
    ("task.bridgeSubtract.prompt", "Subtract by crossing ten."),
    ("task.bridgeSubtract.hint1", "First subtract to 10, then subtract what is left."),
    ("task.bridgeSubtract.hint2", "{start} -> 10 removes {bridgeStep}. Then remove {leftover}."),
    ("feedback.correct", "Great!"),
    ("feedback.incorrect", "Almost!"),
    ("feedback.answerWas", "It was {answer}"),
];
