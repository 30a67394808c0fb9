//! Ordered pattern rules mapping activity text to an [`EventKind`].

use std::sync::LazyLock;

use regex::Regex;

use crate::kind::EventKind;

/// Classification rules in priority order. First match wins.
static RULES: LazyLock<Vec<(EventKind, Regex)>> = LazyLock::new(|| {
    vec![
        (EventKind::Poop, Regex::new(r"(?i)poo|dirty\s+diaper").unwrap()),
        (EventKind::Asleep, Regex::new(r"(?i)sleep|down").unwrap()),
        (EventKind::Awake, Regex::new(r"(?i)wake|up").unwrap()),
        (
            EventKind::Eat,
            Regex::new(r"(?i)took\s+\d+|^\s*[+-]?\d+(\.\d+)?\s*$").unwrap(),
        ),
    ]
});

/// First run of ASCII digits, used for feed amounts.
pub(crate) static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Classifies activity text by the first matching rule, falling back to
/// [`EventKind::Misc`].
///
/// Priority beats specificity: `"asleep at 10"` is a sleep, not a feed.
pub fn classify(text: &str) -> EventKind {
    RULES
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map_or(EventKind::Misc, |(kind, _)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_pooped() {
        assert_eq!(classify("has pooped"), EventKind::Poop);
        assert_eq!(classify("Dirty diaper"), EventKind::Poop);
    }

    #[test]
    fn wet_diaper_is_not_a_poop() {
        assert_eq!(classify("wet diaper"), EventKind::Misc);
    }

    #[test]
    fn asleep_and_down() {
        assert_eq!(classify("is asleep"), EventKind::Asleep);
        assert_eq!(classify("is down"), EventKind::Asleep);
    }

    #[test]
    fn awake_and_up() {
        assert_eq!(classify("is awake"), EventKind::Awake);
        assert_eq!(classify("is up"), EventKind::Awake);
    }

    #[test]
    fn eating() {
        assert_eq!(classify("took 100"), EventKind::Eat);
        assert_eq!(classify("100"), EventKind::Eat);
        assert_eq!(classify(" 90 "), EventKind::Eat);
        assert_eq!(classify("+120"), EventKind::Eat);
    }

    #[test]
    fn fallback_is_misc() {
        assert_eq!(classify("laughed for the first time"), EventKind::Misc);
        assert_eq!(classify(""), EventKind::Misc);
    }

    #[test]
    fn sleep_beats_number() {
        assert_eq!(classify("asleep at 10"), EventKind::Asleep);
    }

    #[test]
    fn poop_beats_everything() {
        assert_eq!(classify("pooped then fell asleep, took 30"), EventKind::Poop);
    }

    #[test]
    fn sleep_beats_wake() {
        // "down" and "up" both appear; the sleep rule is checked first.
        assert_eq!(classify("up and down"), EventKind::Asleep);
    }

    #[test]
    fn numbers_inside_misc_text_stay_misc() {
        assert_eq!(classify("weighed 12 pounds"), EventKind::Misc);
    }
}
