//! Event kinds and the per-kind behavior table.
//!
//! Every kind-specific rule (display color, emoji prefix, how later
//! occurrences fold into an earlier one) lives in [`EventKind::behavior`],
//! so adding a kind is a compile error until every rule is decided.

use std::fmt;

/// Closed classification of a logged activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Poop,
    Asleep,
    Awake,
    Eat,
    Misc,
}

impl EventKind {
    /// All kinds, in classifier priority order.
    pub const ALL: [Self; 5] = [Self::Poop, Self::Asleep, Self::Awake, Self::Eat, Self::Misc];

    /// Returns the fixed behavior row for this kind.
    #[must_use]
    pub const fn behavior(self) -> KindBehavior {
        match self {
            Self::Poop => KindBehavior {
                color: Color::Brown,
                emoji: "💩",
                merge: MergeRule::Standalone,
            },
            Self::Asleep => KindBehavior {
                color: Color::Green,
                emoji: "😴",
                merge: MergeRule::Standalone,
            },
            Self::Awake => KindBehavior {
                color: Color::Green,
                emoji: "😊",
                merge: MergeRule::ClosesOpen(Self::Asleep),
            },
            Self::Eat => KindBehavior {
                color: Color::Purple,
                emoji: "🍼",
                merge: MergeRule::Accumulates,
            },
            Self::Misc => KindBehavior {
                color: Color::Default,
                emoji: "",
                merge: MergeRule::Standalone,
            },
        }
    }

    /// Display color for this kind.
    #[must_use]
    pub const fn color(self) -> Color {
        self.behavior().color
    }

    /// Emoji prefix used in titles.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        self.behavior().emoji
    }

    /// String form used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Poop => "poop",
            Self::Asleep => "asleep",
            Self::Awake => "awake",
            Self::Eat => "eat",
            Self::Misc => "misc",
        }
    }
}

/// Static per-kind rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindBehavior {
    pub color: Color,
    pub emoji: &'static str,
    pub merge: MergeRule,
}

/// How an occurrence of a kind relates to earlier events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    /// Always emitted as its own entry.
    Standalone,
    /// Closes the still-open representative of the given kind, if it is
    /// within the configured window; otherwise emitted standalone.
    ClosesOpen(EventKind),
    /// Folds into the representative of the same kind while within the
    /// configured window, summing amounts.
    Accumulates,
}

/// Calendar display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Brown,
    Green,
    Purple,
    /// Left to the renderer's default.
    Default,
}

impl Color {
    /// CSS color name, or `None` for the renderer default.
    #[must_use]
    pub const fn as_css(self) -> Option<&'static str> {
        match self {
            Self::Brown => Some("brown"),
            Self::Green => Some("green"),
            Self::Purple => Some("purple"),
            Self::Default => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
