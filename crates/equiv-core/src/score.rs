//! Score: a real-valued signal or an explicit abstention (`Null`).
//!
//! `Null` is the neutral element of addition and is never read as zero by
//! averaging. Negative real scores are legitimate veto signals.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// A single source's opinion about a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Score {
    Real(f64),
    Null,
}

impl Score {
    pub const ZERO: Score = Score::Real(0.0);
    pub const ONE: Score = Score::Real(1.0);
    pub const NULL: Score = Score::Null;

    /// Build a real score. Non-finite input collapses to `Null`.
    pub fn value(v: f64) -> Self {
        if v.is_finite() {
            Score::Real(v)
        } else {
            Score::Null
        }
    }

    /// Score for a boolean match: `ONE` when true, `NULL` otherwise.
    pub fn one_or_null(matched: bool) -> Self {
        if matched {
            Score::ONE
        } else {
            Score::NULL
        }
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Score::Real(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Score::Null)
    }

    /// The real value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Score::Real(v) => Some(*v),
            Score::Null => None,
        }
    }

    /// Multiply a real score; `Null` stays `Null`.
    pub fn scale(self, factor: f64) -> Self {
        match self {
            Score::Real(v) => Score::value(v * factor),
            Score::Null => Score::Null,
        }
    }

    /// Whether this score is real and strictly positive.
    pub fn is_positive(&self) -> bool {
        self.as_f64().is_some_and(|v| v > 0.0)
    }

    /// The better of two scores: a real score beats `Null`, a larger real beats a smaller one.
    pub fn max(self, other: Score) -> Score {
        match (self, other) {
            (Score::Real(a), Score::Real(b)) => Score::Real(a.max(b)),
            (Score::Real(_), Score::Null) => self,
            (Score::Null, _) => other,
        }
    }

    /// Descending order with `Null` after every real score.
    pub fn cmp_desc(&self, other: &Score) -> Ordering {
        match (self, other) {
            (Score::Real(a), Score::Real(b)) => b.partial_cmp(a).unwrap_or(Ordering::Equal),
            (Score::Real(_), Score::Null) => Ordering::Less,
            (Score::Null, Score::Real(_)) => Ordering::Greater,
            (Score::Null, Score::Null) => Ordering::Equal,
        }
    }
}

impl Default for Score {
    fn default() -> Self {
        Score::Null
    }
}

impl Add for Score {
    type Output = Score;

    fn add(self, rhs: Score) -> Score {
        match (self, rhs) {
            (Score::Real(a), Score::Real(b)) => Score::value(a + b),
            (Score::Real(_), Score::Null) => self,
            (Score::Null, _) => rhs,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Real(v) => write!(f, "{v:.2}"),
            Score::Null => f.write_str("none"),
        }
    }
}

/// A predicate over scores, used by gating combiners and extractors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ScoreThreshold {
    /// Real and strictly greater than zero.
    Positive,
    GreaterThan(f64),
    GreaterThanOrEqual(f64),
}

impl ScoreThreshold {
    /// `Null` never passes a threshold.
    pub fn passes(&self, score: Score) -> bool {
        let Some(v) = score.as_f64() else {
            return false;
        };
        match self {
            ScoreThreshold::Positive => v > 0.0,
            ScoreThreshold::GreaterThan(t) => v > *t,
            ScoreThreshold::GreaterThanOrEqual(t) => v >= *t,
        }
    }
}

impl Default for ScoreThreshold {
    fn default() -> Self {
        ScoreThreshold::Positive
    }
}

impl fmt::Display for ScoreThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreThreshold::Positive => f.write_str("> 0"),
            ScoreThreshold::GreaterThan(t) => write!(f, "> {t}"),
            ScoreThreshold::GreaterThanOrEqual(t) => write!(f, ">= {t}"),
        }
    }
}
