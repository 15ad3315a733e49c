//! Correctness classification and band assignment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Question;

/// Number of correctness bands.
pub const BAND_COUNT: usize = 6;

/// Lower bounds of bands 1..=5. Band 0 covers everything below the first.
const BAND_LOWER_BOUNDS: [f64; BAND_COUNT - 1] = [0.15, 0.35, 0.50, 0.70, 0.85];

/// Compute the historical correctness ratio of a unit.
///
/// Never-asked units and units with no marks available score 0.
pub fn correctness(marks_awarded: u32, marks_available: u32, times_asked: u32) -> f64 {
    if times_asked == 0 || marks_available == 0 {
        return 0.0;
    }
    (marks_awarded as f64 / marks_available as f64).min(1.0)
}

/// A correctness band, 0 (weakest) through 5 (strongest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Band(usize);

impl Band {
    pub const WEAKEST: Band = Band(0);
    pub const STRONGEST: Band = Band(BAND_COUNT - 1);

    /// Create a band from its index. Returns `None` past the strongest band.
    pub fn new(index: usize) -> Option<Self> {
        (index < BAND_COUNT).then_some(Band(index))
    }

    pub fn index(self) -> usize {
        self.0
    }

    /// All bands, weakest first.
    pub fn all() -> impl DoubleEndedIterator<Item = Band> {
        (0..BAND_COUNT).map(Band)
    }

    /// Band for a correctness ratio, using half-open intervals.
    pub fn for_correctness(correctness: f64) -> Self {
        let index = BAND_LOWER_BOUNDS
            .iter()
            .take_while(|&&lower| correctness >= lower)
            .count();
        Band(index)
    }

    /// Classify a schedulable unit.
    pub fn of(question: &Question) -> Self {
        if question.times_asked() == 0 {
            return Band::WEAKEST;
        }
        Band::for_correctness(question.correctness())
    }

    /// Human-readable correctness range, e.g. `35-50%`.
    pub fn range_label(self) -> &'static str {
        match self.0 {
            0 => "<15%",
            1 => "15-35%",
            2 => "35-50%",
            3 => "50-70%",
            4 => "70-85%",
            _ => ">=85%",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "band {}", self.0)
    }
}

impl TryFrom<usize> for Band {
    type Error = String;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Band::new(index).ok_or_else(|| format!("band index out of range: {index}"))
    }
}

impl From<Band> for usize {
    fn from(band: Band) -> usize {
        band.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SimpleQuestion;

    #[test]
    fn never_asked_is_zero() {
        assert_eq!(correctness(10, 10, 0), 0.0);
        assert_eq!(correctness(0, 20, 0), 0.0);
    }

    #[test]
    fn zero_available_is_zero() {
        assert_eq!(correctness(0, 0, 4), 0.0);
    }

    #[test]
    fn ratio_and_clamp() {
        assert_eq!(correctness(18, 20, 5), 0.9);
        assert_eq!(correctness(30, 20, 5), 1.0);
    }

    #[test]
    fn band_boundaries_are_half_open() {
        let cases = [
            (0.0, 0),
            (0.1499, 0),
            (0.15, 1),
            (0.3499, 1),
            (0.35, 2),
            (0.4999, 2),
            (0.50, 3),
            (0.6999, 3),
            (0.70, 4),
            (0.8499, 4),
            (0.85, 5),
            (1.0, 5),
        ];
        for (c, expected) in cases {
            assert_eq!(
                Band::for_correctness(c).index(),
                expected,
                "correctness {c}"
            );
        }
    }

    #[test]
    fn exact_fractions_land_on_boundaries() {
        // Ratios equal to a bound belong to the upper band.
        assert_eq!(Band::for_correctness(correctness(3, 20, 1)).index(), 1);
        assert_eq!(Band::for_correctness(correctness(7, 20, 1)).index(), 2);
        assert_eq!(Band::for_correctness(correctness(17, 20, 1)).index(), 5);
    }

    #[test]
    fn never_asked_question_is_weakest_regardless_of_marks() {
        let q = Question::Simple(SimpleQuestion::new("l", "q", "p", "a").with_history(20, 20, 0));
        assert_eq!(Band::of(&q), Band::WEAKEST);
    }

    #[test]
    fn band_new_bounds() {
        assert!(Band::new(5).is_some());
        assert!(Band::new(6).is_none());
        assert_eq!(Band::all().count(), BAND_COUNT);
        assert_eq!(Band::STRONGEST.to_string(), "band 5");
    }
}
