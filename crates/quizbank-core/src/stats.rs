//! Per-library correctness statistics.

use serde::{Deserialize, Serialize};

use crate::classify::{Band, BAND_COUNT};
use crate::decompose;
use crate::model::Library;

/// How a library's units spread across correctness bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryStats {
    pub library_id: String,
    pub name: String,
    /// Schedulable units after decomposition.
    pub units: usize,
    pub never_asked: usize,
    /// Mean correctness over units that have been asked, if any.
    pub average_correctness: Option<f64>,
    pub bands: [usize; BAND_COUNT],
}

/// Count units per band, weakest first.
pub fn band_histogram(library: &Library) -> [usize; BAND_COUNT] {
    let mut bands = [0; BAND_COUNT];
    for unit in decompose::units(library) {
        bands[Band::of(&unit).index()] += 1;
    }
    bands
}

impl LibraryStats {
    pub fn compute(library: &Library) -> Self {
        let units = decompose::units(library);

        let asked: Vec<f64> = units
            .iter()
            .filter(|u| u.times_asked() > 0)
            .map(|u| u.correctness())
            .collect();
        let average_correctness =
            (!asked.is_empty()).then(|| asked.iter().sum::<f64>() / asked.len() as f64);

        Self {
            library_id: library.id.clone(),
            name: library.name.clone(),
            units: units.len(),
            never_asked: units.len() - asked.len(),
            average_correctness,
            bands: band_histogram(library),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompositeQuestion, LibraryQuestion, SimpleQuestion};

    #[test]
    fn stats_over_mixed_library() {
        let mut lib = Library::new("mix", "Mixed");
        lib.push(LibraryQuestion::Simple(
            SimpleQuestion::new("", "a", "p", "a").with_history(9, 10, 3),
        ));
        lib.push(LibraryQuestion::Simple(
            SimpleQuestion::new("", "b", "p", "a").with_history(1, 2, 1),
        ));
        let mut c = CompositeQuestion::from_columns(
            "",
            "c",
            "[q]",
            vec!["x".into(), "y".into()],
            vec!["1".into(), "2".into()],
        )
        .unwrap();
        c.rows[0].marks_available = 4;
        c.rows[0].times_asked = 2;
        lib.push(LibraryQuestion::Composite(c));

        let stats = LibraryStats::compute(&lib);
        assert_eq!(stats.units, 4);
        assert_eq!(stats.never_asked, 1);
        // 0.9 -> band 5, 0.5 -> band 3, 0.0 asked -> band 0, never asked -> band 0
        assert_eq!(stats.bands, [2, 0, 0, 1, 0, 1]);
        let avg = stats.average_correctness.unwrap();
        assert!((avg - (0.9 + 0.5 + 0.0) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_library_has_no_average() {
        let stats = LibraryStats::compute(&Library::new("e", "Empty"));
        assert_eq!(stats.units, 0);
        assert!(stats.average_correctness.is_none());
        assert_eq!(band_histogram(&Library::new("e", "Empty")), [0; BAND_COUNT]);
    }
}
