//! The question pool: six banded sequences of not-yet-asked units.
//!
//! Units leave the pool from the tail of a band and never come back. When the
//! requested band is empty the pool falls back to the nearest weaker band
//! first, then to stronger ones.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::classify::{Band, BAND_COUNT};
use crate::model::Question;

/// Six ordered sequences of schedulable units, indexed by band.
#[derive(Debug, Clone, Default)]
pub struct Pool {
    bands: [Vec<Question>; BAND_COUNT],
}

impl Pool {
    /// Build a pool by classifying each unit into its band, then shuffling
    /// every band independently.
    pub fn partitioned<R: Rng + ?Sized>(units: Vec<Question>, rng: &mut R) -> Self {
        let mut pool = Pool::default();
        for unit in units {
            let band = Band::of(&unit);
            pool.bands[band.index()].push(unit);
        }
        for band in pool.bands.iter_mut() {
            band.shuffle(rng);
        }
        pool
    }

    /// Build a pool that serves units in the given order.
    ///
    /// Everything goes into band 0, reversed so that popping from the tail
    /// yields the original order.
    pub fn sequential(units: Vec<Question>) -> Self {
        let mut pool = Pool::default();
        let weakest = &mut pool.bands[Band::WEAKEST.index()];
        *weakest = units;
        weakest.reverse();
        pool
    }

    /// Remove and return a unit from `band`, falling back to the nearest
    /// non-empty band (weaker first, then stronger).
    ///
    /// Returns `None` only when every band is empty.
    pub fn extract_from(&mut self, band: Band) -> Option<Question> {
        let source = self.resolve(band)?;
        if source != band {
            tracing::debug!(requested = %band, served = %source, "band empty, falling back");
        }
        self.bands[source.index()].pop()
    }

    /// Find the band an extraction for `requested` would be served from.
    pub fn resolve(&self, requested: Band) -> Option<Band> {
        let index = requested.index();
        let downward = (0..=index).rev();
        let upward = index + 1..BAND_COUNT;
        downward
            .chain(upward)
            .find(|&i| !self.bands[i].is_empty())
            .and_then(Band::new)
    }

    /// Total number of units remaining across all bands.
    pub fn len(&self) -> usize {
        self.bands.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.iter().all(Vec::is_empty)
    }

    pub fn band_len(&self, band: Band) -> usize {
        self.bands[band.index()].len()
    }

    /// Remaining units per band, weakest first.
    pub fn band_sizes(&self) -> [usize; BAND_COUNT] {
        let mut sizes = [0; BAND_COUNT];
        for (size, band) in sizes.iter_mut().zip(&self.bands) {
            *size = band.len();
        }
        sizes
    }
}
