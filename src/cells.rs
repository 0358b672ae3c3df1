// SPDX-License-Identifier: MIT
//
// Simulated battery cell readings.
//
// There is no real pack behind the dashboard. Each tick every cell takes a
// small random step up and a small random step down, which keeps the
// readings wandering around their starting values.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Cells in a full pack (and rows in the cell table).
pub const CELL_COUNT: usize = 15;

/// Starting millivolt readings, one per cell.
pub const INITIAL_MV: [u16; CELL_COUNT] = [
    3854, 3940, 3901, 3899, 3988, 3964, 3978, 3887, 3899, 3754, 3999, 3797, 3992, 3910, 3959,
];

/// Largest single step, in millivolts, in either direction.
pub const MAX_STEP_MV: u16 = 21;

/// Per-cell millivolt readings with a random walk.
#[derive(Debug, Clone)]
pub struct CellBank {
    mv: Vec<u16>,
    rng: StdRng,
}

impl CellBank {
    /// The first `count` cells of [`INITIAL_MV`]. A seed makes the walk
    /// reproducible; without one it is seeded from the OS.
    #[must_use]
    pub fn new(count: usize, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            mv: INITIAL_MV[..count.min(CELL_COUNT)].to_vec(),
            rng,
        }
    }

    #[must_use]
    pub fn readings(&self) -> &[u16] {
        &self.mv
    }

    /// Move every reading by up to [`MAX_STEP_MV`] each way. Saturates at
    /// the ends of the `u16` range.
    pub fn drift(&mut self) {
        for mv in &mut self.mv {
            let up = self.rng.gen_range(0..=MAX_STEP_MV);
            let down = self.rng.gen_range(0..=MAX_STEP_MV);
            *mv = mv.saturating_add(up).saturating_sub(down);
        }
    }
}

/// A millivolt reading shown as volts, `V.mmm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volts(pub u16);

impl fmt::Display for Volts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.0 / 1000, self.0 % 1000)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_bank_starts_at_initial_readings() {
        let bank = CellBank::new(CELL_COUNT, Some(1));
        assert_eq!(bank.readings(), &INITIAL_MV[..]);
        assert_eq!(bank.readings().len(), 15);
    }

    #[test]
    fn partial_bank_takes_leading_cells() {
        let bank = CellBank::new(3, Some(1));
        assert_eq!(bank.readings(), &[3854, 3940, 3901]);
    }

    #[test]
    fn oversized_count_is_capped() {
        assert_eq!(CellBank::new(99, Some(1)).readings().len(), CELL_COUNT);
    }

    #[test]
    fn drift_stays_within_one_step() {
        let mut bank = CellBank::new(CELL_COUNT, Some(7));
        for _ in 0..100 {
            let before = bank.readings().to_vec();
            bank.drift();
            for (a, b) in before.iter().zip(bank.readings()) {
                assert!(a.abs_diff(*b) <= MAX_STEP_MV, "{a} -> {b}");
            }
        }
    }

    #[test]
    fn same_seed_same_walk() {
        let mut a = CellBank::new(CELL_COUNT, Some(42));
        let mut b = CellBank::new(CELL_COUNT, Some(42));
        for _ in 0..10 {
            a.drift();
            b.drift();
        }
        assert_eq!(a.readings(), b.readings());
    }

    #[test]
    fn drift_saturates() {
        let mut bank = CellBank::new(2, Some(3));
        bank.mv = vec![0, u16::MAX];
        bank.drift();
        assert!(bank.readings()[0] <= MAX_STEP_MV);
        assert!(bank.readings()[1] >= u16::MAX - MAX_STEP_MV);
    }

    // ── Volts ───────────────────────────────────────────────────────────

    #[test]
    fn volts_formatting() {
        assert_eq!(Volts(3854).to_string(), "3.854");
        assert_eq!(Volts(3005).to_string(), "3.005");
        assert_eq!(Volts(999).to_string(), "0.999");
        assert_eq!(Volts(12_040).to_string(), "12.040");
    }
}
