//! Dice - Injectable randomness
//!
//! Every random branch of the reply pipeline draws from a `Dice` passed
//! down the call chain, so a run can be replayed deterministically.

use std::collections::VecDeque;
use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform integer draws
pub trait Dice: Send {
    /// Uniform draw from the half-open `range`. An empty range yields `range.start`.
    fn roll(&mut self, range: Range<u32>) -> u32;
}

/// `Dice` backed by a standard RNG
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Dice for RandomDice {
    fn roll(&mut self, range: Range<u32>) -> u32 {
        if range.is_empty() {
            return range.start;
        }
        self.rng.gen_range(range)
    }
}

/// `Dice` replaying a fixed sequence of draws.
///
/// Values are clamped into the requested range; once the script is
/// exhausted every roll returns `range.start`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<u32>,
}

impl ScriptedDice {
    pub fn new(rolls: impl IntoIterator<Item = u32>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
        }
    }

    /// Draws not consumed yet
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, range: Range<u32>) -> u32 {
        let Some(value) = self.rolls.pop_front() else {
            return range.start;
        };
        if range.is_empty() {
            return range.start;
        }
        value.clamp(range.start, range.end - 1)
    }
}

/// Fair coin. `true` on a draw of 0 from `0..2`.
pub fn coin_flip(dice: &mut dyn Dice) -> bool {
    dice.roll(0..2) == 0
}

/// Uniformly pick one element, `None` for an empty slice
pub fn pick<'a, T>(dice: &mut dyn Dice, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let len = u32::try_from(items.len()).unwrap_or(u32::MAX);
    items.get(dice.roll(0..len) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_dice_clamps_and_exhausts() {
        let mut dice = ScriptedDice::new([5, 200]);
        assert_eq!(dice.roll(0..10), 5);
        assert_eq!(dice.roll(2..51), 50);
        assert_eq!(dice.remaining(), 0);
        assert_eq!(dice.roll(2..51), 2);
    }

    #[test]
    fn test_pick_uses_roll_as_index() {
        let items = ["a", "b", "c"];
        let mut dice = ScriptedDice::new([2]);
        assert_eq!(pick(&mut dice, &items), Some(&"c"));
        assert_eq!(pick::<u8>(&mut dice, &[]), None);
    }

    #[test]
    fn test_seeded_dice_is_reproducible() {
        let mut a = RandomDice::seeded(42);
        let mut b = RandomDice::seeded(42);
        let left: Vec<u32> = (0..16).map(|_| a.roll(0..100)).collect();
        let right: Vec<u32> = (0..16).map(|_| b.roll(0..100)).collect();
        assert_eq!(left, right);
        assert!(left.iter().all(|v| *v < 100));
    }
}
