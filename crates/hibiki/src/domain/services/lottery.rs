//! Wild Lottery
//!
//! Two independent draws: a roll in `[0, 100)` and a threshold in
//! `[2, 51)`. The lottery is won when the roll is below the threshold,
//! so the win rate is the mean over the threshold range (about 26%),
//! not a fixed percentage.

use std::ops::Range;

use serde::Serialize;

use super::Dice;

pub const WILD_ROLL_RANGE: Range<u32> = 0..100;
pub const WILD_THRESHOLD_RANGE: Range<u32> = 2..51;

/// Outcome of one lottery draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LotteryDraw {
    pub won: bool,
    pub roll: u32,
    pub threshold: u32,
}

/// Draw the roll, then the threshold.
pub fn wild_lottery(dice: &mut dyn Dice) -> LotteryDraw {
    let roll = dice.roll(WILD_ROLL_RANGE);
    let threshold = dice.roll(WILD_THRESHOLD_RANGE);
    LotteryDraw {
        won: roll < threshold,
        roll,
        threshold,
    }
}
