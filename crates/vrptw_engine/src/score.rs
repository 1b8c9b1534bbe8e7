use std::{
    iter,
    ops::{Add, AddAssign},
};

use serde::Serialize;

/// Lexicographic score: any hard violation outweighs all soft cost.
///
/// `hard_score` counts constraint violations (unassigned clients, broken
/// routes, vehicles over the fleet size), `soft_score` is the travelled
/// distance in model units.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Score {
    pub hard_score: i64,
    pub soft_score: i64,
}

impl Score {
    pub const MAX: Score = Score {
        hard_score: i64::MAX,
        soft_score: i64::MAX,
    };

    pub const ZERO: Score = Score {
        hard_score: 0,
        soft_score: 0,
    };

    pub fn new(hard_score: i64, soft_score: i64) -> Self {
        Score {
            hard_score,
            soft_score,
        }
    }

    pub fn hard(hard_score: i64) -> Self {
        Score {
            hard_score,
            soft_score: 0,
        }
    }

    pub fn soft(soft_score: i64) -> Self {
        Score {
            hard_score: 0,
            soft_score,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.hard_score > 0
    }
}

impl iter::Sum for Score {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Score::ZERO, |acc, score| acc + score)
    }
}

impl Add<Score> for Score {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Score {
            hard_score: self.hard_score + other.hard_score,
            soft_score: self.soft_score + other.soft_score,
        }
    }
}

impl AddAssign<Score> for Score {
    fn add_assign(&mut self, other: Score) {
        self.hard_score += other.hard_score;
        self.soft_score += other.soft_score;
    }
}
