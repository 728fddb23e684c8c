//! Scoring
//!
//! Decides which of two actors is older and tracks the current and best
//! streak.

use std::cmp::Ordering;


use crate::components::{Actor, ActorId};

/// Which card holds the older actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    First,
    Second,
    /// Same birth date: any pick counts
    Tie,
}

/// Compare by displayed age (age at death for the deceased); equal ages
/// fall back to the earlier birth date.
pub fn older_of(first: &Actor, second: &Actor) -> Verdict {
    let by_age = first.age.cmp(&second.age);
    let ordering = if by_age == Ordering::Equal {
        // earlier birthday is older
        second.birthday.cmp(&first.birthday)
    } else {
        by_age
    };

    match ordering {
        Ordering::Greater => Verdict::First,
        Ordering::Less => Verdict::Second,
        Ordering::Equal => Verdict::Tie,
    }
}

/// Whether picking `chosen` is a correct answer for the pair
pub fn is_correct(first: &Actor, second: &Actor, chosen: ActorId) -> bool {
    match older_of(first, second) {
        Verdict::First => chosen == first.id,
        Verdict::Second => chosen == second.id,
        Verdict::Tie => chosen == first.id || chosen == second.id,
    }
}

// ============================================================================
// Streak
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Streak {
    current: u32,
    best: u32,
    new_high: bool,
}

impl Streak {
    pub fn with_best(best: u32) -> Self {
        Self { best, ..Self::default() }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// The best streak was beaten during the current run
    pub fn is_new_high(&self) -> bool {
        self.new_high
    }

    /// Count a correct guess. Returns `true` when the best streak grew and
    /// needs saving.
    pub fn record_correct(&mut self) -> bool {
        self.current += 1;
        if self.current > self.best {
            self.best = self.current;
            self.new_high = true;
            return true;
        }
        false
    }

    /// End the run on a miss, returning the streak that was lost
    pub fn record_miss(&mut self) -> u32 {
        std::mem::take(&mut self.current)
    }

    pub fn clear_new_high(&mut self) {
        self.new_high = false;
    }

    pub fn reset_run(&mut self) {
        self.current = 0;
        self.new_high = false;
    }
}
