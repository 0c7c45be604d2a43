//! Leveling formulas and reward sizing
//!
//! The level curve is quadratic: reaching level L costs `(L-1)^2 * 100` XP,
//! so `level(xp) = floor(sqrt(xp / 100)) + 1`. Both directions are total and
//! round-trip exactly: `level_from_experience(experience_for_level(L)) == L`.

use crate::domain::Difficulty;

/// Integer square root, exact for all u64 inputs.
///
/// `f64::sqrt` alone can land one off near perfect squares above 2^53.
fn isqrt(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let mut x = (n as f64).sqrt() as u64;
    while x.checked_mul(x).map(|sq| sq > n).unwrap_or(true) {
        x -= 1;
    }
    while (x + 1).checked_mul(x + 1).map(|sq| sq <= n).unwrap_or(false) {
        x += 1;
    }
    x
}

/// Level reached with the given lifetime XP. Monotonic; `0 XP` is level 1.
pub fn level_from_experience(xp: u64) -> u32 {
    (isqrt(xp / 100) + 1) as u32
}

/// Lifetime XP needed to reach a level (level 1 is free)
pub fn experience_for_level(level: u32) -> u64 {
    let steps = u64::from(level.saturating_sub(1));
    steps * steps * 100
}

/// XP still missing to cross the next integer level boundary
pub fn experience_to_next_level(xp: u64) -> u64 {
    experience_for_level(level_from_experience(xp) + 1) - xp
}

/// Difficulty tier for a newly generated mission, chosen from skill level
pub fn difficulty_for_skill_level(level: u32) -> Difficulty {
    match level {
        0..=2 => Difficulty::Easy,
        3..=5 => Difficulty::Medium,
        6..=9 => Difficulty::Hard,
        _ => Difficulty::Expert,
    }
}

/// Price a mission reward: base for the difficulty plus 10% per current
/// skill level, rounded down. `floor(base * (1 + level * 0.1))` in integer
/// arithmetic.
pub fn mission_reward(difficulty: Difficulty, skill_level: u32) -> u64 {
    let base = difficulty.base_reward();
    base * (10 + u64::from(skill_level)) / 10
}
