use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Anything that can throw a die for the roll animations.
pub trait RollSource {
    /// One die result in `1..=sides`.
    fn die(&mut self, sides: i32) -> i32;

    /// A full check total: `base + die`, where `base` already holds rating and luck.
    fn roll(&mut self, base: i32, sides: i32) -> i32 {
        base.saturating_add(self.die(sides))
    }
}

enum Source {
    Seeded(ChaCha8Rng),
    Scripted { values: Vec<i32>, cursor: usize },
}

pub struct Dice {
    source: Source,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Replays `values` in order, wrapping around. Each value is clamped to
    /// `1..=sides` of the die being thrown.
    pub fn from_scripted(values: Vec<i32>) -> Self {
        Self {
            source: Source::Scripted { values, cursor: 0 },
        }
    }
}

impl RollSource for Dice {
    fn die(&mut self, sides: i32) -> i32 {
        let sides = sides.max(1);
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_range(1..=sides),
            Source::Scripted { values, cursor } => {
                if values.is_empty() {
                    return 1;
                }
                let value = values[*cursor % values.len()];
                *cursor += 1;
                value.clamp(1, sides)
            }
        }
    }
}
