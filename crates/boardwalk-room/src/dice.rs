//! Dice: where a roll's two numbers come from.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

/// A source of dice pairs.
///
/// Shared by every room actor, hence `Send + Sync`.
pub trait Dice: Send + Sync + 'static {
    /// Rolls two dice, each in `1..=6`.
    fn roll(&self) -> [u8; 2];
}

/// Two fair six-sided dice backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDice;

impl Dice for RandomDice {
    fn roll(&self) -> [u8; 2] {
        let mut rng = rand::rng();
        [rng.random_range(1..=6), rng.random_range(1..=6)]
    }
}

/// Dice that replay a fixed sequence of pairs, cycling when exhausted.
///
/// For tests and demos that need a predictable game.
#[derive(Debug)]
pub struct LoadedDice {
    rolls: Vec<[u8; 2]>,
    next: AtomicUsize,
}

impl LoadedDice {
    /// # Panics
    /// If `rolls` is empty.
    pub fn new(rolls: Vec<[u8; 2]>) -> Self {
        assert!(!rolls.is_empty(), "loaded dice need at least one roll");
        Self {
            rolls,
            next: AtomicUsize::new(0),
        }
    }
}

impl Dice for LoadedDice {
    fn roll(&self) -> [u8; 2] {
        let i = self.next.fetch_add(1, Ordering::Relaxed);
        self.rolls[i % self.rolls.len()]
    }
}
