//! Adaptive roulette-wheel operator selector. Generic over any
//! small `Copy + Eq` operator-kind enum so the same implementation backs
//! both the destroy and the repair family.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::constant::{
    REWARD_IMPROVING, REWARD_LATERAL, REWARD_NONE, SELECTOR_DECAY, SELECTOR_WEIGHT_FLOOR,
};

#[derive(Debug, Clone, Copy)]
struct OperatorState {
    weight: f64,
    score: f64,
}

/// Adaptive selector over a fixed, closed set of operator variants.
/// Weights start at 1.0; `update` is expected to run once per ALNS
/// iteration, not batched over segments.
#[derive(Debug, Clone)]
pub struct AdaptiveSelector<K> {
    operators: Vec<K>,
    state: Vec<OperatorState>,
}

impl<K: Copy + PartialEq> AdaptiveSelector<K> {
    pub fn new(operators: &[K]) -> Self {
        AdaptiveSelector {
            operators: operators.to_vec(),
            state: vec![OperatorState { weight: 1.0, score: 0.0 }; operators.len()],
        }
    }

    fn index_of(&self, op: K) -> usize {
        self.operators
            .iter()
            .position(|&o| o == op)
            .expect("operator must be a member of this selector's closed set")
    }

    /// Draws an operator with probability proportional to its current
    /// weight (roulette wheel over a uniform draw in `[0, sum_weights)`).
    pub fn select(&self, rng: &mut ChaCha8Rng) -> K {
        let total: f64 = self.state.iter().map(|s| s.weight).sum();
        let mut draw = rng.gen::<f64>() * total;
        for (i, state) in self.state.iter().enumerate() {
            draw -= state.weight;
            if draw <= 0.0 {
                return self.operators[i];
            }
        }
        *self.operators.last().expect("non-empty operator set")
    }

    /// Adds reward for `op`: 5 for an improving move (`delta < 0`), 1 for
    /// a lateral move (`delta == 0`), 0 otherwise.
    pub fn reward(&mut self, op: K, delta: f64) {
        let idx = self.index_of(op);
        self.state[idx].score += if delta < 0.0 {
            REWARD_IMPROVING
        } else if delta == 0.0 {
            REWARD_LATERAL
        } else {
            REWARD_NONE
        };
    }

    /// `weight := max(floor, decay*weight + (1-decay)*score)`, then
    /// resets score to 0. Called every iteration.
    pub fn update(&mut self) {
        for state in &mut self.state {
            state.weight =
                (SELECTOR_DECAY * state.weight + (1.0 - SELECTOR_DECAY) * state.score)
                    .max(SELECTOR_WEIGHT_FLOOR);
            state.score = 0.0;
        }
    }

    #[cfg(test)]
    pub fn weight_of(&self, op: K) -> f64 {
        self.state[self.index_of(op)].weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Op {
        A,
        B,
    }

    #[test]
    fn select_returns_a_member_of_the_set() {
        let selector = AdaptiveSelector::new(&[Op::A, Op::B]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            let picked = selector.select(&mut rng);
            assert!(picked == Op::A || picked == Op::B);
        }
    }

    #[test]
    fn rewarding_improving_moves_increases_relative_weight() {
        let mut selector = AdaptiveSelector::new(&[Op::A, Op::B]);
        for _ in 0..10 {
            selector.reward(Op::A, -1.0);
            selector.update();
        }
        assert!(selector.weight_of(Op::A) > selector.weight_of(Op::B));
    }

    #[test]
    fn weight_never_drops_below_floor() {
        let mut selector = AdaptiveSelector::new(&[Op::A, Op::B]);
        for _ in 0..50 {
            selector.reward(Op::A, 1.0); // non-improving, no reward
            selector.update();
        }
        assert!(selector.weight_of(Op::A) >= SELECTOR_WEIGHT_FLOOR - 1e-9);
    }
}
