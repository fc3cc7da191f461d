//! Deterministic fumble rolls for attacks made with damaged limbs

use crate::core::types::{roll_seed, NetId, Tick};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Attack kinds that can be fumbled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatAction {
    Melee,
    Ranged,
}

impl CombatAction {
    /// Localization key narrated on a fumble
    pub fn fumble_popup(&self) -> &'static str {
        match self {
            CombatAction::Melee => "fumble-melee",
            CombatAction::Ranged => "fumble-ranged",
        }
    }
}

/// Roll against `chance`. The same tick and id always give the same answer.
pub fn fumble_roll(tick: Tick, net_id: NetId, chance: f32) -> bool {
    if chance <= 0.0 {
        return false;
    }
    if chance >= 1.0 {
        return true;
    }
    let mut rng = ChaCha8Rng::seed_from_u64(roll_seed(tick, net_id));
    rng.gen::<f32>() < chance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_inputs_same_outcome() {
        let id = NetId::from_u128(0xDEAD_BEEF);
        for tick in 0..200 {
            assert_eq!(fumble_roll(tick, id, 0.25), fumble_roll(tick, id, 0.25));
        }
    }

    #[test]
    fn test_bounds() {
        let id = NetId::from_u128(7);
        assert!(!fumble_roll(3, id, 0.0));
        assert!(fumble_roll(3, id, 1.0));
    }

    #[test]
    fn test_rate_roughly_matches_chance() {
        let id = NetId::from_u128(42);
        let hits = (0..4000).filter(|tick| fumble_roll(*tick, id, 0.25)).count();
        assert!((700..1300).contains(&hits), "hits = {}", hits);
    }
}
