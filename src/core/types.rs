//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Arena index for bodies and organs.
///
/// Bodies and organs share one id space so damage can target either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Stable network identity of an entity
///
/// Identical on server and predicting clients, so it is safe to seed
/// deterministic rolls from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetId(pub Uuid);

impl NetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// Fold the 128-bit id into a 64-bit seed component
    pub fn seed_bits(&self) -> u64 {
        let value = self.0.as_u128();
        (value as u64) ^ ((value >> 64) as u64)
    }
}

impl Default for NetId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier for a bone record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoneId(pub u32);

/// Identifier for a trauma record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TraumaId(pub u32);

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Seed for a deterministic roll derived from the tick and a stable entity id.
///
/// SplitMix64 finalizer so neighbouring ticks give unrelated seeds.
pub fn roll_seed(tick: Tick, net_id: NetId) -> u64 {
    let mut z = tick
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(net_id.seed_bits());
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_equality() {
        assert_eq!(EntityId(1), EntityId::new(1));
        assert_ne!(EntityId(1), EntityId(2));
    }

    #[test]
    fn test_net_id_seed_bits_stable() {
        let id = NetId::from_u128(0xDEAD_BEEF_0000_0001_0000_0000_0000_0002);
        assert_eq!(id.seed_bits(), id.seed_bits());
        assert_eq!(id.seed_bits(), 0xDEAD_BEEF_0000_0001 ^ 0x2);
    }

    #[test]
    fn test_roll_seed_deterministic() {
        let id = NetId::from_u128(42);
        assert_eq!(roll_seed(100, id), roll_seed(100, id));
        assert_ne!(roll_seed(100, id), roll_seed(101, id));
        assert_ne!(roll_seed(100, id), roll_seed(100, NetId::from_u128(43)));
    }
}
