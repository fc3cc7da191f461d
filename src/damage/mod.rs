//! Damage: specifiers, resistance sets and the router
//!
//! Every damage or heal event funnels through `DamageRouter::apply_damage`.
//! Callers never write organ integrity directly.

pub mod apply;
pub mod modifiers;
pub mod router;
pub mod specifier;

pub use apply::apply_capped;
pub use modifiers::DamageModifierSet;
pub use router::{DamageOptions, DamageRouter, SplitDamageBehavior};
pub use specifier::{DamageSpecifier, DamageType};
