//! Anatomy Sim - organ damage routing and wound state engine

pub mod anatomy;
pub mod bone;
pub mod content;
pub mod core;
pub mod damage;
pub mod ecs;
pub mod events;
pub mod integrity;
pub mod medical;
pub mod trauma;
