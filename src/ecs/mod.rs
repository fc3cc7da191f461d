//! World storage for the anatomy core

pub mod world;

pub use world::AnatomyWorld;
