//! Medical scanner readouts

pub mod scanner;

pub use scanner::{BoneReadout, MedicalReadout, OrganReadout, TraumaReadout};
