//! Core HPO types

mod bounds;
mod space;
mod strategy;
mod trial;


pub use bounds::Bounds;
pub use space::{Candidate, SearchSpace};
pub use strategy::{AcquisitionFunction, Exploration, SurrogateModel};
pub use trial::{Trial, TrialPhase, TrialStatus};
