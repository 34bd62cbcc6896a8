pub mod card;
pub mod game;
pub mod policy;
pub mod rng;
pub mod simulation;
