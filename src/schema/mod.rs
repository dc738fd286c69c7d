//! Wire records exchanged between the trainer and the scorer.

pub mod action;
pub mod filled_entity;
pub mod score;
pub mod session;
