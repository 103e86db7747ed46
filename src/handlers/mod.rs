// src/handlers/mod.rs

pub mod content;
pub mod generation;
pub mod quiz;
pub mod session;
