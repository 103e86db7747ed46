// src/models/mod.rs

pub mod exercise;
pub mod generation;
pub mod question;
pub mod score;
pub mod session;
