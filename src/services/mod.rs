// src/services/mod.rs

pub mod cache;
pub mod generation;
pub mod openai;
pub mod pdf;
pub mod presentation;
pub mod prompt;
pub mod scoring;
