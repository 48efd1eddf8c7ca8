// src/agents/mod.rs

pub mod expectations;
pub mod trader;
