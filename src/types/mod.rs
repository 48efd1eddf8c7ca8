// src/types/mod.rs

pub mod order;
