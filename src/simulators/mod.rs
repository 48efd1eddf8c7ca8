// src/simulators/mod.rs

pub mod fundamental;
pub mod order_book;
