// src/core/mod.rs

//! The resolution engine.

pub mod apply;
pub mod classifier;
pub mod controller;
pub mod options;
pub mod patch;
pub mod settle;
