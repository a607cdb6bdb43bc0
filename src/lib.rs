// src/lib.rs

pub mod config;
pub mod controller;
pub mod csv;
pub mod error;
pub mod file;
pub mod gui;
pub mod insight;
pub mod log;
pub mod model;
pub mod remote;
pub mod stats;
