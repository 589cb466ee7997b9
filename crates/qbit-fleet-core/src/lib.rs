pub mod config;
pub mod logging;

pub mod classify;
pub mod controller;
pub mod engine;
pub mod item;
pub mod priority;
pub mod supervisor;
