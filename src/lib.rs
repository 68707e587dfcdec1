//! Antimicrobial susceptibility panel.
//!
//! Loads a semicolon table of isolate results, filters it by unit, month and
//! organism, and turns the filtered rows into per-antibiotic
//! Susceptible / Intermediate / Resistant percentages.

pub mod app;
pub mod color;
pub mod data;
pub mod report;
pub mod state;
pub mod ui;
