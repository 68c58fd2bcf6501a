// src/debug/mod.rs

// Statische Debug-Ausgaben (keine interaktive Visualisierung)
pub mod svg;

pub use self::svg::write_cell_svg;
