// ./src/lib.rs

// Eigene Module deklarieren
pub mod debug;
pub mod io;
pub mod math;
pub mod partition;
