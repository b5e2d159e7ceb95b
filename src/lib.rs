// Library surface for headless/integration tests and the kombo binary.
// Keep this lean to avoid coupling to bin-only flow in main.rs.
pub mod drill;
pub mod error;
pub mod generator;
pub mod level;
pub mod runtime;
pub mod sink;
pub mod ui;
