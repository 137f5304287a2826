pub mod runner;

pub use runner::BoardEngine;
