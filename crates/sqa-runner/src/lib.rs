pub mod config;
pub mod pipeline;
pub mod runner;

pub use config::*;
pub use pipeline::*;
pub use runner::*;
