pub mod emit;
pub mod report;
pub mod store;

pub use emit::*;
pub use report::*;
pub use store::*;
