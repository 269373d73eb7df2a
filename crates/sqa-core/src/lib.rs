//! Shared models, stage seams and the error taxonomy for the story QA pipeline.

pub mod error;
pub mod model;
pub mod stages;
pub mod state;

mod util;

pub use error::*;
pub use model::*;
pub use stages::*;
pub use state::*;
pub use util::new_run_id;
