//! Interactive front end: option prompts, stage progress and the final summary
//!
//! Compiled only with the `tui` feature; the parent module gates it.

mod prompts;

pub use prompts::{run, CreateArgs};
