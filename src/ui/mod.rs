//! Terminal output.
//!
//! # Modules
//!
//! - [`display`]: result lines and the share inspection table
//! - [`progress`]: progress bar for group generation

pub mod display;
pub mod progress;

pub use display::{show_merge_success, show_share_info, show_split_success};
