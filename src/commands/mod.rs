pub mod common;
pub mod completions;
pub mod create;
pub mod finalize;
pub mod list;
pub mod preview;
pub mod status;
pub mod switch;
