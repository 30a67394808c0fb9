//! CLI subcommand implementations.

pub mod events;
pub mod next;
pub mod summary;
pub mod util;
