//! One module per subcommand.

pub mod add;
pub mod completions;
pub mod list;
