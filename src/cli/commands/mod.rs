//! One module per subcommand.

pub mod delete;
pub mod get;
pub mod list;
pub mod set;
