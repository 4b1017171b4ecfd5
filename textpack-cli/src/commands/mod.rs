//! Command implementations for the textpack CLI.

pub mod lookup;
pub mod lua;
pub mod pack;
pub mod stats;

pub use lookup::cmd_lookup;
pub use lua::cmd_lua;
pub use pack::cmd_pack;
pub use stats::cmd_stats;
