//! Command implementations for the HALO CLI.

pub mod dump;
pub mod info;
pub mod list;
pub mod repack;

pub use dump::cmd_dump;
pub use info::cmd_info;
pub use list::cmd_list;
pub use repack::cmd_repack;
pub use test::cmd_test;
