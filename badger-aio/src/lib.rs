// badger-aio/src/lib.rs
//! Blocking IO operations for badgerdrop (filesystem, json, process)

pub mod fs;
pub mod json_io;
pub mod process;

pub use json_io::{read_json_sync, write_json_sync};
pub use process::{run_command_sync, run_command_with_timeout};
