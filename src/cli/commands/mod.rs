pub mod build;
mod command_result;
pub mod export;
pub mod hashes;
pub mod import;
pub mod init;
pub mod migrate;
pub mod update;

pub use command_result::*;
