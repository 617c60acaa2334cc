pub mod args;
mod structs;

pub use args::Cli;
pub use structs::*;
