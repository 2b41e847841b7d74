mod fetch;
mod root;

pub use root::Cli;
