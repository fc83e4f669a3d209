pub mod arguments;
pub mod config;

pub use arguments::Arguments;
pub use config::Config;
