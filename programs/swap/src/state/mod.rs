pub mod config;
pub mod offer;
pub mod taker_whitelist;

pub use config::*;
pub use offer::*;
pub use taker_whitelist::*;
