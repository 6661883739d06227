pub mod accounts;
pub mod escrow;
pub mod fees;

pub use accounts::*;
pub use escrow::*;
pub use fees::*;
