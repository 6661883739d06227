pub mod admin;
pub mod cancel_offer;
pub mod create_offer;
pub mod expire_offer;
pub mod manage_takers;
pub mod take_offer;

pub use admin::*;
pub use cancel_offer::*;
pub use create_offer::*;
pub use expire_offer::*;
pub use manage_takers::*;
pub use take_offer::*;
