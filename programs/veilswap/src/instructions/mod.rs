//! Veilswap instructions

pub mod admin;
pub mod batch;
pub mod commit;
pub mod pool;
pub mod reveal;
pub mod perps;

pub use admin::*;
pub use batch::*;
pub use commit::*;
pub use pool::*;
pub use reveal::*;
pub use perps::*;
