//! Intent reveal instructions

pub mod reveal_intent;
pub mod reveal_zk_intent;

pub use reveal_intent::*;
pub use reveal_zk_intent::*;
