//! Veilswap state accounts

pub mod batch_pool;
pub mod intent;
pub mod margin;
pub mod market;
pub mod pool_key;
pub mod protocol_config;
pub mod registry;
pub mod reveal_store;
pub mod verification_key;

pub use batch_pool::*;
pub use intent::*;
pub use margin::*;
pub use market::*;
pub use pool_key::*;
pub use protocol_config::*;
pub use registry::*;
pub use reveal_store::*;
pub use verification_key::*;
