//! In-memory collaborator implementations.

mod mempool;
pub use mempool::InMemoryMempool;

mod bus;
pub use bus::InMemoryEventBus;

mod stubs;
pub use stubs::NoopFraudGossip;
