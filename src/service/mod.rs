//! Service layer: the shared client pool.
//!
//! [`PoolCoordinator`] serializes every cache mutation behind one lock and
//! delegates connection setup to a [`crate::transport::ClientFactory`].

pub mod pool_coordinator;

pub use pool_coordinator::PoolCoordinator;
