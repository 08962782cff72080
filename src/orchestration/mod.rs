//! Coordination between the backend, the event log, and the engines.

pub mod scorekeeper;

pub use scorekeeper::Scorekeeper;
