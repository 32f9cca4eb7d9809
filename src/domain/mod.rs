//! Domain layer - pool lookup, supply/price derivation and swap execution

pub mod execution;
pub mod pool;
pub mod supply;
