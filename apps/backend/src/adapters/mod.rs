//! Concrete `OwnershipStore` implementations.

pub mod ownership_memory;
pub mod ownership_sea;
