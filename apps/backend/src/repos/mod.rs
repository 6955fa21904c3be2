//! Persistence interface and domain models for the ownership data.

pub mod ownership;
