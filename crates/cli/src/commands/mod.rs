//! Subcommand implementations.

pub mod account;
pub mod checkout;
pub mod products;
