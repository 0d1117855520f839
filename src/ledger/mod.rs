//! Trader balances for the two currencies of the pair.
//!
//! The ledger knows nothing about orders. It exposes reads
//! ([`Ledger::available`]) and mutations ([`Ledger::credit`],
//! [`Ledger::debit`], [`Ledger::settle`]) and is owned by the matching
//! session rather than being process-wide state.

mod account;
mod accounts;

pub use account::{AccountBalance, Balances};
pub use accounts::Ledger;
