//! Hardware-agnostic core logic for the plate calculator
//!
//! Everything that does not touch pins lives here:
//!
//! - Unit conversion and fixed-point weight arithmetic
//! - The plate calculation engine
//! - Configuration schema, defaults and the store contract
//! - The configuration menu tree
//! - The UI state machine and its runtime loop
//! - The interaction surface trait the front panels implement
//!
//! The firmware and the desktop simulator both wire their hardware into
//! the [`traits::Surface`] and [`traits::ConfigStore`] contracts and hand
//! control to [`state::run`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod calc;
pub mod config;
pub mod keys;
pub mod menu;
pub mod state;
pub mod traits;
pub mod units;
