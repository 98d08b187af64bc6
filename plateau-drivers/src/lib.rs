//! Hardware driver implementations
//!
//! Bit-banged drivers for the panel hardware of the plate calculator:
//!
//! - HD44780 character LCD in 4-bit bus mode
//! - 4x4 matrix keypad scanner
//!
//! Drivers are written against the pin traits in [`gpio`] plus
//! [`embedded_hal::delay::DelayNs`], so the same driver code runs on
//! the RP2040 firmware and under host-side mocks in tests.

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod keypad;
pub mod lcd;
