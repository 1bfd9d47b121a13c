//! Analog input and output for the MD-series microcontrollers.
//!
//! This crate is the analog half of the MD pin-subsystem board support
//! layer. It translates a logical pin number and a desired reference
//! voltage or duty value into the register sequences of the chip
//! variant compiled against: ADC channel selection and sampling on the
//! input side, timer/comparator (or DAC) duty programming on the
//! output side.
//!
//! The target chip is selected at build time through a cargo feature.
//! Exactly one of `md328p`, `md328d` or `md8f` must be enabled;
//! `md328p` is the default.
//!
//! On non-AVR builds the register layer is backed by the simulator in
//! [`sim`], which stands in for the silicon so the driver logic can be
//! exercised on the host.

#![no_std]

#[cfg(not(any(feature = "md328p", feature = "md328d", feature = "md8f")))]
compile_error!(
    "select a target chip: enable exactly one of the `md328p`, `md328d` or `md8f` features"
);

#[cfg(any(
    all(feature = "md328p", feature = "md328d"),
    all(feature = "md328p", feature = "md8f"),
    all(feature = "md328d", feature = "md8f"),
))]
compile_error!("chip features are mutually exclusive: enable only one of `md328p`, `md328d`, `md8f`");

mod adc;
mod chip;
pub mod config;
pub mod digital;
mod pwm;
mod reference;
mod regs;
#[cfg(not(target_arch = "avr"))]
pub mod sim;

pub use adc::Adc;
pub use pwm::{analog_write, DutyPin, TimerChannel};
pub use reference::AnalogReference;
