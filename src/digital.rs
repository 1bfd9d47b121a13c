//! Minimal digital-pin collaborator.
//!
//! The duty dispatcher needs to force pins into output mode and drive
//! the endpoint levels; this is the DDR/PORT shim it calls into. The
//! full digital abstraction lives a layer above this crate.

use crate::chip;

#[derive(ufmt::derive::uDebug, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

#[derive(ufmt::derive::uDebug, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Input,
    Output,
}

/// Configure the pin direction. Input mode also drops the pull-up.
pub fn pin_mode(pin: u8, mode: Mode) {
    if let Some((ddr, port, mask)) = chip::pin_port(pin) {
        match mode {
            Mode::Output => ddr.set_bits(mask),
            Mode::Input => {
                ddr.clear_bits(mask);
                port.clear_bits(mask);
            }
        }
    }
}

/// Drive the pin to a level.
pub fn write(pin: u8, level: Level) {
    if let Some((_, port, mask)) = chip::pin_port(pin) {
        match level {
            Level::High => port.set_bits(mask),
            Level::Low => port.clear_bits(mask),
        }
    }
}
