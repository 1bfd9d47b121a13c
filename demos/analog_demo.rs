//! Potentiometer on A0 drives the LED on pin 9.
//!
//! Build for the target chip, e.g.
//! `cargo build --example analog_demo --target avr-atmega328p.json --release`

#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]

#[cfg(target_arch = "avr")]
use panic_halt as _;

#[cfg(target_arch = "avr")]
#[avr_device::entry]
fn main() -> ! {
    use md_analog::{analog_write, Adc, AnalogReference};

    let mut adc = Adc::new();
    adc.set_reference(AnalogReference::Default);

    loop {
        let sample = adc.read(14);
        // 10-bit sample down to an 8-bit duty
        analog_write(9, (sample >> 2) as u8);
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {}
