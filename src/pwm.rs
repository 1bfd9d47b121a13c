//! Duty-cycle output.
//!
//! Maps a logical pin to the timer comparator (or DAC channel) wired
//! to it and programs the duty value. Pins without PWM hardware fall
//! back to a coarse digital approximation.

use crate::chip;
use crate::digital::{self, Level, Mode};

/// The output-compare hardware behind a pin. Channels a chip does not
/// wire are compiled out with it.
#[derive(ufmt::derive::uDebug, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerChannel {
    /// No PWM hardware on this pin
    None,
    Timer0A,
    Timer0B,
    Timer1A,
    Timer1B,
    Timer2A,
    Timer2B,
    #[cfg(any(feature = "md328p", feature = "md328d"))]
    Dac0,
    #[cfg(feature = "md328d")]
    Dac1,
}

/// Drive `pin` with a duty value.
///
/// `0` and `255` drive the pin digitally instead of programming an
/// endpoint duty cycle, which some of the timer hardware renders with
/// glitches. The pin is forced into output mode first, so callers do
/// not need a separate mode call for analog output pins. DAC outputs
/// are output-only in hardware and skip both; their duty register
/// takes every value, endpoints included.
pub fn analog_write(pin: u8, value: u8) {
    if !chip::is_dac_output(pin) {
        digital::pin_mode(pin, Mode::Output);

        if value == 0 {
            digital::write(pin, Level::Low);
            return;
        }
        if value == 255 {
            digital::write(pin, Level::High);
            return;
        }
    }

    match chip::pin_to_timer(pin) {
        TimerChannel::Timer0A => {
            // connect pwm to pin on timer 0, channel A
            chip::TCCR0A.set_bits(chip::COM0A1);
            chip::OCR0A.write(value);
        }
        TimerChannel::Timer0B => {
            chip::TCCR0A.set_bits(chip::COM0B1);
            chip::OCR0B.write(value);
        }
        TimerChannel::Timer1A => {
            chip::TCCR1A.set_bits(chip::COM1A1);
            chip::OCR1A.write(u16::from(value));
        }
        TimerChannel::Timer1B => {
            chip::TCCR1A.set_bits(chip::COM1B1);
            chip::OCR1B.write(u16::from(value));
        }
        TimerChannel::Timer2A => {
            chip::TCCR2A.set_bits(chip::COM2A1);
            chip::OCR2A.write(value);
        }
        TimerChannel::Timer2B => {
            chip::TCCR2A.set_bits(chip::COM2B1);
            chip::OCR2B.write(value);
        }
        #[cfg(any(feature = "md328p", feature = "md328d"))]
        TimerChannel::Dac0 => chip::DAL0.write(value),
        #[cfg(feature = "md328d")]
        TimerChannel::Dac1 => chip::DAL1.write(value),
        TimerChannel::None => {
            if value < 128 {
                digital::write(pin, Level::Low);
            } else {
                digital::write(pin, Level::High);
            }
        }
    }
}

/// Disconnect the comparator (or mute the DAC) behind `pin`.
fn disconnect(pin: u8) {
    match chip::pin_to_timer(pin) {
        TimerChannel::Timer0A => chip::TCCR0A.clear_bits(chip::COM0A1),
        TimerChannel::Timer0B => chip::TCCR0A.clear_bits(chip::COM0B1),
        TimerChannel::Timer1A => chip::TCCR1A.clear_bits(chip::COM1A1),
        TimerChannel::Timer1B => chip::TCCR1A.clear_bits(chip::COM1B1),
        TimerChannel::Timer2A => chip::TCCR2A.clear_bits(chip::COM2A1),
        TimerChannel::Timer2B => chip::TCCR2A.clear_bits(chip::COM2B1),
        #[cfg(any(feature = "md328p", feature = "md328d"))]
        TimerChannel::Dac0 => chip::DAL0.write(0),
        #[cfg(feature = "md328d")]
        TimerChannel::Dac1 => chip::DAL1.write(0),
        TimerChannel::None => {}
    }
}

/// An `embedded-hal` duty-cycle handle for one pin.
pub struct DutyPin {
    pin: u8,
    duty: u8,
}

impl DutyPin {
    pub fn new(pin: u8) -> Self {
        Self { pin, duty: 0 }
    }
}

impl embedded_hal::PwmPin for DutyPin {
    type Duty = u8;

    fn disable(&mut self) {
        disconnect(self.pin);
        if !chip::is_dac_output(self.pin) {
            digital::write(self.pin, Level::Low);
        }
    }

    fn enable(&mut self) {
        analog_write(self.pin, self.duty);
    }

    fn get_duty(&self) -> u8 {
        self.duty
    }

    fn get_max_duty(&self) -> u8 {
        255
    }

    fn set_duty(&mut self, duty: u8) {
        self.duty = duty;
        analog_write(self.pin, duty);
    }
}
