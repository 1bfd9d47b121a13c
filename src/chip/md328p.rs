//! MD328P: ATmega328-compatible die with a differential ADC front end,
//! a 16-input multiplexer, an on-chip DAC and a calibrated internal
//! reference. All addresses are data-space.

use crate::pwm::TimerChannel;
use crate::regs::{Reg16, Reg8};

// ADC block
pub const ADCL_ADDR: u16 = 0x78;
pub const ADCH_ADDR: u16 = 0x79;
pub const ADCSRA_ADDR: u16 = 0x7A;
pub const ADCSRB_ADDR: u16 = 0x7B;
pub const ADMUX_ADDR: u16 = 0x7C;
// Extension registers, not present on the stock ATmega328
pub const ADCSRC_ADDR: u16 = 0xAD;
pub const ADCSRD_ADDR: u16 = 0xAE;
pub const DACON_ADDR: u16 = 0xE0;
pub const DAL0_ADDR: u16 = 0xE1;
pub const VCAL_ADDR: u16 = 0xE3;
pub const PMX2_ADDR: u16 = 0xF0;
pub const GPIOR0_ADDR: u16 = 0x3E;

pub(crate) const ADCL: Reg8 = Reg8::new(ADCL_ADDR);
pub(crate) const ADCH: Reg8 = Reg8::new(ADCH_ADDR);
pub(crate) const ADCSRA: Reg8 = Reg8::new(ADCSRA_ADDR);
pub(crate) const ADCSRB: Reg8 = Reg8::new(ADCSRB_ADDR);
pub(crate) const ADMUX: Reg8 = Reg8::new(ADMUX_ADDR);
pub(crate) const ADCSRC: Reg8 = Reg8::new(ADCSRC_ADDR);
pub(crate) const ADCSRD: Reg8 = Reg8::new(ADCSRD_ADDR);
pub(crate) const DACON: Reg8 = Reg8::new(DACON_ADDR);
pub(crate) const DAL0: Reg8 = Reg8::new(DAL0_ADDR);
pub(crate) const VCAL: Reg8 = Reg8::new(VCAL_ADDR);
pub(crate) const PMX2: Reg8 = Reg8::new(PMX2_ADDR);
pub(crate) const GPIOR0: Reg8 = Reg8::new(GPIOR0_ADDR);

// ADCSRA bits
pub const ADEN: u8 = 0x80;
pub const ADSC: u8 = 0x40;
pub const ADPS_MASK: u8 = 0x07;
pub const ADPS_DIV128: u8 = 0x07;
pub const ADPS_DIV8: u8 = 0x03;

// Multiplexer. ADMUX carries the low three channel bits; inputs
// 8..=15 are reached through the extension bit in ADCSRB.
pub const MUX_MASK: u8 = 0x07;
pub const MUX5: u8 = 0x08;
/// Negative-input select in ADCSRC (differential front end)
pub const SPN: u8 = 0x20;
/// High-range select for the internal reference, in ADCSRD
pub const REFS2: u8 = 0x40;

// Timer comparator connect bits (TCCRnA)
pub const COM0A1: u8 = 0x80;
pub const COM0B1: u8 = 0x20;
pub const COM1A1: u8 = 0x80;
pub const COM1B1: u8 = 0x20;
pub const COM2A1: u8 = 0x80;
pub const COM2B1: u8 = 0x20;

pub const TCCR0A_ADDR: u16 = 0x44;
pub const OCR0A_ADDR: u16 = 0x47;
pub const OCR0B_ADDR: u16 = 0x48;
pub const TCCR1A_ADDR: u16 = 0x80;
pub const OCR1A_ADDR: u16 = 0x88;
pub const OCR1B_ADDR: u16 = 0x8A;
pub const TCCR2A_ADDR: u16 = 0xB0;
pub const OCR2A_ADDR: u16 = 0xB3;
pub const OCR2B_ADDR: u16 = 0xB4;

pub(crate) const TCCR0A: Reg8 = Reg8::new(TCCR0A_ADDR);
pub(crate) const OCR0A: Reg8 = Reg8::new(OCR0A_ADDR);
pub(crate) const OCR0B: Reg8 = Reg8::new(OCR0B_ADDR);
pub(crate) const TCCR1A: Reg8 = Reg8::new(TCCR1A_ADDR);
pub(crate) const OCR1A: Reg16 = Reg16::new(OCR1A_ADDR);
pub(crate) const OCR1B: Reg16 = Reg16::new(OCR1B_ADDR);
pub(crate) const TCCR2A: Reg8 = Reg8::new(TCCR2A_ADDR);
pub(crate) const OCR2A: Reg8 = Reg8::new(OCR2A_ADDR);
pub(crate) const OCR2B: Reg8 = Reg8::new(OCR2B_ADDR);

// Ports
pub const DDRB_ADDR: u16 = 0x24;
pub const PORTB_ADDR: u16 = 0x25;
pub const DDRC_ADDR: u16 = 0x27;
pub const PORTC_ADDR: u16 = 0x28;
pub const DDRD_ADDR: u16 = 0x2A;
pub const PORTD_ADDR: u16 = 0x2B;

pub(crate) const DDRB: Reg8 = Reg8::new(DDRB_ADDR);
pub(crate) const PORTB: Reg8 = Reg8::new(PORTB_ADDR);
pub(crate) const DDRC: Reg8 = Reg8::new(DDRC_ADDR);
pub(crate) const PORTC: Reg8 = Reg8::new(PORTC_ADDR);
pub(crate) const DDRD: Reg8 = Reg8::new(DDRD_ADDR);
pub(crate) const PORTD: Reg8 = Reg8::new(PORTD_ADDR);

/// Factory characterization words for the internal reference
pub const VCAL1: u8 = 0x4C; // 1.024 V
pub const VCAL2: u8 = 0x58; // 2.048 V
pub const VCAL3: u8 = 0x71; // 4.096 V

/// First analog pin in the logical numbering
pub const ANALOG_PIN_OFFSET: u8 = 14;

/// Internal 1/5-Vcc divider monitor inputs
pub const V5D1: u8 = 24;
pub const V5D4: u8 = 27;

/// ADC amplifier gain error, corrected as `v -= v >> GAIN_SHIFT`
pub const GAIN_SHIFT: u8 = 7;

const DAC0_PIN: u8 = 4;

pub(crate) fn pin_to_channel(pin: u8) -> u8 {
    // allow for channel or pin numbers
    if pin >= ANALOG_PIN_OFFSET {
        pin - ANALOG_PIN_OFFSET
    } else {
        pin
    }
}

pub(crate) fn pin_to_timer(pin: u8) -> TimerChannel {
    match pin {
        3 => TimerChannel::Timer2B,
        4 => TimerChannel::Dac0,
        5 => TimerChannel::Timer0B,
        6 => TimerChannel::Timer0A,
        9 => TimerChannel::Timer1A,
        10 => TimerChannel::Timer1B,
        11 => TimerChannel::Timer2A,
        _ => TimerChannel::None,
    }
}

/// DAC outputs have no digital driver behind them
pub(crate) fn is_dac_output(pin: u8) -> bool {
    pin == DAC0_PIN
}

pub(crate) fn pin_port(pin: u8) -> Option<(Reg8, Reg8, u8)> {
    match pin {
        0..=7 => Some((DDRD, PORTD, 1 << pin)),
        8..=13 => Some((DDRB, PORTB, 1 << (pin - 8))),
        14..=19 => Some((DDRC, PORTC, 1 << (pin - 14))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_numbering() {
        assert_eq!(pin_to_channel(14), 0);
        assert_eq!(pin_to_channel(19), 5);
        assert_eq!(pin_to_channel(22), 8);
        // raw channel ids pass through untouched
        assert_eq!(pin_to_channel(3), 3);
    }

    #[test]
    fn pwm_pin_table() {
        assert_eq!(pin_to_timer(6), TimerChannel::Timer0A);
        assert_eq!(pin_to_timer(9), TimerChannel::Timer1A);
        assert_eq!(pin_to_timer(4), TimerChannel::Dac0);
        assert_eq!(pin_to_timer(8), TimerChannel::None);
        assert!(is_dac_output(4));
        assert!(!is_dac_output(9));
    }
}
