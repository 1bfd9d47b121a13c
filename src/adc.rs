//! ADC sampling.

use core::convert::Infallible;

use crate::chip;
use crate::reference::{self, AnalogReference};

/// The analog-to-digital converter.
///
/// One conversion engine is shared by all mux inputs; callers in
/// different execution contexts must serialize access themselves (the
/// conversion registers carry no interlock).
pub struct Adc {
    _private: (),
}

impl Adc {
    /// Enable the converter with the idle clock (div128, 125kHz @ 16MHz).
    pub fn new() -> Self {
        chip::ADCSRA.write(chip::ADEN | chip::ADPS_DIV128);
        chip::ADMUX.write(reference::current().refs_bits() << 6);
        Self { _private: () }
    }

    /// Select the reference source for all following conversions.
    ///
    /// Reprograms the calibration hardware immediately where the chip
    /// has any; never starts a conversion. Safe to call repeatedly.
    pub fn set_reference(&mut self, mode: AnalogReference) {
        reference::select(mode);
    }

    /// Sample a pin, blocking until the conversion chain finishes.
    ///
    /// `pin` is a logical pin number; values below the first analog
    /// pin are taken as raw mux channel ids.
    pub fn read(&mut self, pin: u8) -> u16 {
        select_channel(pin);
        setup_clock();
        sample_selected()
    }

    /// Sample the pin `samples` times and return the accumulated sum
    /// divided by `divisor`.
    ///
    /// With `divisor == samples` this is a plain average; a larger
    /// divisor folds a scaling shift into the same division. The
    /// accumulator is 32 bits wide, which any `u16` sample count fits
    /// by construction.
    pub fn read_averaged(&mut self, pin: u8, samples: u16, divisor: u16) -> u16 {
        select_channel(pin);
        setup_clock();
        oversample(samples, divisor)
    }

    /// Begin a conversion without waiting for it.
    pub fn start(&mut self, pin: u8) {
        select_channel(pin);
        setup_clock();
        chip::ADCSRA.set_bits(chip::ADSC);
    }

    /// Collect the conversion begun with [`Adc::start`].
    ///
    /// Returns the raw single sample; the per-chip read conditioning
    /// (differential averaging, oversampling) only applies to
    /// [`Adc::read`].
    pub fn poll(&mut self) -> nb::Result<u16, Infallible> {
        if chip::ADCSRA.bit_is_set(chip::ADSC) {
            return Err(nb::Error::WouldBlock);
        }
        let low = chip::ADCL.read();
        let high = chip::ADCH.read();
        Ok(u16::from(high) << 8 | u16::from(low))
    }
}

impl Default for Adc {
    fn default() -> Self {
        Self::new()
    }
}

/// One hardware conversion on the currently selected channel.
fn convert_once() -> u16 {
    // start the conversion; ADSC clears when it finishes
    chip::ADCSRA.set_bits(chip::ADSC);
    while chip::ADCSRA.bit_is_set(chip::ADSC) {}

    // ADCL must be read first; the low read locks ADCH until it is
    // collected, so the pair always belongs to one conversion.
    let low = chip::ADCL.read();
    let high = chip::ADCH.read();
    u16::from(high) << 8 | u16::from(low)
}

fn oversample(samples: u16, divisor: u16) -> u16 {
    debug_assert!(divisor != 0);

    let mut sum: u32 = 0;
    for _ in 0..samples {
        sum += u32::from(convert_once());
    }
    (sum / u32::from(divisor)) as u16
}

/// Route `pin` to the conversion mux and refresh the reference bits.
fn select_channel(pin: u8) {
    #[cfg(feature = "md328p")]
    {
        // Internal 1/5-Vcc divider monitor inputs ride on ADCSRD.
        chip::ADCSRD.clear_bits(0x0F);
        if pin == chip::V5D1 || pin == chip::V5D4 {
            chip::ADCSRD.set_bits(0x06);
        }
    }

    let channel = chip::pin_to_channel(pin);

    #[cfg(feature = "md328p")]
    {
        // Mux inputs 8..=15 sit behind the extension bit.
        chip::ADCSRB.modify(|v| {
            if channel & 0x08 != 0 {
                v | chip::MUX5
            } else {
                v & !chip::MUX5
            }
        });
    }

    chip::ADMUX.write(reference::current().refs_bits() << 6 | (channel & chip::MUX_MASK));
}

#[cfg(any(feature = "md328p", feature = "md328d"))]
fn setup_clock() {
    // conversion clock fosc/8; the slower enable-time default is only
    // kept between reads
    chip::ADCSRA.modify(|v| (v & !chip::ADPS_MASK) | chip::ADPS_DIV8);
}

#[cfg(feature = "md8f")]
fn setup_clock() {}

/// MD328P: the front end is differential. Sample the negative input,
/// then the positive, take their mean, and fold out the measured
/// amplifier gain error. The correction never applies to the
/// oversampled entry points.
#[cfg(feature = "md328p")]
fn sample_selected() -> u16 {
    chip::ADCSRC.set_bits(chip::SPN);
    let negative = convert_once();
    chip::ADCSRC.clear_bits(chip::SPN);
    let positive = convert_once();

    let mut value = ((u32::from(positive) + u32::from(negative)) >> 1) as u16;
    value -= value >> chip::GAIN_SHIFT;
    value
}

/// MD328D: reads are oversampled; sixteen conversions divided by 64
/// average and rescale in one step. No gain correction on this path.
#[cfg(feature = "md328d")]
fn sample_selected() -> u16 {
    oversample(
        crate::config::ADC_OVERSAMPLE_COUNT,
        crate::config::ADC_OVERSAMPLE_DIV,
    )
}

/// MD8F: one conversion, returned as-is.
#[cfg(feature = "md8f")]
fn sample_selected() -> u16 {
    convert_once()
}
