//! Reference-voltage selection.
//!
//! The selection is process-wide: it is stored once and applied to the
//! ADMUX reference bits at every conversion. On the variants with a
//! calibrated reference the setter also reprograms the calibration
//! word and reference source immediately; it never starts a
//! conversion.

use core::sync::atomic::{AtomicU8, Ordering};

/// Reference source for the ADC (and, where fitted, the DAC).
#[derive(ufmt::derive::uDebug, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AnalogReference {
    /// The AREF pin; the internal reference is switched off
    External = 0,
    /// The AVcc supply rail (power-on default)
    Default = 1,
    #[cfg(feature = "md328p")]
    Internal1V024 = 2,
    #[cfg(feature = "md328p")]
    Internal2V048 = 3,
    #[cfg(feature = "md328p")]
    Internal4V096 = 4,
    #[cfg(feature = "md328d")]
    Internal2V56 = 5,
    /// The bandgap reference
    #[cfg(feature = "md8f")]
    Internal = 6,
}

impl AnalogReference {
    /// REFS field of ADMUX. Every internal reference selects the
    /// bandgap input; the voltage is set by VCAL/REFS2, not here.
    pub(crate) fn refs_bits(self) -> u8 {
        match self {
            AnalogReference::External => 0,
            AnalogReference::Default => 1,
            _ => 3,
        }
    }

    fn from_bits(bits: u8) -> Self {
        match bits {
            0 => AnalogReference::External,
            #[cfg(feature = "md328p")]
            2 => AnalogReference::Internal1V024,
            #[cfg(feature = "md328p")]
            3 => AnalogReference::Internal2V048,
            #[cfg(feature = "md328p")]
            4 => AnalogReference::Internal4V096,
            #[cfg(feature = "md328d")]
            5 => AnalogReference::Internal2V56,
            #[cfg(feature = "md8f")]
            6 => AnalogReference::Internal,
            _ => AnalogReference::Default,
        }
    }
}

impl Default for AnalogReference {
    fn default() -> Self {
        AnalogReference::Default
    }
}

static REFERENCE: AtomicU8 = AtomicU8::new(AnalogReference::Default as u8);

pub(crate) fn current() -> AnalogReference {
    AnalogReference::from_bits(REFERENCE.load(Ordering::Relaxed))
}

#[cfg(not(target_arch = "avr"))]
pub(crate) fn reset_default() {
    REFERENCE.store(AnalogReference::Default as u8, Ordering::Relaxed);
}

/// Record the selection and program the reference hardware.
pub(crate) fn select(mode: AnalogReference) {
    REFERENCE.store(mode as u8, Ordering::Relaxed);
    program(mode);
}

#[cfg(feature = "md328p")]
fn program(mode: AnalogReference) {
    use crate::chip::{ADCSRD, ADMUX, DACON, GPIOR0, PMX2, REFS2, VCAL, VCAL1, VCAL2, VCAL3};
    use crate::regs::interrupt_free;

    match mode {
        AnalogReference::External => {
            DACON.modify(|v| (v & 0x0C) | 0x01);
            // AREF doubles as a pin-mux function; releasing it is a
            // timed unlock sequence, so the window must stay free of
            // interrupts.
            if PMX2.bit_is_set(0x02) {
                interrupt_free(|| {
                    GPIOR0.write(PMX2.read() & 0xFD);
                    PMX2.write(0x80);
                    PMX2.write(GPIOR0.read());
                });
            }
        }
        AnalogReference::Default => {
            DACON.modify(|v| v & 0x0C);
        }
        internal => {
            DACON.modify(|v| (v & 0x0C) | 0x02);
            ADCSRD.clear_bits(REFS2);
            match internal {
                AnalogReference::Internal2V048 => VCAL.write(VCAL2),
                AnalogReference::Internal4V096 => {
                    VCAL.write(VCAL3);
                    ADCSRD.set_bits(REFS2);
                }
                _ => VCAL.write(VCAL1), // 1.024 V
            }
        }
    }

    ADMUX.write(mode.refs_bits() << 6);
}

#[cfg(feature = "md328d")]
fn program(mode: AnalogReference) {
    use crate::chip::{ADMUX, VCAL, VCAL1, VCAL2};

    if mode == AnalogReference::Internal2V56 {
        VCAL.write(VCAL2);
    } else {
        VCAL.write(VCAL1);
    }

    ADMUX.write(mode.refs_bits() << 6);
}

#[cfg(feature = "md8f")]
fn program(_mode: AnalogReference) {
    // No calibration register on this die; the selection reaches
    // ADMUX with the next conversion.
}
