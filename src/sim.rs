//! Register-level simulation of the MD analog peripherals.
//!
//! Stands in for the silicon on non-AVR builds: a flat register file
//! plus just enough converter behavior to complete a conversion.
//! Writing ADCSRA with ADEN and ADSC both set finishes the conversion
//! immediately, sourcing the sample from the scripted per-channel
//! values (or the negative-input value while the differential select
//! is active) and clearing ADSC, the way the emulated part signals
//! completion. Reading ADCL latches ADCH until ADCH is read back,
//! which is the same interlock the hardware provides against torn
//! samples.
//!
//! Every access through the register facade is recorded in a trace so
//! tests can assert ordering, not just final state.

use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU8, AtomicUsize, Ordering};

use crate::chip;

/// Data-space addresses and pin ids tests observe.
pub mod map {
    #[cfg(feature = "md328p")]
    pub use crate::chip::{
        ADCSRB_ADDR, ADCSRC_ADDR, ADCSRD_ADDR, DACON_ADDR, GPIOR0_ADDR, MUX5, PMX2_ADDR, REFS2,
        SPN, V5D1, V5D4, VCAL3,
    };
    #[cfg(feature = "md328d")]
    pub use crate::chip::DAL1_ADDR;
    #[cfg(any(feature = "md328p", feature = "md328d"))]
    pub use crate::chip::{DAL0_ADDR, VCAL1, VCAL2, VCAL_ADDR};
    pub use crate::chip::{
        ADCH_ADDR, ADCL_ADDR, ADCSRA_ADDR, ADEN, ADMUX_ADDR, ADSC, COM0A1, COM0B1, COM1A1, COM1B1,
        COM2A1, COM2B1, DDRB_ADDR, DDRC_ADDR, DDRD_ADDR, MUX_MASK, OCR0A_ADDR, OCR0B_ADDR,
        OCR1A_ADDR, OCR1B_ADDR, OCR2A_ADDR, OCR2B_ADDR, PORTB_ADDR, PORTC_ADDR, PORTD_ADDR,
        TCCR0A_ADDR, TCCR1A_ADDR, TCCR2A_ADDR,
    };
}

const REG_SPACE: usize = 0x100;
const TRACE_LEN: usize = 512;

/// Marker bit on trace entries recording a write; the rest is the address.
pub const WRITE: u16 = 0x8000;

const R8: AtomicU8 = AtomicU8::new(0);
const R16: AtomicU16 = AtomicU16::new(0);

static REGS: [AtomicU8; REG_SPACE] = [R8; REG_SPACE];
static CHANNELS: [AtomicU16; 16] = [R16; 16];
static NEGATIVE: AtomicU16 = AtomicU16::new(0);

static ADCH_LATCH: AtomicU8 = AtomicU8::new(0);
static ADCH_LATCHED: AtomicBool = AtomicBool::new(false);

static TRACE: [AtomicU16; TRACE_LEN] = [R16; TRACE_LEN];
static TRACE_IDX: AtomicUsize = AtomicUsize::new(0);

fn cell(addr: u16) -> &'static AtomicU8 {
    &REGS[usize::from(addr) & (REG_SPACE - 1)]
}

fn record(entry: u16) {
    let i = TRACE_IDX.fetch_add(1, Ordering::SeqCst);
    if i < TRACE_LEN {
        TRACE[i].store(entry, Ordering::SeqCst);
    }
}

/// A read as the driver core performs it.
pub fn bus_read(addr: u16) -> u8 {
    record(addr);
    match addr {
        chip::ADCL_ADDR => {
            // The low-byte read freezes the high byte until it is
            // collected, so a caller that reads low first always sees
            // one coherent sample.
            let value = cell(chip::ADCL_ADDR).load(Ordering::SeqCst);
            ADCH_LATCH.store(cell(chip::ADCH_ADDR).load(Ordering::SeqCst), Ordering::SeqCst);
            ADCH_LATCHED.store(true, Ordering::SeqCst);
            value
        }
        chip::ADCH_ADDR => {
            if ADCH_LATCHED.swap(false, Ordering::SeqCst) {
                ADCH_LATCH.load(Ordering::SeqCst)
            } else {
                cell(chip::ADCH_ADDR).load(Ordering::SeqCst)
            }
        }
        _ => cell(addr).load(Ordering::SeqCst),
    }
}

/// A write as the driver core performs it.
pub fn bus_write(addr: u16, value: u8) {
    record(addr | WRITE);
    cell(addr).store(value, Ordering::SeqCst);

    if addr == chip::ADCSRA_ADDR && value & (chip::ADEN | chip::ADSC) == (chip::ADEN | chip::ADSC) {
        complete_conversion();
    }
}

fn complete_conversion() {
    let sample = source_value();
    cell(chip::ADCL_ADDR).store(sample as u8, Ordering::SeqCst);
    cell(chip::ADCH_ADDR).store((sample >> 8) as u8, Ordering::SeqCst);
    // ADSC clears to signal completion
    cell(chip::ADCSRA_ADDR).fetch_and(!chip::ADSC, Ordering::SeqCst);
}

fn source_value() -> u16 {
    #[cfg(feature = "md328p")]
    {
        if cell(chip::ADCSRC_ADDR).load(Ordering::SeqCst) & chip::SPN != 0 {
            return NEGATIVE.load(Ordering::SeqCst);
        }
    }

    let mut channel = cell(chip::ADMUX_ADDR).load(Ordering::SeqCst) & chip::MUX_MASK;
    #[cfg(feature = "md328p")]
    {
        if cell(chip::ADCSRB_ADDR).load(Ordering::SeqCst) & chip::MUX5 != 0 {
            channel |= 0x08;
        }
    }

    CHANNELS[usize::from(channel) & 0x0F].load(Ordering::SeqCst)
}

/// Clear the register file, scripted sources and trace.
pub fn reset() {
    for r in REGS.iter() {
        r.store(0, Ordering::SeqCst);
    }
    for c in CHANNELS.iter() {
        c.store(0, Ordering::SeqCst);
    }
    NEGATIVE.store(0, Ordering::SeqCst);
    ADCH_LATCH.store(0, Ordering::SeqCst);
    ADCH_LATCHED.store(false, Ordering::SeqCst);
    TRACE_IDX.store(0, Ordering::SeqCst);
    crate::reference::reset_default();
}

/// Script the sample a mux channel converts to.
pub fn set_channel(channel: u8, value: u16) {
    CHANNELS[usize::from(channel) & 0x0F].store(value, Ordering::SeqCst);
}

/// Script the sample the differential negative input converts to.
pub fn set_negative_input(value: u16) {
    NEGATIVE.store(value, Ordering::SeqCst);
}

/// Peek a register without disturbing the trace or the latch.
pub fn reg(addr: u16) -> u8 {
    cell(addr).load(Ordering::SeqCst)
}

/// Poke a register without disturbing the trace or the ADC model.
pub fn poke(addr: u16, value: u8) {
    cell(addr).store(value, Ordering::SeqCst);
}

/// Number of bus accesses recorded since the last reset.
pub fn trace_len() -> usize {
    TRACE_IDX.load(Ordering::SeqCst).min(TRACE_LEN)
}

/// Trace entry `i`: the address accessed, with [`WRITE`] set for writes.
pub fn trace_at(i: usize) -> u16 {
    TRACE[i].load(Ordering::SeqCst)
}
