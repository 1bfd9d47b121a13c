//! Volatile register access primitives.
//!
//! On AVR targets a [`Reg8`] is a raw data-space address and every
//! access compiles to a single volatile load or store. The MD dies
//! carry extension registers (`VCAL`, `DACON`, `PMX2`, `ADCSRC/D`,
//! `DAL0/1`) that no stock ATmega peripheral crate can name, so the
//! whole map is kept in [`crate::chip`] as plain addresses.
//!
//! Off-target the same facade is routed through the register file in
//! [`crate::sim`].

#[derive(Clone, Copy)]
pub(crate) struct Reg8 {
    addr: u16,
}

impl Reg8 {
    pub(crate) const fn new(addr: u16) -> Self {
        Self { addr }
    }

    #[cfg(target_arch = "avr")]
    pub(crate) fn read(self) -> u8 {
        unsafe { (self.addr as *const u8).read_volatile() }
    }

    #[cfg(not(target_arch = "avr"))]
    pub(crate) fn read(self) -> u8 {
        crate::sim::bus_read(self.addr)
    }

    #[cfg(target_arch = "avr")]
    pub(crate) fn write(self, value: u8) {
        unsafe { (self.addr as *mut u8).write_volatile(value) }
    }

    #[cfg(not(target_arch = "avr"))]
    pub(crate) fn write(self, value: u8) {
        crate::sim::bus_write(self.addr, value);
    }

    pub(crate) fn modify(self, f: impl FnOnce(u8) -> u8) {
        self.write(f(self.read()));
    }

    pub(crate) fn set_bits(self, mask: u8) {
        self.modify(|v| v | mask);
    }

    pub(crate) fn clear_bits(self, mask: u8) {
        self.modify(|v| v & !mask);
    }

    pub(crate) fn bit_is_set(self, mask: u8) -> bool {
        self.read() & mask != 0
    }
}

/// A byte pair making up a 16-bit register.
#[derive(Clone, Copy)]
pub(crate) struct Reg16 {
    low: Reg8,
    high: Reg8,
}

impl Reg16 {
    pub(crate) const fn new(addr: u16) -> Self {
        Self {
            low: Reg8::new(addr),
            high: Reg8::new(addr + 1),
        }
    }

    /// High byte first: the hardware holds it in the temp register and
    /// commits the pair on the low-byte write.
    pub(crate) fn write(self, value: u16) {
        self.high.write((value >> 8) as u8);
        self.low.write(value as u8);
    }
}

#[cfg(target_arch = "avr")]
pub(crate) fn interrupt_free<R>(f: impl FnOnce() -> R) -> R {
    avr_device::interrupt::free(|_| f())
}

#[cfg(not(target_arch = "avr"))]
pub(crate) fn interrupt_free<R>(f: impl FnOnce() -> R) -> R {
    f()
}
