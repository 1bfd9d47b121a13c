//! Configuration constants for the MD analog layer.

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// Default reference voltage in millivolts (AVcc rail)
pub const ADC_VREF_MV: u16 = 5000;

/// Conversions accumulated by the oversampled read path
pub const ADC_OVERSAMPLE_COUNT: u16 = 16;

/// Divisor applied to the oversampled accumulator; larger than the
/// sample count so the average and the scaling shift happen in one
/// division
pub const ADC_OVERSAMPLE_DIV: u16 = 64;
