//! Behavioral tests against the register simulator.
//!
//! The simulator state is process-wide, like the hardware it stands in
//! for, so every test serializes on one lock and starts from a reset
//! register file.

use std::sync::{Mutex, MutexGuard};

use md_analog::sim::{self, map};
use md_analog::{analog_write, Adc, AnalogReference, DutyPin};

static LOCK: Mutex<()> = Mutex::new(());

fn setup() -> MutexGuard<'static, ()> {
    let guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
    sim::reset();
    guard
}

fn bit(addr: u16, mask: u8) -> bool {
    sim::reg(addr) & mask != 0
}

#[test]
fn averaging_with_matching_divisor_is_exact() {
    let _guard = setup();
    sim::set_channel(0, 731);
    let mut adc = Adc::new();

    assert_eq!(adc.read_averaged(14, 16, 16), 731);
    assert_eq!(adc.read_averaged(14, 4, 4), 731);
}

#[test]
fn averaging_folds_in_the_divisor_scaling() {
    let _guard = setup();
    let mut adc = Adc::new();

    sim::set_channel(0, 1000);
    assert_eq!(adc.read_averaged(14, 16, 64), 250);

    // floor(S * V / D)
    sim::set_channel(0, 1003);
    assert_eq!(adc.read_averaged(14, 16, 64), 250);
}

#[test]
fn duty_zero_is_a_digital_low() {
    let _guard = setup();
    analog_write(9, 0);

    // pin 9 = PORTB bit 1, forced to output, driven low, comparator off
    assert!(bit(map::DDRB_ADDR, 1 << 1));
    assert!(!bit(map::PORTB_ADDR, 1 << 1));
    assert!(!bit(map::TCCR1A_ADDR, map::COM1A1));
}

#[test]
fn duty_full_is_a_digital_high() {
    let _guard = setup();
    analog_write(9, 255);

    assert!(bit(map::DDRB_ADDR, 1 << 1));
    assert!(bit(map::PORTB_ADDR, 1 << 1));
    assert!(!bit(map::TCCR1A_ADDR, map::COM1A1));
}

#[test]
fn pins_without_pwm_hardware_threshold_at_128() {
    let _guard = setup();

    // pin 8 = PORTB bit 0, no timer behind it
    analog_write(8, 200);
    assert!(bit(map::PORTB_ADDR, 1 << 0));
    analog_write(8, 50);
    assert!(!bit(map::PORTB_ADDR, 1 << 0));
    analog_write(8, 128);
    assert!(bit(map::PORTB_ADDR, 1 << 0));
    analog_write(8, 127);
    assert!(!bit(map::PORTB_ADDR, 1 << 0));
}

#[test]
fn pwm_pins_connect_the_comparator_and_load_the_duty() {
    let _guard = setup();

    analog_write(5, 77);
    assert!(bit(map::TCCR0A_ADDR, map::COM0B1));
    assert_eq!(sim::reg(map::OCR0B_ADDR), 77);

    analog_write(3, 91);
    assert!(bit(map::TCCR2A_ADDR, map::COM2B1));
    assert_eq!(sim::reg(map::OCR2B_ADDR), 91);

    // 16-bit comparator: duty lands in the low byte
    analog_write(9, 200);
    assert!(bit(map::TCCR1A_ADDR, map::COM1A1));
    assert_eq!(sim::reg(map::OCR1A_ADDR), 200);
    assert_eq!(sim::reg(map::OCR1A_ADDR + 1), 0);
}

#[cfg(any(feature = "md328p", feature = "md328d"))]
#[test]
fn dac_pins_bypass_the_digital_fallback() {
    let _guard = setup();

    // endpoint values still go to the DAC data register, and the pin
    // is never forced into output mode
    analog_write(4, 0);
    assert_eq!(sim::reg(map::DAL0_ADDR), 0);
    assert!(!bit(map::DDRD_ADDR, 1 << 4));

    analog_write(4, 200);
    assert_eq!(sim::reg(map::DAL0_ADDR), 200);
    analog_write(4, 255);
    assert_eq!(sim::reg(map::DAL0_ADDR), 255);
    assert!(!bit(map::PORTD_ADDR, 1 << 4));
}

#[cfg(feature = "md328d")]
#[test]
fn second_dac_channel_routes_to_dal1() {
    let _guard = setup();

    analog_write(7, 123);
    assert_eq!(sim::reg(map::DAL1_ADDR), 123);
    assert!(!bit(map::DDRD_ADDR, 1 << 7));
}

#[test]
fn duty_handle_implements_pwm_pin() {
    use embedded_hal::PwmPin;

    let _guard = setup();
    let mut led = DutyPin::new(6);

    assert_eq!(led.get_max_duty(), 255);

    led.set_duty(100);
    assert!(bit(map::TCCR0A_ADDR, map::COM0A1));
    assert_eq!(sim::reg(map::OCR0A_ADDR), 100);
    assert_eq!(led.get_duty(), 100);

    led.disable();
    assert!(!bit(map::TCCR0A_ADDR, map::COM0A1));
    assert!(!bit(map::PORTD_ADDR, 1 << 6));

    led.enable();
    assert!(bit(map::TCCR0A_ADDR, map::COM0A1));
    assert_eq!(sim::reg(map::OCR0A_ADDR), 100);
}

#[test]
fn reads_are_deterministic_for_a_fixed_source() {
    let _guard = setup();
    sim::set_channel(2, 512);
    let mut adc = Adc::new();

    let first = adc.read(16);
    let second = adc.read(16);
    assert_eq!(first, second);
}

#[test]
fn reference_hardware_changes_only_through_the_setter() {
    let _guard = setup();
    sim::set_channel(0, 300);
    let mut adc = Adc::new();

    // sampling alone never touches the calibration space
    let _ = adc.read(14);
    #[cfg(any(feature = "md328p", feature = "md328d"))]
    assert_eq!(sim::reg(map::VCAL_ADDR), 0);

    adc.set_reference(AnalogReference::External);
    #[cfg(any(feature = "md328p", feature = "md328d"))]
    assert_eq!(sim::reg(map::ADMUX_ADDR) >> 6, 0);
    #[cfg(feature = "md8f")]
    {
        // no calibration hardware: the selection reaches ADMUX with
        // the next conversion
        let _ = adc.read(14);
        assert_eq!(sim::reg(map::ADMUX_ADDR) >> 6, 0);
    }

    // and the setter is idempotent
    let snapshot: Vec<u8> = (0u16..0x100).map(sim::reg).collect();
    adc.set_reference(AnalogReference::External);
    let again: Vec<u8> = (0u16..0x100).map(sim::reg).collect();
    assert_eq!(snapshot, again);
}

#[cfg(feature = "md328p")]
#[test]
fn internal_references_load_the_calibration_word() {
    let _guard = setup();
    let mut adc = Adc::new();

    adc.set_reference(AnalogReference::Internal2V048);
    assert_eq!(sim::reg(map::VCAL_ADDR), map::VCAL2);
    assert_eq!(sim::reg(map::DACON_ADDR) & 0x03, 0x02);
    assert_eq!(sim::reg(map::ADMUX_ADDR) >> 6, 3);
    assert!(!bit(map::ADCSRD_ADDR, map::REFS2));

    // the high-range reference also raises REFS2
    adc.set_reference(AnalogReference::Internal4V096);
    assert_eq!(sim::reg(map::VCAL_ADDR), map::VCAL3);
    assert!(bit(map::ADCSRD_ADDR, map::REFS2));
}

#[cfg(feature = "md328p")]
#[test]
fn external_reference_releases_the_aref_mux() {
    let _guard = setup();
    let mut adc = Adc::new();

    sim::poke(map::PMX2_ADDR, 0x02);
    adc.set_reference(AnalogReference::External);

    assert_eq!(sim::reg(map::PMX2_ADDR), 0x00);
    assert_eq!(sim::reg(map::DACON_ADDR) & 0x03, 0x01);
}

#[cfg(feature = "md328d")]
#[test]
fn internal_reference_loads_the_calibration_word() {
    let _guard = setup();
    let mut adc = Adc::new();

    adc.set_reference(AnalogReference::Internal2V56);
    assert_eq!(sim::reg(map::VCAL_ADDR), map::VCAL2);
    adc.set_reference(AnalogReference::Default);
    assert_eq!(sim::reg(map::VCAL_ADDR), map::VCAL1);
}

#[test]
fn low_byte_is_read_before_high_byte() {
    let _guard = setup();
    sim::set_channel(0, 0x0155);
    let mut adc = Adc::new();
    let start = sim::trace_len();

    let _ = adc.read(14);

    // collect the data-register reads and check they pair up low-first
    let mut reads = Vec::new();
    for i in start..sim::trace_len() {
        let entry = sim::trace_at(i);
        if entry == map::ADCL_ADDR || entry == map::ADCH_ADDR {
            reads.push(entry);
        }
    }
    assert!(!reads.is_empty());
    assert_eq!(reads.len() % 2, 0);
    for pair in reads.chunks(2) {
        assert_eq!(pair[0], map::ADCL_ADDR);
        assert_eq!(pair[1], map::ADCH_ADDR);
    }
}

#[test]
fn low_byte_read_latches_the_pair_against_tearing() {
    let _guard = setup();
    sim::set_channel(0, 0x0187);
    let mut adc = Adc::new();
    adc.start(14);

    // reading the low byte freezes the high byte...
    let low = sim::bus_read(map::ADCL_ADDR);

    // ...so a conversion landing between the byte reads cannot tear
    // the sample
    sim::set_channel(0, 0x0302);
    sim::bus_write(map::ADCSRA_ADDR, sim::reg(map::ADCSRA_ADDR) | map::ADSC);

    let high = sim::bus_read(map::ADCH_ADDR);
    assert_eq!(u16::from(high) << 8 | u16::from(low), 0x0187);
}

#[test]
fn nonblocking_read_completes() {
    let _guard = setup();
    sim::set_channel(0, 600);
    let mut adc = Adc::new();

    adc.start(14);
    assert_eq!(nb::block!(adc.poll()), Ok(600));
}

#[test]
fn channel_select_lands_in_admux() {
    let _guard = setup();
    sim::set_channel(3, 345);
    let mut adc = Adc::new();

    adc.start(17);
    assert_eq!(sim::reg(map::ADMUX_ADDR) & 0x0F, 3);
    assert_eq!(nb::block!(adc.poll()), Ok(345));
}

#[cfg(feature = "md328p")]
#[test]
fn channels_past_eight_use_the_extension_bit() {
    let _guard = setup();
    sim::set_channel(8, 222);
    let mut adc = Adc::new();

    // pin 22 = channel 8: low mux bits zero, extension bit set
    adc.start(22);
    assert_eq!(sim::reg(map::ADMUX_ADDR) & map::MUX_MASK, 0);
    assert!(bit(map::ADCSRB_ADDR, map::MUX5));
    assert_eq!(nb::block!(adc.poll()), Ok(222));

    adc.start(14);
    assert!(!bit(map::ADCSRB_ADDR, map::MUX5));
}

#[cfg(feature = "md328p")]
#[test]
fn divider_monitor_pins_program_adcsrd() {
    let _guard = setup();
    let mut adc = Adc::new();

    adc.start(map::V5D1);
    assert_eq!(sim::reg(map::ADCSRD_ADDR) & 0x0F, 0x06);

    // an ordinary pin clears the divider select again
    adc.start(14);
    assert_eq!(sim::reg(map::ADCSRD_ADDR) & 0x0F, 0x00);
}

#[cfg(feature = "md328p")]
#[test]
fn read_averages_the_differential_pair_and_corrects_gain() {
    let _guard = setup();
    sim::set_channel(0, 512);
    sim::set_negative_input(500);
    let mut adc = Adc::new();

    // (512 + 500) / 2 = 506, then v -= v >> 7
    assert_eq!(adc.read(14), 506 - (506 >> 7));
}

#[cfg(feature = "md328d")]
#[test]
fn read_oversamples_sixteen_to_sixtyfour() {
    let _guard = setup();
    sim::set_channel(0, 1000);
    let mut adc = Adc::new();

    // 16 conversions / 64 = V / 4, no gain correction
    assert_eq!(adc.read(14), 250);
}

#[cfg(feature = "md8f")]
#[test]
fn read_returns_the_raw_conversion() {
    let _guard = setup();
    sim::set_channel(0, 777);
    let mut adc = Adc::new();

    assert_eq!(adc.read(14), 777);
}
