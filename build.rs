use std::env;

fn main() {
    let target = env::var("TARGET").unwrap_or_default();

    // Link configuration only applies on AVR; host builds exist so the
    // register-simulator tests can run.
    if target.contains("avr") {
        println!("cargo:rustc-link-arg=-mmcu={}", mcu());
    }

    // Pass CPU frequency for timing calculations
    println!("cargo:rustc-env=MCU_FREQ_HZ=16000000");
}

fn mcu() -> &'static str {
    if env::var_os("CARGO_FEATURE_MD8F").is_some() {
        "atmega8"
    } else {
        // MD328P and MD328D are ATmega328-compatible dies
        "atmega328p"
    }
}
