// msp430-adc-reader - Build Script
//
// Adds the defmt linker script to the firmware link when logging is enabled.

use std::env;

fn main() {
    // defmt.x places the interned log strings; it is put on the search path by defmt itself
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=build.rs");
}
