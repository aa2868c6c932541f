//! This is a platform-agnostic Rust driver for the Sensirion SHT3x (SHT30, SHT31, SHT35)
//! humidity and temperature digital sensors using the [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://github.com/rust-embedded/embedded-hal/tree/master/embedded-hal
//!
//! This driver allows you to:
//! - Confirm a genuine, responsive device at construction with a heater toggle self-test.
//! - Take single shot, high repeatability measurements.
//! - Serve repeated reads within a two second window from the last measurement.
//! - Read running statistics of read calls, cache hits, failures and bus time.
//! - Enable/disable the heater.
//! - Trigger a software reset.
//! - Read and optionally clear the device status bits.
//!
//! This driver does not support the following device features:
//! - Periodic (auto) measurement mode and the ART command.
//! - Medium and low repeatability, and clock stretching.
//! - Alerts (read/write of alert limits).
//! - Async API.
//!
//! ## Features
//!
//! - `std`: Provides `StdClock`, a [`Clock`] backed by `std::time::Instant`.
//! - `defmt`: Enables logging using the `defmt` framework.
//! - `log`: Enables logging using the `log` framework.
//!
//! ## Supported devices: SHT30, SHT31, SHT35
//!
//! Every word the device sends is followed by a CRC-8 (polynomial 0x31, init 0xFF) which the
//! driver checks before accepting the data.  Raw counts are converted with the datasheet's
//! transfer functions: `T = -45 + 175 * raw / 65535` °C and `RH = 100 * raw / 65535` %.
//!
//! Datasheet:
//!   [SHT3x](https://cdn-shop.adafruit.com/product-files/2857/Sensirion_Humidity_SHT3x_Datasheet_digital-767294.pdf)
//!
//! To use this driver, import this crate, an `embedded_hal` implementation and a
//! [`Clock`], then instantiate the device.
//!
//! ## Example:
//!
//! ```ignore
//! use sht31::{I2cAddr, Sht31, StdClock};
//!
//! // Platform-specific
//! let mut i2c = /* embedded_hal::i2c::I2c instance */;
//! let delay = /* embedded_hal::delay::DelayNs instance */;
//!
//! // Passing `&mut i2c` keeps the bus usable for other devices
//! let mut sht31 = match Sht31::new(&mut i2c, delay, StdClock::new(), I2cAddr::DEFAULT) {
//!     Ok(sht31) => sht31,
//!     Err(failed) => {
//!         // nothing answered like an SHT3x at 0x44, try the other address
//!         let (i2c, delay, clock) = failed.release();
//!         Sht31::new(i2c, delay, clock, I2cAddr::ALTERNATE).unwrap()
//!     }
//! };
//!
//! let measurement = sht31.read().unwrap();
//! println!("{:0.1} %RH, {:0.1} °C", measurement.humidity, measurement.temperature);
//!
//! // Within two seconds of the last read, no bus traffic happens
//! let temperature = sht31.temperature().unwrap();
//!
//! let stats = sht31.stats();
//! println!("{} reads, {} cached, {} failed",
//!     stats.read_calls,
//!     stats.cached_reads,
//!     stats.failed_reads);
//!
//! let (_i2c, _delay, _clock) = sht31.destroy();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

mod clock;
mod device_impl;
mod hw_def;
mod types;

pub use crate::{clock::*, hw_def::*, types::*};
