use crate::clock::Clock;
use crate::hw_def::*;
use crate::types::*;

use embedded_hal::{delay::DelayNs, i2c::I2c};

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        use defmt::{debug, info, trace, warn};
    } else if #[cfg(feature = "log")] {
        use log::{debug, info, trace, warn};
    } else {
        macro_rules! trace {
            ($($arg:tt)*) => {};
        }
        macro_rules! debug {
            ($($arg:tt)*) => {};
        }
        macro_rules! info {
            ($($arg:tt)*) => {};
        }
        macro_rules! warn {
            ($($arg:tt)*) => {};
        }
    }
}

impl<I2C, Delay, Clk, E> Sht31<I2C, Delay, Clk>
where
    I2C: I2c<Error = E>,
    Delay: DelayNs,
    Clk: Clock,
{
    /// Create a new SHT31 driver instance.
    ///
    /// The device is soft reset, then its heater is switched on and off again while the
    /// status register is watched.  Only a device whose heater bit reads clear, set, clear
    /// is accepted; anything else (nothing on the bus, a different chip, a device that
    /// corrupts its replies) yields [`SelfTestFailed`], which hands the parts back.
    pub fn new(
        i2c: I2C,
        delay: Delay,
        clock: Clk,
        i2c_addr: I2cAddr,
    ) -> Result<Self, SelfTestFailed<I2C, Delay, Clk>> {
        let mut sht31 = Self {
            i2c,
            delay,
            clock,
            i2c_addr,
            last_measurement: None,
            stats: Statistics::default(),
        };
        if let Err(statuses) = sht31.self_test() {
            let (i2c, delay, clock) = sht31.destroy();
            return Err(SelfTestFailed { statuses, i2c, delay, clock });
        }
        info!("sht31: created at I2C 0x{:x}", sht31.i2c_addr.as_u8());
        Ok(sht31)
    }

    /// Release the driver and hand back the bus, delay and clock
    pub fn destroy(self) -> (I2C, Delay, Clk) {
        (self.i2c, self.delay, self.clock)
    }

    /// Bus address the driver talks to
    pub fn address(&self) -> I2cAddr {
        self.i2c_addr
    }

    fn self_test(&mut self) -> Result<(), [StatusBits; 3]> {
        // command failures are already logged; the status reads decide the outcome
        let _ = self.software_reset();
        let before = self.status_or_unknown();
        let _ = self.send_command(Command::HeaterEnable);
        let during = self.status_or_unknown();
        let _ = self.send_command(Command::HeaterDisable);
        let after = self.status_or_unknown();

        if !before.heater_enabled && during.heater_enabled && !after.heater_enabled {
            return Ok(());
        }
        warn!(
            "sht31: self-test failed at I2C 0x{:x}: status 0x{:x} 0x{:x} 0x{:x}",
            self.i2c_addr.as_u8(),
            before.raw(),
            during.raw(),
            after.raw()
        );
        Err([before, during, after])
    }

    fn send_command(&mut self, cmd: Command) -> Result<(), Error<E>> {
        let cmd_bytes = cmd.to_be_bytes();
        if let Err(i2c_err) = self.i2c.write(self.i2c_addr.as_u8(), &cmd_bytes) {
            warn!("sht31: I2C 0x{:x} cmd 0x{:x} write error", self.i2c_addr.as_u8(), cmd as u16);
            return Err(Error::I2c(i2c_err));
        }
        trace!("sht31: I2C 0x{:x} cmd 0x{:x} write success", self.i2c_addr.as_u8(), cmd as u16);

        let wait_us = cmd.execution_time_us();
        if wait_us > 0 {
            self.delay.delay_us(wait_us);
        }
        Ok(())
    }

    fn cmd_and_read<const N: usize>(&mut self, cmd: Command, read_vals: &mut [u16; N]) -> Result<(), Error<E>> {
        // no reply is longer than two words
        const { assert!(N >= 1 && N <= 2) };
        let num_vals = N;

        self.send_command(cmd)?;

        let mut read_buf = [0u8; 6];
        let read_buf_slice = &mut read_buf[0..(3 * num_vals)];
        if let Err(i2c_err) = self.i2c.read(self.i2c_addr.as_u8(), read_buf_slice) {
            warn!("sht31: I2C 0x{:x} read error after cmd 0x{:x}", self.i2c_addr.as_u8(), cmd as u16);
            return Err(Error::I2c(i2c_err));
        }

        // validate every word before handing any of them out
        for ii in 0..num_vals {
            let read_word = &read_buf[ii * 3..ii * 3 + 2];
            let read_crc = read_buf[ii * 3 + 2];
            let crc_expect = crc8(read_word);
            if read_crc != crc_expect {
                warn!(
                    "sht31: crc mismatch word {}/{}: read_crc=0x{:x}, crc_expect=0x{:x}",
                    ii, num_vals, read_crc, crc_expect
                );
                return Err(Error::CrcMismatch);
            }
        }
        for (ii, val) in read_vals.iter_mut().enumerate() {
            *val = u16::from_be_bytes([read_buf[ii * 3], read_buf[ii * 3 + 1]]);
        }
        Ok(())
    }

    /// Read a temperature and humidity pair, or reuse the last one.
    ///
    /// If the last successful bus read started less than [`READ_CACHE_WINDOW_US`] ago,
    /// the stored measurement is returned without any bus traffic.  Otherwise a single
    /// shot measurement is triggered, awaited and validated.  On failure the stored
    /// measurement is left untouched.
    pub fn read(&mut self) -> Result<Measurement, Error<E>> {
        self.stats.read_calls += 1;
        let start = self.clock.now_us();

        if let (Some(last_read_time), Some(measurement)) = (self.stats.last_read_time, self.last_measurement) {
            if start.saturating_sub(last_read_time) < READ_CACHE_WINDOW_US {
                self.stats.cached_reads += 1;
                return Ok(measurement);
            }
        }

        let raw = match self.one_shot() {
            Ok(raw) => raw,
            Err(err) => {
                self.stats.failed_reads += 1;
                return Err(err);
            }
        };
        let measurement = Measurement::from(&raw);
        debug!("sht31: temperature={}C humidity={}%", measurement.temperature, measurement.humidity);

        self.last_measurement = Some(measurement);
        self.stats.successful_reads += 1;
        self.stats.successful_read_duration_total += self.clock.now_us().saturating_sub(start);
        self.stats.last_read_time = Some(start);
        Ok(measurement)
    }

    /// Trigger a one-shot measurement and return the raw sample pair, bypassing the cache
    /// and the statistics
    pub fn one_shot(&mut self) -> Result<RawMeasurement, Error<E>> {
        let mut read_buf = [0u16; 2];
        self.cmd_and_read(Command::MeasureHighRep, &mut read_buf)?;
        Ok(RawMeasurement {
            temperature: read_buf[0],
            humidity: read_buf[1],
        })
    }

    /// Temperature in degrees centigrade, through [`Self::read`]
    pub fn temperature(&mut self) -> Result<f32, Error<E>> {
        Ok(self.read()?.temperature)
    }

    /// Relative humidity in percent, through [`Self::read`]
    pub fn humidity(&mut self) -> Result<f32, Error<E>> {
        Ok(self.read()?.humidity)
    }

    /// Last validated measurement, without touching the bus
    pub fn last_measurement(&self) -> Option<Measurement> {
        self.last_measurement
    }

    /// Snapshot of the read statistics
    pub fn stats(&self) -> Statistics {
        self.stats
    }

    /// Read and optionally clear status bits
    pub fn read_status(&mut self, clear: bool) -> Result<StatusBits, Error<E>> {
        let mut read_buf = [0u16; 1];
        self.cmd_and_read(Command::StatusRead, &mut read_buf)?;
        if clear {
            self.clear_status()?;
        }

        Ok(StatusBits::from(read_buf[0]))
    }

    fn status_or_unknown(&mut self) -> StatusBits {
        self.read_status(false).unwrap_or(StatusBits::UNKNOWN)
    }

    /// Clear the alert and reset flags of the status register
    pub fn clear_status(&mut self) -> Result<(), Error<E>> {
        self.send_command(Command::StatusClear)
    }

    /// Condensation heater
    pub fn heater(&mut self, enabled: bool) -> Result<(), Error<E>> {
        if enabled {
            self.send_command(Command::HeaterEnable)
        } else {
            self.send_command(Command::HeaterDisable)
        }
    }

    /// software reset
    pub fn software_reset(&mut self) -> Result<(), Error<E>> {
        self.send_command(Command::SoftReset)
    }
}
