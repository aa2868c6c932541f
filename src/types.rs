use crate::hw_def::*;

use core::fmt;

#[cfg(feature="defmt")]
use defmt::Format;

/// SHT31 device driver
///
/// Holds the bus, the delay provider and the clock for its whole lifetime.  Pass
/// `&mut bus` instead of the bus itself to keep using it elsewhere afterwards.
#[derive(Debug)]
pub struct Sht31<I2C, Delay, Clk> {
    pub(crate) i2c: I2C,
    pub(crate) delay: Delay,
    pub(crate) clock: Clk,
    pub(crate) i2c_addr: I2cAddr,
    pub(crate) last_measurement: Option<Measurement>,
    pub(crate) stats: Statistics,
}

/// All possible errors in this crate
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug)]
pub enum Error<E> {
    /// I²C communication error
    I2c(E),
    /// Failure of a checksum from the device was detected
    CrcMismatch,
}

/// The heater bit did not go clear, set, clear during the power-on self-test.
///
/// Carries the three status words observed and the parts handed to `Sht31::new`, so the
/// bus can be reused, e.g. to try the other address.
pub struct SelfTestFailed<I2C, Delay, Clk> {
    /// status before, during and after the heater was switched on
    pub statuses: [StatusBits; 3],
    pub(crate) i2c: I2C,
    pub(crate) delay: Delay,
    pub(crate) clock: Clk,
}
impl<I2C, Delay, Clk> SelfTestFailed<I2C, Delay, Clk> {
    /// Hand back the bus, delay and clock
    pub fn release(self) -> (I2C, Delay, Clk) {
        (self.i2c, self.delay, self.clock)
    }
}
impl<I2C, Delay, Clk> fmt::Debug for SelfTestFailed<I2C, Delay, Clk> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelfTestFailed").field("statuses", &self.statuses).finish_non_exhaustive()
    }
}
#[cfg(feature = "defmt")]
impl<I2C, Delay, Clk> Format for SelfTestFailed<I2C, Delay, Clk> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "SelfTestFailed {{ statuses: {} }}", self.statuses)
    }
}

/// Raw (still in u16 format) temperature and relative humidity from the device
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RawMeasurement {
    /// unprocessed temperature
    pub temperature: u16,
    /// unprocessed relative humidity
    pub humidity: u16,
}
impl RawMeasurement {
    /// Get temperature in Fahrenheit
    pub fn fahrenheit(&self) -> f32 {
        raw_temp_to_fahrenheit(self.temperature)
    }
    /// Get temperature in Centigrade
    pub fn centigrade(&self) -> f32 {
        raw_temp_to_centigrade(self.temperature)
    }
    /// Get relative humidity in percent
    pub fn humidity_percent(&self) -> f32 {
        raw_rel_humid_to_percent(self.humidity)
    }
}

/// Temperature and relative humidity after conversion, always taken from the same sample
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    /// degrees centigrade
    pub temperature: f32,
    /// relative humidity in percent
    pub humidity: f32,
}
impl Measurement {
    /// Get temperature in Fahrenheit
    pub fn fahrenheit(&self) -> f32 {
        centigrade_to_fahrenheit(self.temperature)
    }
}
impl From<&RawMeasurement> for Measurement {
    fn from(raw: &RawMeasurement) -> Self {
        Self {
            temperature: raw.centigrade(),
            humidity: raw.humidity_percent(),
        }
    }
}

/// Running counters of the driver's read activity
///
/// `read_calls == successful_reads + cached_reads + failed_reads` holds at all times.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Statistics {
    /// calls to `read()`, including the ones made by the temperature/humidity getters
    pub read_calls: u64,
    /// reads that went to the bus and passed the checksum
    pub successful_reads: u64,
    /// reads served from the last measurement without touching the bus
    pub cached_reads: u64,
    /// reads that failed on the bus or on a checksum
    pub failed_reads: u64,
    /// clock value (µs) at the start of the last successful bus read
    pub last_read_time: Option<u64>,
    /// total µs spent in successful bus reads
    pub successful_read_duration_total: u64,
}

/// Status bits from the device
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatusBits {
    raw: u16,
    /// at least one alert is pending
    pub alert_pending: bool,
    /// heater is enabled
    pub heater_enabled: bool,
    /// relative humidity tracking alert
    pub rh_tracking_alert: bool,
    /// temperature tracking alert
    pub t_tracking_alert: bool,
    /// reset (power-on, soft or hard) detected since last clear of status register
    pub reset_detected: bool,
    /// last command was not processed
    pub command_failed: bool,
    /// checksum of the last write transfer failed
    pub write_checksum_failed: bool,
}
impl From<u16> for StatusBits {
    fn from(raw: u16) -> Self {
        Self {
            raw,
            alert_pending: (raw >> STATUS_FIELD_LSBIT_ALERT_PENDING) & ((1 << STATUS_FIELD_WIDTH_ALERT_PENDING) - 1) != 0,
            heater_enabled: (raw >> STATUS_FIELD_LSBIT_HEATER_ENABLED) & ((1 << STATUS_FIELD_WIDTH_HEATER_ENABLED) - 1) != 0,
            rh_tracking_alert: (raw >> STATUS_FIELD_LSBIT_RH_TRACKING_ALERT) & ((1 << STATUS_FIELD_WIDTH_RH_TRACKING_ALERT) - 1) != 0,
            t_tracking_alert: (raw >> STATUS_FIELD_LSBIT_T_TRACKING_ALERT) & ((1 << STATUS_FIELD_WIDTH_T_TRACKING_ALERT) - 1) != 0,
            reset_detected: (raw >> STATUS_FIELD_LSBIT_RESET_DETECTED) & ((1 << STATUS_FIELD_WIDTH_RESET_DETECTED) - 1) != 0,
            command_failed: (raw >> STATUS_FIELD_LSBIT_COMMAND_FAILED) & ((1 << STATUS_FIELD_WIDTH_COMMAND_FAILED) - 1) != 0,
            write_checksum_failed: (raw >> STATUS_FIELD_LSBIT_WRITE_CHECKSUM_FAILED) & ((1 << STATUS_FIELD_WIDTH_WRITE_CHECKSUM_FAILED) - 1) != 0,
        }
    }
}
impl StatusBits {
    /// What a status read reports when the device did not answer or the checksum failed
    pub const UNKNOWN: StatusBits = StatusBits {
        raw: 0,
        alert_pending: false,
        heater_enabled: false,
        rh_tracking_alert: false,
        t_tracking_alert: false,
        reset_detected: false,
        command_failed: false,
        write_checksum_failed: false,
    };

    /// Get the raw status bits
    pub fn raw(&self) -> u16 {
        self.raw
    }
}
impl fmt::Display for StatusBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatusBits {{ 0x{:04x}; ", self.raw)?;
        if self.alert_pending {
            write!(f, "alert_pending ")?;
        }
        if self.heater_enabled {
            write!(f, "heater_enabled ")?;
        }
        if self.rh_tracking_alert {
            write!(f, "rh_tracking_alert ")?;
        }
        if self.t_tracking_alert {
            write!(f, "t_tracking_alert ")?;
        }
        if self.reset_detected {
            write!(f, "reset_detected ")?;
        }
        if self.command_failed {
            write!(f, "command_failed ")?;
        }
        if self.write_checksum_failed {
            write!(f, "write_checksum_failed ")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_bits_decode() {
        let status = StatusBits::from(0x8010);
        assert!(status.alert_pending);
        assert!(status.reset_detected);
        assert!(!status.heater_enabled);
        assert_eq!(status.raw(), 0x8010);

        let status = StatusBits::from(STATUS_HEATER_MASK);
        assert!(status.heater_enabled);
        assert!(!status.alert_pending);
    }

    #[test]
    fn unknown_status_is_zero() {
        assert_eq!(StatusBits::UNKNOWN, StatusBits::from(0));
    }

    #[test]
    fn status_bits_display() {
        let status = StatusBits::from(0x2003);
        assert_eq!(
            status.to_string(),
            "StatusBits { 0x2003; heater_enabled command_failed write_checksum_failed }"
        );
    }

    #[test]
    fn measurement_from_raw() {
        let m = Measurement::from(&RawMeasurement { temperature: 0, humidity: 0xFFFF });
        assert_eq!(m.temperature, -45.0);
        assert_eq!(m.humidity, 100.0);
        assert_eq!(m.fahrenheit(), -49.0);
    }

    #[test]
    fn fahrenheit_agrees_between_raw_and_converted() {
        for raw in [0u16, 1, 0x1234, 0x6666, 0x8000, 0xABCD, 0xFFFE, 0xFFFF] {
            let raw = RawMeasurement { temperature: raw, humidity: 0 };
            assert_eq!(raw.fahrenheit(), Measurement::from(&raw).fahrenheit());
        }
    }

    #[test]
    fn self_test_failure_releases_parts() {
        let failed = SelfTestFailed {
            statuses: [StatusBits::UNKNOWN; 3],
            i2c: 1u8,
            delay: 2u16,
            clock: 3u32,
        };
        assert_eq!(failed.release(), (1, 2, 3));
    }
}
