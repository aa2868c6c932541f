use crc::{Crc, CRC_8_NRSC_5};

/// 7-bit I²C address of the device
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct I2cAddr(u8);
impl I2cAddr {
    /// ADDR pin tied low (factory default)
    pub const DEFAULT: I2cAddr = I2cAddr(0x44);
    /// ADDR pin tied high
    pub const ALTERNATE: I2cAddr = I2cAddr(0x45);

    /// Get the address as the 7-bit value put on the bus
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}
impl Default for I2cAddr {
    fn default() -> Self {
        Self::DEFAULT
    }
}
/// Rejects anything wider than 7 bits, handing the value back
impl TryFrom<u8> for I2cAddr {
    type Error = u8;

    fn try_from(addr: u8) -> Result<Self, Self::Error> {
        if addr > 0x7F {
            return Err(addr);
        }
        Ok(I2cAddr(addr))
    }
}

/// Command words understood by the device, sent MSB first
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u16)]
pub enum Command {
    /// Single shot, high repeatability, clock stretching disabled
    MeasureHighRep = 0x2400,
    /// Read the status register
    StatusRead = 0xF32D,
    /// Clear the alert and reset flags of the status register
    StatusClear = 0x3041,
    /// Soft reset
    SoftReset = 0x30A2,
    /// Turn the internal heater on
    HeaterEnable = 0x306D,
    /// Turn the internal heater off
    HeaterDisable = 0x3066,
}
impl Command {
    /// Command word as it goes on the wire
    pub fn to_be_bytes(self) -> [u8; 2] {
        (self as u16).to_be_bytes()
    }

    /// Time the device needs after this command before it takes the next transfer
    pub fn execution_time_us(self) -> u32 {
        match self {
            Command::MeasureHighRep => MEASUREMENT_DELAY_US,
            Command::SoftReset => SOFT_RESET_DELAY_US,
            _ => 0,
        }
    }
}

/// Maximum conversion time of a high repeatability measurement
pub const MEASUREMENT_DELAY_US: u32 = 15_000;

/// Time the device takes to come back after a soft reset
pub const SOFT_RESET_DELAY_US: u32 = 1_500;

/// Reads closer together than this are served from the last measurement
pub const READ_CACHE_WINDOW_US: u64 = 2_000_000;

pub(crate) const STATUS_FIELD_LSBIT_ALERT_PENDING: u16 = 15;
pub(crate) const STATUS_FIELD_WIDTH_ALERT_PENDING: u16 = 1;
pub(crate) const STATUS_FIELD_LSBIT_HEATER_ENABLED: u16 = 13;
pub(crate) const STATUS_FIELD_WIDTH_HEATER_ENABLED: u16 = 1;
pub(crate) const STATUS_FIELD_LSBIT_RH_TRACKING_ALERT: u16 = 11;
pub(crate) const STATUS_FIELD_WIDTH_RH_TRACKING_ALERT: u16 = 1;
pub(crate) const STATUS_FIELD_LSBIT_T_TRACKING_ALERT: u16 = 10;
pub(crate) const STATUS_FIELD_WIDTH_T_TRACKING_ALERT: u16 = 1;
pub(crate) const STATUS_FIELD_LSBIT_RESET_DETECTED: u16 = 4;
pub(crate) const STATUS_FIELD_WIDTH_RESET_DETECTED: u16 = 1;
pub(crate) const STATUS_FIELD_LSBIT_COMMAND_FAILED: u16 = 1;
pub(crate) const STATUS_FIELD_WIDTH_COMMAND_FAILED: u16 = 1;
pub(crate) const STATUS_FIELD_LSBIT_WRITE_CHECKSUM_FAILED: u16 = 0;
pub(crate) const STATUS_FIELD_WIDTH_WRITE_CHECKSUM_FAILED: u16 = 1;

/// Heater bit of the status word, toggled by the power-on self-test
pub const STATUS_HEATER_MASK: u16 = 1 << STATUS_FIELD_LSBIT_HEATER_ENABLED;

// poly 0x31, init 0xff, no reflection, no final xor
const CRC: Crc<u8> = Crc::<u8>::new(&CRC_8_NRSC_5);

/// Checksum the device appends to every 16-bit word it sends
pub fn crc8(data: &[u8]) -> u8 {
    CRC.checksum(data)
}

/// Convert a raw temperature count to degrees centigrade
pub fn raw_temp_to_centigrade(raw: u16) -> f32 {
    raw as f32 * 175.0 / 65535.0 - 45.0
}

/// Convert a raw temperature count to degrees fahrenheit
pub fn raw_temp_to_fahrenheit(raw: u16) -> f32 {
    centigrade_to_fahrenheit(raw_temp_to_centigrade(raw))
}

/// Convert degrees centigrade to degrees fahrenheit
pub fn centigrade_to_fahrenheit(centigrade: f32) -> f32 {
    centigrade * 9.0 / 5.0 + 32.0
}

/// Convert a raw humidity count to percent relative humidity
pub fn raw_rel_humid_to_percent(raw: u16) -> f32 {
    raw as f32 * 100.0 / 65535.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn crc8_known_vectors() {
        assert_eq!(crc8(&[0x00, 0x00]), 0x81);
        assert_eq!(crc8(&[0xBE, 0xEF]), 0x92);
        assert_eq!(crc8(&[]), 0xFF);
    }

    #[test]
    fn conversion_end_points_are_exact() {
        assert_eq!(raw_temp_to_centigrade(0), -45.0);
        assert_eq!(raw_temp_to_centigrade(0xFFFF), 130.0);
        assert_eq!(raw_rel_humid_to_percent(0), 0.0);
        assert_eq!(raw_rel_humid_to_percent(0xFFFF), 100.0);
        assert_eq!(raw_temp_to_fahrenheit(0), -49.0);
        assert!(approx_eq!(f32, raw_temp_to_fahrenheit(0xFFFF), 266.0, epsilon = 0.001));
    }

    #[test]
    fn conversion_mid_scale() {
        // 0x6666 is 40% of full scale
        assert!(approx_eq!(f32, raw_temp_to_centigrade(0x6666), 25.0, epsilon = 0.01));
        assert!(approx_eq!(f32, raw_rel_humid_to_percent(0x8000), 50.0, epsilon = 0.01));
    }

    #[test]
    fn command_words_are_big_endian() {
        assert_eq!(Command::MeasureHighRep.to_be_bytes(), [0x24, 0x00]);
        assert_eq!(Command::StatusRead.to_be_bytes(), [0xF3, 0x2D]);
        assert_eq!(Command::StatusClear.to_be_bytes(), [0x30, 0x41]);
        assert_eq!(Command::SoftReset.to_be_bytes(), [0x30, 0xA2]);
        assert_eq!(Command::HeaterEnable.to_be_bytes(), [0x30, 0x6D]);
        assert_eq!(Command::HeaterDisable.to_be_bytes(), [0x30, 0x66]);
    }

    #[test]
    fn measurement_and_reset_wait() {
        assert_eq!(Command::MeasureHighRep.execution_time_us(), 15_000);
        assert_eq!(Command::SoftReset.execution_time_us(), 1_500);
        assert_eq!(Command::StatusRead.execution_time_us(), 0);
        assert_eq!(Command::HeaterEnable.execution_time_us(), 0);
    }

    #[test]
    fn address_must_fit_seven_bits() {
        assert_eq!(I2cAddr::default().as_u8(), 0x44);
        assert_eq!(I2cAddr::ALTERNATE.as_u8(), 0x45);
        assert_eq!(I2cAddr::try_from(0x7F).map(|a| a.as_u8()), Ok(0x7F));
        assert_eq!(I2cAddr::try_from(0x80), Err(0x80));
    }
}
