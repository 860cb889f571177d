#![cfg_attr(not(test), no_std)]

mod constants;
mod segment;

pub use constants::*;
pub use segment::{digit_at, digit_count, digit_to_segments, segments_to_digit, UnknownPattern};
use embedded_hal::i2c::I2c;
use num_traits::ToPrimitive;

/// Pattern written to every digit slot on power-on and reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlankMode {
    /// All segments off.
    None,
    /// All segments lit, useful as a test pattern.
    All,
}

impl BlankMode {
    fn segments(self) -> u8 {
        match self {
            BlankMode::None => SEGMENTS_NONE,
            BlankMode::All => SEGMENTS_ALL,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayState {
    Off,
    Blank,
    AllOn,
    Value(u32),
}

impl From<BlankMode> for DisplayState {
    fn from(mode: BlankMode) -> Self {
        match mode {
            BlankMode::None => DisplayState::Blank,
            BlankMode::All => DisplayState::AllOn,
        }
    }
}

/// Driver for a 5-position 7-segment display behind an HT16K33.
///
/// The frame buffer mirrors the chip's display RAM: byte 0 is the RAM address
/// pointer, odd bytes hold segment patterns and the remaining even bytes stay zero.
pub struct HT16K33<I2C> {
    i2c: I2C,
    pub address: u8,
    pub read_address: u8,
    buffer: [u8; BUFFER_LEN],
    state: DisplayState,
}

impl<I2C, E> HT16K33<I2C>
where
    I2C: I2c<Error = E>,
{
    pub fn new(i2c: I2C) -> Self {
        Self::with_addresses(i2c, DEFAULT_ADDRESS, DEFAULT_READ_ADDRESS)
    }

    pub fn with_addresses(i2c: I2C, address: u8, read_address: u8) -> Self {
        Self {
            i2c,
            address,
            read_address,
            buffer: [0; BUFFER_LEN],
            state: DisplayState::Off,
        }
    }

    pub fn destroy(self) -> I2C {
        self.i2c
    }

    pub fn frame_buffer(&self) -> &[u8; BUFFER_LEN] {
        &self.buffer
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// Value shown by the last successful [`show_decimal`](Self::show_decimal),
    /// cleared by [`reset`](Self::reset) and [`power_off`](Self::power_off).
    pub fn last_value(&self) -> Option<u32> {
        match self.state {
            DisplayState::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Starts the oscillator, enables the display without blinking, sets the
    /// fixed brightness and writes a blank or all-on frame.
    ///
    /// Stops at the first failed write and returns its error.
    pub fn power_on(&mut self, mode: BlankMode) -> Result<(), HT16K33Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("ht16k33: power on ({})", mode);

        self.write_command(command::SYSTEM_SETUP | command::system_setup::OSCILLATOR_ON)?;
        self.write_command(
            command::DISPLAY_SETUP
                | command::display_setup::DISPLAY_ON
                | command::display_setup::BLINK_OFF,
        )?;
        self.write_command(command::DIMMING | BRIGHTNESS)?;

        self.fill(mode);
        self.write_display()?;
        self.state = mode.into();
        Ok(())
    }

    pub fn power_off(&mut self) -> Result<(), HT16K33Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("ht16k33: power off");

        self.write_command(command::SYSTEM_SETUP | command::system_setup::OSCILLATOR_OFF)?;
        self.state = DisplayState::Off;
        Ok(())
    }

    /// Fills every digit slot with the blank or all-on pattern and forgets the
    /// last shown value. Only the frame buffer changes; nothing is sent.
    pub fn reset(&mut self, mode: BlankMode) {
        self.fill(mode);
        if self.state != DisplayState::Off {
            self.state = mode.into();
        }
    }

    /// Puts `digit` into the frame buffer at `position`, 1 being the rightmost.
    pub fn set_digit(&mut self, digit: u8, position: u8) -> Result<(), HT16K33Error<E>> {
        if digit > 9 {
            return Err(HT16K33Error::InvalidValue);
        }
        let slot = position
            .checked_sub(1)
            .and_then(|index| POSITION_SLOTS.get(index as usize))
            .ok_or(HT16K33Error::InvalidLocation(position))?;
        self.buffer[*slot] = digit_to_segments(digit);
        Ok(())
    }

    /// Powers on the display and shows `value` right-aligned, without leading zeros.
    ///
    /// Values that are negative or above [`MAX_VALUE`] are rejected before
    /// anything is sent. Fractional values are truncated.
    pub fn show_decimal<T>(&mut self, value: T) -> Result<(), HT16K33Error<E>>
    where
        T: ToPrimitive,
    {
        let value = value
            .to_u32()
            .filter(|value| *value <= MAX_VALUE)
            .ok_or(HT16K33Error::InvalidValue)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("ht16k33: show {}", value);

        self.power_on(BlankMode::None)?;
        self.reset(BlankMode::None);
        self.buffer[0] = command::DISPLAY_RAM;

        if value == 0 {
            self.set_digit(0, 1)?;
        }
        for index in 0..digit_count(value) {
            if let Some(digit) = digit_at(value, index) {
                self.set_digit(digit, index as u8 + 1)?;
            }
        }

        self.write_display()?;
        self.state = DisplayState::Value(value);
        Ok(())
    }

    /// Reads one segment byte from the read address and decodes it.
    pub fn read_decimal(&mut self) -> Result<u8, HT16K33Error<E>> {
        let segments = self.read_register(command::DISPLAY_RAM)?;
        match segments_to_digit(segments) {
            Ok(digit) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("ht16k33: read {=u8:#x} as {}", segments, digit);
                Ok(digit)
            }
            Err(UnknownPattern(segments)) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("ht16k33: unknown segment pattern {=u8:#x}", segments);
                Err(HT16K33Error::UnknownPattern(segments))
            }
        }
    }

    /// Sends the whole frame buffer to the display.
    pub fn write_display(&mut self) -> Result<(), HT16K33Error<E>> {
        self.i2c.write(self.address, &self.buffer)?;
        Ok(())
    }

    fn fill(&mut self, mode: BlankMode) {
        for slot in POSITION_SLOTS {
            self.buffer[slot] = mode.segments();
        }
    }

    fn read_register(&mut self, register: u8) -> Result<u8, HT16K33Error<E>> {
        let mut buffer = [0; 1];
        self.i2c
            .write_read(self.read_address, &[register], &mut buffer)?;
        Ok(buffer[0])
    }

    fn write_command(&mut self, command: u8) -> Result<(), HT16K33Error<E>> {
        self.i2c.write(self.address, &[command])?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HT16K33Error<E> {
    I2cError(E),
    InvalidValue,
    InvalidLocation(u8),
    UnknownPattern(u8),
}

impl<E> From<E> for HT16K33Error<E> {
    fn from(error: E) -> Self {
        HT16K33Error::I2cError(error)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for HT16K33Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HT16K33Error::I2cError(error) => write!(f, "I2C error: {:?}", error),
            HT16K33Error::InvalidValue => write!(f, "value cannot be displayed"),
            HT16K33Error::InvalidLocation(position) => {
                write!(f, "no digit at position {}", position)
            }
            HT16K33Error::UnknownPattern(segments) => {
                write!(f, "unknown segment pattern {:#04x}", segments)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
    use embedded_hal::i2c::ErrorKind;

    fn power_on_transactions(frame: [u8; BUFFER_LEN]) -> Vec<Transaction> {
        vec![
            Transaction::write(DEFAULT_ADDRESS, vec![0x21]),
            Transaction::write(DEFAULT_ADDRESS, vec![0x81]),
            Transaction::write(DEFAULT_ADDRESS, vec![0xE8]),
            Transaction::write(DEFAULT_ADDRESS, frame.to_vec()),
        ]
    }

    #[test]
    fn test_new() {
        let display = HT16K33::new(I2cMock::new(&[]));
        assert_eq!(display.address, DEFAULT_ADDRESS);
        assert_eq!(display.read_address, DEFAULT_READ_ADDRESS);
        assert_eq!(display.state(), DisplayState::Off);
        assert_eq!(display.frame_buffer(), &[0; BUFFER_LEN]);
        display.destroy().done();
    }

    #[test]
    fn test_power_on_blank() {
        let expected = power_on_transactions([0; BUFFER_LEN]);
        let mut display = HT16K33::new(I2cMock::new(&expected));

        display.power_on(BlankMode::None).unwrap();
        assert_eq!(display.state(), DisplayState::Blank);
        display.destroy().done();
    }

    #[test]
    fn test_power_on_all() {
        let expected = power_on_transactions([0, 0x7F, 0, 0x7F, 0, 0x7F, 0, 0x7F, 0, 0x7F]);
        let mut display = HT16K33::new(I2cMock::new(&expected));

        display.power_on(BlankMode::All).unwrap();
        assert_eq!(display.state(), DisplayState::AllOn);
        display.destroy().done();
    }

    #[test]
    fn test_power_on_stops_at_failed_write() {
        let expected = [
            Transaction::write(DEFAULT_ADDRESS, vec![0x21]),
            Transaction::write(DEFAULT_ADDRESS, vec![0x81]).with_error(ErrorKind::Other),
        ];
        let mut display = HT16K33::new(I2cMock::new(&expected));

        assert_eq!(
            display.power_on(BlankMode::All),
            Err(HT16K33Error::I2cError(ErrorKind::Other))
        );
        assert_eq!(display.state(), DisplayState::Off);
        display.destroy().done();
    }

    #[test]
    fn test_power_off() {
        let expected = [Transaction::write(DEFAULT_ADDRESS, vec![0x20])];
        let mut display = HT16K33::new(I2cMock::new(&expected));

        display.power_off().unwrap();
        assert_eq!(display.state(), DisplayState::Off);
        display.destroy().done();
    }

    #[test]
    fn test_show_decimal() {
        let mut expected = power_on_transactions([0; BUFFER_LEN]);
        expected.push(Transaction::write(
            DEFAULT_ADDRESS,
            vec![0, 0, 0, 0, 0, 0x66, 0, 0x06, 0, 0x07],
        ));
        let mut display = HT16K33::new(I2cMock::new(&expected));

        display.show_decimal(417).unwrap();
        assert_eq!(display.last_value(), Some(417));
        display.destroy().done();
    }

    #[test]
    fn test_show_decimal_write_error() {
        let mut expected = power_on_transactions([0; BUFFER_LEN]);
        expected.push(
            Transaction::write(DEFAULT_ADDRESS, vec![0, 0, 0, 0, 0, 0, 0, 0x06, 0, 0x3F])
                .with_error(ErrorKind::Bus),
        );
        let mut display = HT16K33::new(I2cMock::new(&expected));

        assert_eq!(
            display.show_decimal(10u8),
            Err(HT16K33Error::I2cError(ErrorKind::Bus))
        );
        assert_eq!(display.last_value(), None);
        display.destroy().done();
    }

    #[test]
    fn test_read_decimal() {
        let expected = [
            Transaction::write_read(DEFAULT_READ_ADDRESS, vec![0x00], vec![0x6F]),
            Transaction::write_read(DEFAULT_READ_ADDRESS, vec![0x00], vec![0x49]),
        ];
        let mut display = HT16K33::new(I2cMock::new(&expected));

        assert_eq!(display.read_decimal(), Ok(9));
        assert_eq!(
            display.read_decimal(),
            Err(HT16K33Error::UnknownPattern(0x49))
        );
        display.destroy().done();
    }

    #[test]
    fn test_read_decimal_bus_error() {
        let expected = [Transaction::write_read(DEFAULT_READ_ADDRESS, vec![0x00], vec![0x00])
            .with_error(ErrorKind::NoAcknowledge(
                embedded_hal::i2c::NoAcknowledgeSource::Address,
            ))];
        let mut display = HT16K33::new(I2cMock::new(&expected));

        assert!(matches!(
            display.read_decimal(),
            Err(HT16K33Error::I2cError(ErrorKind::NoAcknowledge(_)))
        ));
        display.destroy().done();
    }

    #[test]
    fn test_custom_addresses() {
        let expected = [
            Transaction::write(0x71, vec![0x20]),
            Transaction::write_read(0x49, vec![0x00], vec![0x06]),
        ];
        let mut display = HT16K33::with_addresses(I2cMock::new(&expected), 0x71, 0x49);

        display.power_off().unwrap();
        assert_eq!(display.read_decimal(), Ok(1));
        display.destroy().done();
    }
}
