use crate::error::{ConversionError, Error, ReadResult};
use crate::interpolate::{interpolate_slope_intercept, interpolate_two_point};
use embedded_hal::adc::{Channel, OneShot};

/// Linear calibration of a sensor, from raw ADC units to a reading.
///
/// # Examples
///
/// ```
/// use analog_gauge::Calibration;
///
/// // 0.5 V -> 0 psi, 4.5 V -> 100 psi on a 5 V, 10-bit ADC
/// let pressure = Calibration::TwoPoint {
///     x1: 102.0,
///     y1: 0.0,
///     x2: 921.0,
///     y2: 100.0,
/// };
///
/// // Resistive sender behind a divider halving the voltage
/// let fuel = Calibration::SlopeIntercept {
///     slope: 0.2,
///     intercept: -5.0,
///     divider: 0.5,
/// };
/// # assert!(pressure.validate().is_ok());
/// # assert!(fuel.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Calibration {
    /// The line through two `(sample, reading)` points.
    TwoPoint { x1: f32, y1: f32, x2: f32, y2: f32 },
    /// `slope * (sample / divider) + intercept`.
    SlopeIntercept {
        slope: f32,
        intercept: f32,
        divider: f32,
    },
}

impl Calibration {
    /// Checks that the calibration is defined for every sample.
    pub fn validate(&self) -> Result<(), ConversionError> {
        let valid = match *self {
            Calibration::TwoPoint { x1, y1, x2, y2 } => {
                x1 != x2 && [x1, y1, x2, y2].iter().all(|v| v.is_finite())
            }
            Calibration::SlopeIntercept {
                slope,
                intercept,
                divider,
            } => divider != 0.0 && [slope, intercept, divider].iter().all(|v| v.is_finite()),
        };

        if valid {
            Ok(())
        } else {
            Err(ConversionError::InvalidCalibration)
        }
    }

    /// Converts a raw sample to a reading.
    pub fn apply(&self, sample: u32) -> Result<f32, ConversionError> {
        match *self {
            Calibration::TwoPoint { x1, y1, x2, y2 } => {
                interpolate_two_point(x1, y1, x2, y2, sample)
            }
            Calibration::SlopeIntercept {
                slope,
                intercept,
                divider,
            } => interpolate_slope_intercept(slope, intercept, divider, sample),
        }
    }
}

/// A linear sensor read through an ADC channel.
#[derive(Debug)]
pub struct LinearSensor<Pin> {
    pin: Pin,
    calibration: Calibration,
}

impl<Pin> LinearSensor<Pin> {
    /// Returns a sensor reading from `pin`, or an error if `calibration`
    /// is not defined for every sample.
    ///
    /// # Examples
    ///
    /// ```
    /// use analog_gauge::{Calibration, ConversionError, LinearSensor};
    /// # use embedded_hal_mock::adc::MockChan0;
    ///
    /// let vertical = Calibration::TwoPoint {
    ///     x1: 100.0,
    ///     y1: 0.0,
    ///     x2: 100.0,
    ///     y2: 50.0,
    /// };
    ///
    /// assert_eq!(
    ///     LinearSensor::new(MockChan0 {}, vertical).err(),
    ///     Some(ConversionError::InvalidCalibration)
    /// );
    /// ```
    pub fn new<ADC>(pin: Pin, calibration: Calibration) -> Result<Self, ConversionError>
    where
        Pin: Channel<ADC>,
    {
        calibration.validate()?;

        Ok(Self { pin, calibration })
    }

    /// Destroys the sensor and returns the `Pin`.
    pub fn free(self) -> Pin {
        self.pin
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Reads the ADC and returns the calibrated reading.
    ///
    /// # Examples
    ///
    /// ```
    /// use analog_gauge::{Calibration, LinearSensor};
    /// # use embedded_hal_mock::adc::{Mock, MockChan0, Transaction};
    /// #
    /// # let expectations: [Transaction<u16>; 1] = [Transaction::read(0, 512)];
    /// # let mut adc = Mock::new(&expectations);
    /// # let pin = MockChan0 {};
    ///
    /// let mut sensor = LinearSensor::new(
    ///     pin,
    ///     Calibration::SlopeIntercept {
    ///         slope: 2.0,
    ///         intercept: 1.0,
    ///         divider: 2.0,
    ///     },
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(sensor.read(&mut adc), Ok(513.0));
    /// ```
    pub fn read<Adc, ADC, Word>(&mut self, adc: &mut Adc) -> ReadResult<Adc, ADC, Word, Pin>
    where
        Word: Into<u32>,
        Pin: Channel<ADC>,
        Adc: OneShot<ADC, Word, Pin>,
    {
        let sample: u32 = adc.read(&mut self.pin).map_err(|e| e.map(Error::Adc))?.into();

        self.calibration
            .apply(sample)
            .map_err(|e| nb::Error::Other(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{BusyAdc, BusyChannel};
    use embedded_hal_mock::{
        adc::{Mock, MockChan0, Transaction},
        common::Generic,
        MockError,
    };
    use std::io::ErrorKind;

    fn two_point() -> Calibration {
        Calibration::TwoPoint {
            x1: 192.0,
            y1: 5.0,
            x2: 832.0,
            y2: 10.0,
        }
    }

    fn slope_intercept() -> Calibration {
        Calibration::SlopeIntercept {
            slope: 2.0,
            intercept: 1.0,
            divider: 2.0,
        }
    }

    fn sensor(calibration: Calibration) -> LinearSensor<MockChan0> {
        LinearSensor::new(MockChan0 {}, calibration).unwrap()
    }

    fn adc(expectations: &[Transaction<u16>]) -> Generic<Transaction<u16>> {
        Mock::new(expectations)
    }

    fn assert_read_ok(calibration: Calibration, value: u16, expected: f32) {
        let mut sensor = sensor(calibration);
        let expectations = [Transaction::read(0, value)];
        let mut adc = adc(&expectations);

        assert_eq!(sensor.read(&mut adc), Ok(expected))
    }

    #[test]
    fn matching_calibration_points() {
        assert_read_ok(two_point(), 192, 5.0);
        assert_read_ok(two_point(), 832, 10.0);
    }

    #[test]
    fn interpolates() {
        assert_read_ok(two_point(), 512, 7.5);
        assert_read_ok(slope_intercept(), 512, 513.0);
    }

    #[test]
    fn extrapolates() {
        assert_read_ok(two_point(), 64, 4.0);
        assert_read_ok(two_point(), 960, 11.0);
    }

    #[test]
    fn rejects_invalid_calibration() {
        let vertical = Calibration::TwoPoint {
            x1: 100.0,
            y1: 0.0,
            x2: 100.0,
            y2: 50.0,
        };
        let no_divider = Calibration::SlopeIntercept {
            slope: 1.0,
            intercept: 0.0,
            divider: 0.0,
        };
        let nan_slope = Calibration::SlopeIntercept {
            slope: f32::NAN,
            intercept: 0.0,
            divider: 1.0,
        };

        assert!(LinearSensor::new(MockChan0 {}, vertical).is_err());
        assert!(LinearSensor::new(MockChan0 {}, no_divider).is_err());
        assert_eq!(
            nan_slope.validate(),
            Err(ConversionError::InvalidCalibration)
        );
    }

    #[test]
    fn apply_checks_calibration_per_call() {
        let no_divider = Calibration::SlopeIntercept {
            slope: 1.0,
            intercept: 0.0,
            divider: 0.0,
        };
        assert_eq!(
            no_divider.apply(10),
            Err(ConversionError::InvalidCalibration)
        );
    }

    #[test]
    fn error() {
        let mut adc =
            adc(&[Transaction::read(0, 0).with_error(MockError::Io(ErrorKind::InvalidData))]);
        assert!(sensor(two_point()).read(&mut adc).is_err());
    }

    #[test]
    fn reading_twice_is_identical() {
        let mut sensor = sensor(two_point());
        let expectations = [Transaction::read(0, 333), Transaction::read(0, 333)];
        let mut adc = adc(&expectations);

        let first = sensor.read(&mut adc).unwrap();
        let second = sensor.read(&mut adc).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn would_block_passes_through() {
        let mut sensor = LinearSensor::new(BusyChannel, two_point()).unwrap();
        assert_eq!(sensor.read(&mut BusyAdc), Err(nb::Error::WouldBlock));
    }

    #[test]
    fn free_returns_pin() {
        let _pin: MockChan0 = sensor(slope_intercept()).free();
    }
}
