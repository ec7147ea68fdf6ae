use crate::error::{finite, ConversionError, Error, ReadResult};
use embedded_hal::adc::{Channel, OneShot};

/// Default ADC precision in bits.
pub const DEFAULT_PRECISION: u32 = 10;

/// 0 °C in kelvin.
pub const ZERO_CELSIUS_KELVIN: f32 = 273.15;

/// Steinhart-Hart model coefficients, found from a best fit of the
/// thermistor's resistance/temperature curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteinhartHart {
    pub c1: f32,
    pub c2: f32,
    pub c3: f32,
}

impl SteinhartHart {
    pub const fn new(c1: f32, c2: f32, c3: f32) -> Self {
        Self { c1, c2, c3 }
    }

    /// Returns the temperature in kelvin for a thermistor `resistance` (Ω).
    pub fn kelvin(&self, resistance: f32) -> Result<f32, ConversionError> {
        if resistance.is_nan() || resistance <= 0.0 {
            return Err(ConversionError::NotFinite);
        }

        let ln_r = libm::logf(resistance);
        let denominator = self.c1 + self.c2 * ln_r + self.c3 * ln_r * ln_r * ln_r;

        if denominator == 0.0 {
            return Err(ConversionError::NotFinite);
        }

        finite(1.0 / denominator)
    }
}

/// Configuration for a thermistor on the low side of a voltage divider,
/// with a pullup resistor to the ADC reference.
///
/// - `pullup`: The pullup resistance (Ω)
/// - `coefficients`: The Steinhart-Hart coefficients of the thermistor
/// - `precision`: The precision of the ADC in bits (eg. for 10-bit precision, use `10`)
///
/// # Examples
///
/// ```
/// use analog_gauge::{SteinhartHart, ThermistorConfig};
///
/// let config = ThermistorConfig::new(
///     10_000.0, // 10 kΩ pullup
///     SteinhartHart::new(1.009249522e-03, 2.378405444e-04, 2.019202697e-07),
/// );
/// assert_eq!(config.precision, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermistorConfig {
    pub pullup: f32,
    pub coefficients: SteinhartHart,
    pub precision: u32,
}

impl ThermistorConfig {
    /// Returns a config for a 10-bit ADC.
    pub const fn new(pullup: f32, coefficients: SteinhartHart) -> Self {
        Self {
            pullup,
            coefficients,
            precision: DEFAULT_PRECISION,
        }
    }
}

/// Returns the largest sample a `precision`-bit ADC can produce.
pub(crate) fn full_scale(precision: u32) -> Result<u32, ConversionError> {
    match precision {
        1..=31 => Ok((1 << precision) - 1),
        _ => Err(ConversionError::InvalidCalibration),
    }
}

/// Back-calculates the thermistor resistance (Ω) from a raw sample.
///
/// The sample must satisfy `0 < sample < 2^precision - 1`: at either end the
/// divider equation has no finite, positive solution.
pub fn thermistor_resistance(
    sample: u32,
    pullup: f32,
    precision: u32,
) -> Result<f32, ConversionError> {
    let full_scale = full_scale(precision)?;

    if !pullup.is_finite() || pullup <= 0.0 {
        return Err(ConversionError::InvalidCalibration);
    }

    if sample == 0 || sample >= full_scale {
        return Err(ConversionError::SampleOutOfRange(sample));
    }

    finite(pullup / (full_scale as f32 / sample as f32 - 1.0))
}

pub fn kelvin_to_celsius(kelvin: f32) -> f32 {
    kelvin - ZERO_CELSIUS_KELVIN
}

pub fn kelvin_to_fahrenheit(kelvin: f32) -> f32 {
    kelvin_to_celsius(kelvin) * 1.8 + 32.0
}

/// Converts a raw sample to a temperature in °F using the Steinhart-Hart
/// equation.
///
/// # Examples
///
/// ```
/// use analog_gauge::{steinhart_hart, ConversionError, SteinhartHart, ThermistorConfig};
///
/// let config = ThermistorConfig::new(
///     10_000.0,
///     SteinhartHart::new(1.009249522e-03, 2.378405444e-04, 2.019202697e-07),
/// );
///
/// let fahrenheit = steinhart_hart(512, &config).unwrap();
/// assert!((fahrenheit - 76.336).abs() < 1e-2);
///
/// // A shorted or open thermistor is reported instead of returning infinity
/// assert_eq!(steinhart_hart(1023, &config), Err(ConversionError::SampleOutOfRange(1023)));
/// ```
pub fn steinhart_hart(sample: u32, config: &ThermistorConfig) -> Result<f32, ConversionError> {
    let resistance = thermistor_resistance(sample, config.pullup, config.precision)?;
    let kelvin = config.coefficients.kelvin(resistance)?;

    finite(kelvin_to_fahrenheit(kelvin))
}

/// A thermistor read through an ADC channel.
#[derive(Debug)]
pub struct Thermistor<Pin> {
    pin: Pin,
    config: ThermistorConfig,
}

impl<Pin> Thermistor<Pin> {
    /// Returns a thermistor reading from `pin`.
    ///
    /// # Examples
    ///
    /// ```
    /// use analog_gauge::{SteinhartHart, Thermistor, ThermistorConfig};
    /// # use embedded_hal_mock::adc::MockChan0;
    /// #
    /// # let pin = MockChan0 {};
    ///
    /// let thermistor = Thermistor::new(
    ///     pin,
    ///     ThermistorConfig::new(
    ///         10_000.0,
    ///         SteinhartHart::new(1.009249522e-03, 2.378405444e-04, 2.019202697e-07),
    ///     ),
    /// );
    /// ```
    pub fn new(pin: Pin, config: ThermistorConfig) -> Self {
        Self { pin, config }
    }

    /// Destroys the thermistor and returns the `Pin`.
    pub fn free(self) -> Pin {
        self.pin
    }

    pub fn config(&self) -> &ThermistorConfig {
        &self.config
    }

    /// Reads the ADC and returns the temperature in °F.
    ///
    /// # Examples
    ///
    /// ```
    /// use analog_gauge::{SteinhartHart, Thermistor, ThermistorConfig};
    /// # use embedded_hal_mock::adc::{Mock, MockChan0, Transaction};
    /// #
    /// # let expectations: [Transaction<u16>; 1] = [Transaction::read(0, 512)];
    /// # let mut adc = Mock::new(&expectations);
    /// # let pin = MockChan0 {};
    ///
    /// let mut thermistor = Thermistor::new(
    ///     pin,
    ///     ThermistorConfig::new(
    ///         10_000.0,
    ///         SteinhartHart::new(1.009249522e-03, 2.378405444e-04, 2.019202697e-07),
    ///     ),
    /// );
    ///
    /// // Half scale on a 10 kΩ divider is about room temperature
    /// let fahrenheit = thermistor.read(&mut adc).unwrap();
    /// assert!((fahrenheit - 76.336).abs() < 1e-2);
    /// ```
    pub fn read<Adc, ADC, Word>(&mut self, adc: &mut Adc) -> ReadResult<Adc, ADC, Word, Pin>
    where
        Word: Into<u32>,
        Pin: Channel<ADC>,
        Adc: OneShot<ADC, Word, Pin>,
    {
        let sample: u32 = adc.read(&mut self.pin).map_err(|e| e.map(Error::Adc))?.into();

        steinhart_hart(sample, &self.config).map_err(|e| nb::Error::Other(e.into()))
    }
}
