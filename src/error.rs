use core::fmt;
use embedded_hal::adc::OneShot;

/// A precondition of a conversion was violated.
///
/// Returned instead of letting an infinite or `NaN` value escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionError {
    /// The raw sample is outside the range the conversion is defined for.
    SampleOutOfRange(u32),
    /// A calibration constant makes the conversion undefined (eg. a zero
    /// divider, or two calibration points with the same voltage).
    InvalidCalibration,
    /// The conversion produced an infinite or `NaN` intermediate.
    NotFinite,
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::SampleOutOfRange(sample) => {
                write!(f, "sample {} is outside the valid range", sample)
            }
            ConversionError::InvalidCalibration => f.write_str("invalid calibration constants"),
            ConversionError::NotFinite => f.write_str("conversion produced a non-finite value"),
        }
    }
}

/// Errors from reading and converting a sample.
///
/// `E` is the error type of the ADC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    Adc(E),
    Conversion(ConversionError),
}

/// Result of reading one sample from `Adc` and converting it.
pub type ReadResult<Adc, ADC, Word, Pin> =
    nb::Result<f32, Error<<Adc as OneShot<ADC, Word, Pin>>::Error>>;

impl<E> From<ConversionError> for Error<E> {
    fn from(error: ConversionError) -> Self {
        Error::Conversion(error)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Adc(error) => write!(f, "ADC error: {:?}", error),
            Error::Conversion(error) => write!(f, "{}", error),
        }
    }
}

/// Rejects infinite and `NaN` values.
pub(crate) fn finite(value: f32) -> Result<f32, ConversionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConversionError::NotFinite)
    }
}
