//! Conversions from raw ADC samples to physical readings, and drivers for
//! gauge and warning-light outputs.
//!
//! - [`steinhart_hart`] and [`Thermistor`]: thermistor temperature in °F
//! - [`interpolate_two_point`], [`interpolate_slope_intercept`] and
//!   [`LinearSensor`]: linear sensors
//! - [`current_loop_duty`] and [`CurrentLoop`]: constant-current gauge output
//! - [`WarningLight`]: slow/fast blinking warning light
//!
//! Every conversion reports undefined inputs (eg. a sample at the rail, or a
//! zero divider) as a [`ConversionError`] instead of returning an infinite or
//! `NaN` value.

#![cfg_attr(not(test), no_std)]

mod current_loop;
mod error;
mod interpolate;
mod sensor;
mod thermistor;
mod warning_light;

#[cfg(test)]
mod test_support;

pub use current_loop::{
    current_loop_duty, CurrentLoop, CurrentLoopConfig, Drive, OutputConfig,
    DEFAULT_OUTPUT_RESOLUTION,
};
pub use error::{ConversionError, Error, ReadResult};
pub use interpolate::{interpolate_slope_intercept, interpolate_two_point};
pub use sensor::{Calibration, LinearSensor};
pub use thermistor::{
    kelvin_to_celsius, kelvin_to_fahrenheit, steinhart_hart, thermistor_resistance, SteinhartHart,
    Thermistor, ThermistorConfig, DEFAULT_PRECISION, ZERO_CELSIUS_KELVIN,
};
pub use warning_light::{BlinkMode, Thresholds, WarningLight};
