use crate::error::{finite, ConversionError};
use embedded_hal::PwmPin;
use log::{debug, warn};

/// Default resolution of the analog output in bits.
pub const DEFAULT_OUTPUT_RESOLUTION: u32 = 8;

/// How output voltages map onto PWM duty values.
///
/// - `reference_voltage`: The voltage at full duty (V)
/// - `resolution_bits`: The resolution of the output in bits
///
/// Boards differ on the reference voltage (3.3 V and 5 V are both common),
/// so there is no default for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputConfig {
    pub reference_voltage: f32,
    pub resolution_bits: u32,
}

impl OutputConfig {
    /// Returns a config for an 8-bit output.
    pub const fn new(reference_voltage: f32) -> Self {
        Self {
            reference_voltage,
            resolution_bits: DEFAULT_OUTPUT_RESOLUTION,
        }
    }

    /// Returns the raw duty for `voltage`, truncated toward zero and not
    /// limited to the output range.
    ///
    /// Only meaningful for a config that passed `validate`.
    pub(crate) fn raw_duty(&self, voltage: f32) -> i32 {
        (voltage / self.reference_voltage * self.steps() as f32) as i32
    }

    /// Returns the duty for `voltage`, saturated to the output range.
    pub(crate) fn duty(&self, voltage: f32) -> u16 {
        self.raw_duty(voltage).clamp(0, self.max_duty() as i32) as u16
    }

    pub(crate) fn max_duty(&self) -> u16 {
        (self.steps() - 1) as u16
    }

    fn steps(&self) -> u32 {
        1 << self.resolution_bits
    }

    fn validate(&self) -> Result<(), ConversionError> {
        let valid = self.reference_voltage.is_finite()
            && self.reference_voltage > 0.0
            && (1..=16).contains(&self.resolution_bits);

        if valid {
            Ok(())
        } else {
            Err(ConversionError::InvalidCalibration)
        }
    }
}

/// Configuration for a constant-current gauge driver.
///
/// The target current for a value is `value * slope + intercept`; the
/// driver produces it as a voltage across `shunt_resistance`, limited to
/// `[min_voltage, max_voltage]`.
///
/// # Examples
///
/// ```
/// use analog_gauge::{CurrentLoopConfig, OutputConfig};
///
/// // 0-100 psi on a 4-20 mA gauge through a 150 Ω shunt
/// let config = CurrentLoopConfig {
///     slope: 0.00016,
///     intercept: 0.004,
///     shunt_resistance: 150.0,
///     min_voltage: 0.6,
///     max_voltage: 3.0,
///     output: OutputConfig::new(3.3),
/// };
/// # assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentLoopConfig {
    pub slope: f32,
    pub intercept: f32,
    pub shunt_resistance: f32,
    pub min_voltage: f32,
    pub max_voltage: f32,
    pub output: OutputConfig,
}

impl CurrentLoopConfig {
    pub fn validate(&self) -> Result<(), ConversionError> {
        self.output.validate()?;

        let valid = [
            self.slope,
            self.intercept,
            self.shunt_resistance,
            self.min_voltage,
            self.max_voltage,
        ]
        .iter()
        .all(|v| v.is_finite())
            && self.min_voltage <= self.max_voltage;

        if valid {
            Ok(())
        } else {
            Err(ConversionError::InvalidCalibration)
        }
    }
}

/// The result of one current-loop computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drive {
    /// The output voltage the value asks for (V), before clamping.
    pub voltage: f32,
    /// The duty for `voltage`, before clamping.
    pub target_duty: i32,
    /// The duty for the limited voltage, in the resolution of the
    /// `OutputConfig`.
    pub duty: u16,
    /// Whether `voltage` was outside `[min_voltage, max_voltage]`.
    pub clamped: bool,
}

/// Computes the output duty for a target `value`.
///
/// # Examples
///
/// ```
/// use analog_gauge::{current_loop_duty, CurrentLoopConfig, OutputConfig};
///
/// let config = CurrentLoopConfig {
///     slope: 1.0,
///     intercept: 0.0,
///     shunt_resistance: 1.0,
///     min_voltage: 1.0,
///     max_voltage: 4.0,
///     output: OutputConfig::new(5.0),
/// };
///
/// let drive = current_loop_duty(2.5, &config).unwrap();
/// assert_eq!(drive.duty, 128);
///
/// // Below `min_voltage`, the duty for `min_voltage` is written
/// let drive = current_loop_duty(0.5, &config).unwrap();
/// assert_eq!((drive.target_duty, drive.duty), (25, 51));
/// ```
pub fn current_loop_duty(
    value: f32,
    config: &CurrentLoopConfig,
) -> Result<Drive, ConversionError> {
    config.validate()?;

    let voltage = finite((value * config.slope + config.intercept) * config.shunt_resistance)?;
    let target_duty = config.output.raw_duty(voltage);

    let limited = voltage.clamp(config.min_voltage, config.max_voltage);

    Ok(Drive {
        voltage,
        target_duty,
        duty: config.output.duty(limited),
        clamped: limited != voltage,
    })
}

/// A constant-current gauge driven by a PWM output.
#[derive(Debug)]
pub struct CurrentLoop<Pin> {
    pin: Pin,
    config: CurrentLoopConfig,
}

impl<Pin> CurrentLoop<Pin>
where
    Pin: PwmPin<Duty = u16>,
{
    /// Enables `pin` and returns a driver for it, or an error if `config`
    /// is invalid.
    pub fn new(mut pin: Pin, config: CurrentLoopConfig) -> Result<Self, ConversionError> {
        config.validate()?;

        pin.enable();

        Ok(Self { pin, config })
    }

    /// Destroys the driver and returns the `Pin`.
    pub fn free(self) -> Pin {
        self.pin
    }

    pub fn config(&self) -> &CurrentLoopConfig {
        &self.config
    }

    /// Drives the gauge to `value`, writing the clamped duty to the pin.
    ///
    /// The duty is rescaled from the `OutputConfig` resolution to the
    /// pin's [`get_max_duty`](PwmPin::get_max_duty).
    pub fn set(&mut self, value: f32) -> Result<Drive, ConversionError> {
        let drive = current_loop_duty(value, &self.config)?;
        let pin_duty = self.pin_duty(drive.duty);

        debug!(
            "current loop: {} -> {} V, duty {} of {}",
            value,
            drive.voltage,
            drive.target_duty,
            self.config.output.max_duty()
        );

        if drive.clamped {
            warn!(
                "current loop: {} V outside {}..{} V, writing duty {}",
                drive.voltage, self.config.min_voltage, self.config.max_voltage, pin_duty
            );
        }

        self.pin.set_duty(pin_duty);

        Ok(drive)
    }

    fn pin_duty(&self, duty: u16) -> u16 {
        let pin_max = u32::from(self.pin.get_max_duty());
        let config_max = u32::from(self.config.output.max_duty());

        (u32::from(duty) * pin_max / config_max) as u16
    }
}
