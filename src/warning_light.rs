use embedded_hal::digital::v2::OutputPin;
use log::debug;

/// What a warning light is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkMode {
    Off,
    Slow,
    Fast,
}

impl BlinkMode {
    /// Returns how long the light stays in each state, or `None` if it
    /// doesn't blink.
    pub fn half_period(self, period_ms: u32) -> Option<u32> {
        match self {
            BlinkMode::Off => None,
            BlinkMode::Slow => Some(period_ms),
            BlinkMode::Fast => Some(period_ms / 3),
        }
    }
}

/// Warning thresholds.
///
/// Normally values above `low` are a warning and values above `high` are
/// critical. With `reverse`, values below `high` are a warning and values
/// below `low` are critical (eg. oil pressure).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub low: f32,
    pub high: f32,
    pub reverse: bool,
}

impl Thresholds {
    /// Returns the blink mode for `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use analog_gauge::{BlinkMode, Thresholds};
    ///
    /// let coolant = Thresholds { low: 220.0, high: 240.0, reverse: false };
    /// assert_eq!(coolant.mode(190.0), BlinkMode::Off);
    /// assert_eq!(coolant.mode(230.0), BlinkMode::Slow);
    /// assert_eq!(coolant.mode(250.0), BlinkMode::Fast);
    ///
    /// let oil = Thresholds { low: 10.0, high: 25.0, reverse: true };
    /// assert_eq!(oil.mode(40.0), BlinkMode::Off);
    /// assert_eq!(oil.mode(20.0), BlinkMode::Slow);
    /// assert_eq!(oil.mode(5.0), BlinkMode::Fast);
    /// ```
    pub fn mode(&self, value: f32) -> BlinkMode {
        let (critical, warning) = if self.reverse {
            (value < self.low, value < self.high)
        } else {
            (value > self.high, value > self.low)
        };

        if critical {
            BlinkMode::Fast
        } else if warning {
            BlinkMode::Slow
        } else {
            BlinkMode::Off
        }
    }
}

/// Whether `deadline` has been reached at `now`, allowing for the
/// millisecond counter wrapping around.
fn reached(now: u32, deadline: u32) -> bool {
    now.wrapping_sub(deadline) < u32::MAX / 2
}

/// A warning light that blinks slowly past the warning threshold and fast
/// past the critical one.
///
/// The light owns its pin, so each pin has exactly one blink state. Call
/// [`update`](WarningLight::update) once per control loop cycle.
#[derive(Debug)]
pub struct WarningLight<Pin> {
    pin: Pin,
    thresholds: Thresholds,
    period_ms: u32,
    mode: BlinkMode,
    lit: bool,
    next_toggle: u32,
}

impl<Pin: OutputPin> WarningLight<Pin> {
    /// Turns `pin` off and returns a light driving it.
    ///
    /// `period_ms` is how long the light stays on (and off) when blinking
    /// slowly; fast blinking uses a third of it.
    ///
    /// `thresholds.low` must not be above `thresholds.high` or this
    /// function will panic when running in debug mode.
    pub fn new(mut pin: Pin, thresholds: Thresholds, period_ms: u32) -> Result<Self, Pin::Error> {
        debug_assert!(
            thresholds.low <= thresholds.high,
            "The low threshold must not be above the high threshold"
        );

        pin.set_low()?;

        Ok(Self {
            pin,
            thresholds,
            period_ms,
            mode: BlinkMode::Off,
            lit: false,
            next_toggle: 0,
        })
    }

    /// Destroys the light and returns the `Pin`.
    pub fn free(self) -> Pin {
        self.pin
    }

    pub fn mode(&self) -> BlinkMode {
        self.mode
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Updates the light for `value` at time `now_ms`.
    ///
    /// # Examples
    ///
    /// ```
    /// use analog_gauge::{BlinkMode, Thresholds, WarningLight};
    /// # use embedded_hal_mock::pin::{Mock, State, Transaction};
    /// #
    /// # let expectations = [
    /// #     Transaction::set(State::Low),
    /// #     Transaction::set(State::High),
    /// #     Transaction::set(State::Low),
    /// # ];
    /// # let pin = Mock::new(&expectations);
    ///
    /// let thresholds = Thresholds { low: 220.0, high: 240.0, reverse: false };
    /// let mut light = WarningLight::new(pin, thresholds, 500).unwrap();
    ///
    /// assert_eq!(light.update(230.0, 0), Ok(BlinkMode::Slow));
    /// assert!(light.is_lit());
    ///
    /// // Still on until the half period has passed
    /// light.update(230.0, 499).unwrap();
    /// assert!(light.is_lit());
    ///
    /// light.update(230.0, 500).unwrap();
    /// assert!(!light.is_lit());
    /// # light.free().done();
    /// ```
    pub fn update(&mut self, value: f32, now_ms: u32) -> Result<BlinkMode, Pin::Error> {
        let mode = self.thresholds.mode(value);

        if mode != self.mode {
            debug!("warning light: {:?} -> {:?} at {}", self.mode, mode, value);
        }

        match mode.half_period(self.period_ms) {
            None => {
                if self.lit {
                    self.set(false)?;
                }
            }
            Some(half_period) => {
                if self.mode == BlinkMode::Off {
                    self.set(true)?;
                    self.next_toggle = now_ms.wrapping_add(half_period);
                } else if mode != self.mode {
                    self.next_toggle = now_ms.wrapping_add(half_period);
                } else if reached(now_ms, self.next_toggle) {
                    self.set(!self.lit)?;
                    self.next_toggle = now_ms.wrapping_add(half_period);
                }
            }
        }

        self.mode = mode;

        Ok(mode)
    }

    fn set(&mut self, lit: bool) -> Result<(), Pin::Error> {
        if lit {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }

        self.lit = lit;

        Ok(())
    }
}
