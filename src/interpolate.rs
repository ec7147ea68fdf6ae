use crate::error::{finite, ConversionError};

/// Evaluates the line through `(x1, y1)` and `(x2, y2)` at `sample`.
///
/// `x1` and `x2` are in raw ADC units, like `sample`. Samples outside the
/// two points are extrapolated.
///
/// # Examples
///
/// ```
/// use analog_gauge::interpolate_two_point;
///
/// // 102 -> 0 psi, 921 -> 100 psi
/// let psi = interpolate_two_point(102.0, 0.0, 921.0, 100.0, 511).unwrap();
/// assert!((psi - 49.93).abs() < 0.01);
/// ```
pub fn interpolate_two_point(
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    sample: u32,
) -> Result<f32, ConversionError> {
    if x1 == x2 {
        return Err(ConversionError::InvalidCalibration);
    }

    let slope = (y2 - y1) / (x2 - x1);

    finite(y1 + slope * (sample as f32 - x1))
}

/// Evaluates `slope * (sample / divider) + intercept`.
///
/// `divider` scales the raw sample back up for sensors read through a
/// voltage divider.
///
/// # Examples
///
/// ```
/// use analog_gauge::interpolate_slope_intercept;
///
/// assert_eq!(interpolate_slope_intercept(2.0, 1.0, 2.0, 512), Ok(513.0));
/// ```
pub fn interpolate_slope_intercept(
    slope: f32,
    intercept: f32,
    divider: f32,
    sample: u32,
) -> Result<f32, ConversionError> {
    if divider == 0.0 {
        return Err(ConversionError::InvalidCalibration);
    }

    finite(slope * (sample as f32 / divider) + intercept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_point() {
        assert_eq!(interpolate_two_point(0.0, 0.0, 10.0, 100.0, 0), Ok(0.0));
        assert_eq!(interpolate_two_point(0.0, 0.0, 10.0, 100.0, 2), Ok(20.0));
        assert_eq!(interpolate_two_point(0.0, 0.0, 10.0, 100.0, 5), Ok(50.0));
        assert_eq!(interpolate_two_point(0.0, 0.0, 10.0, 100.0, 10), Ok(100.0));
    }

    #[test]
    fn two_point_flipped_y() {
        assert_eq!(interpolate_two_point(0.0, 100.0, 10.0, 0.0, 0), Ok(100.0));
        assert_eq!(interpolate_two_point(0.0, 100.0, 10.0, 0.0, 2), Ok(80.0));
        assert_eq!(interpolate_two_point(0.0, 100.0, 10.0, 0.0, 5), Ok(50.0));
        assert_eq!(interpolate_two_point(0.0, 100.0, 10.0, 0.0, 10), Ok(0.0));
    }

    #[test]
    fn two_point_hits_calibration_points_and_midpoint() {
        assert_eq!(interpolate_two_point(192.0, 5.0, 832.0, 10.0, 192), Ok(5.0));
        assert_eq!(interpolate_two_point(192.0, 5.0, 832.0, 10.0, 832), Ok(10.0));
        assert_eq!(interpolate_two_point(192.0, 5.0, 832.0, 10.0, 512), Ok(7.5));
    }

    #[test]
    fn two_point_extrapolates() {
        assert_eq!(interpolate_two_point(128.0, 10.0, 256.0, 20.0, 0), Ok(0.0));
        assert_eq!(interpolate_two_point(128.0, 10.0, 256.0, 20.0, 384), Ok(30.0));
    }

    #[test]
    fn two_point_rejects_vertical_line() {
        assert_eq!(
            interpolate_two_point(100.0, 10.0, 100.0, 20.0, 100),
            Err(ConversionError::InvalidCalibration)
        );
    }

    #[test]
    fn slope_intercept() {
        assert_eq!(interpolate_slope_intercept(2.0, 1.0, 2.0, 512), Ok(513.0));
        assert_eq!(interpolate_slope_intercept(0.5, -10.0, 1.0, 0), Ok(-10.0));
    }

    #[test]
    fn slope_intercept_rejects_zero_divider() {
        assert_eq!(
            interpolate_slope_intercept(2.0, 1.0, 0.0, 512),
            Err(ConversionError::InvalidCalibration)
        );
    }

    #[test]
    fn pure() {
        let first = interpolate_two_point(102.0, 0.0, 921.0, 100.0, 333).unwrap();
        let second = interpolate_two_point(102.0, 0.0, 921.0, 100.0, 333).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }
}
