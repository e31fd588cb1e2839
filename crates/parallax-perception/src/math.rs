//! Numeric helpers.

/// Clamp `value` into the interval spanned by `min` and `max`.
///
/// Unlike [`f64::clamp`] this never panics: when `min` is not below `max`
/// the bounds are used in reverse order, so `clamp(v, 5.0, -5.0)` behaves
/// like `clamp(v, -5.0, 5.0)`.
///
/// ```rust
/// use parallax_perception::math::clamp;
///
/// assert_eq!(clamp(12.0, -10.0, 10.0), 10.0);
/// assert_eq!(clamp(12.0, 10.0, -10.0), 10.0);
/// assert_eq!(clamp(-3.0, 10.0, -10.0), -3.0);
/// ```
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if min < max {
        if value < min {
            min
        } else if value > max {
            max
        } else {
            value
        }
    } else if value < max {
        max
    } else if value > min {
        min
    } else {
        value
    }
}
