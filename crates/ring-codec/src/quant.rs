//! Fixed-point quantization used by the chunk geometry wire format.

/// Quantization step for the X axis (arc-length direction), in metres.
pub const Q_X: f64 = 0.01;

/// Quantization step for the Y axis (height), in metres.
pub const Q_Y: f64 = 0.001;

/// Quantization step for the Z axis (radial direction), in metres.
pub const Q_Z: f64 = 0.01;

/// Quantize a metre value to the nearest integer step of `q`.
pub fn quantize(value: f64, q: f64) -> i64 {
    (value / q).round() as i64
}

/// Recover a metre value from a quantized step count.
pub fn dequantize(quant: i64, q: f64) -> f64 {
    quant as f64 * q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_within_half_step() {
        let original = 12345.678;
        let q = quantize(original, Q_X);
        let back = dequantize(q, Q_X);
        assert!((back - original).abs() <= Q_X / 2.0 + f64::EPSILON);
    }

    #[test]
    fn zero_round_trips_exactly() {
        assert_eq!(dequantize(quantize(0.0, Q_Y), Q_Y), 0.0);
    }
}
