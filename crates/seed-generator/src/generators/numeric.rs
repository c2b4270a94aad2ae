//! Numeric value generators.

use rand::Rng;
use rust_decimal::Decimal;
use seed_core::Value;

/// Largest supported decimal scale; `10^18` still fits an `i64` mantissa.
pub const MAX_DECIMAL_SCALE: u32 = 18;

/// Generate a random integer in the given range (inclusive).
pub fn generate_int_range<R: Rng>(rng: &mut R, min: i64, max: i64) -> Value {
    if min >= max {
        return Value::Int(min);
    }
    Value::Int(rng.random_range(min..=max))
}

/// Generate a random unsigned integer in the given range (inclusive).
pub fn generate_uint_range<R: Rng>(rng: &mut R, min: u64, max: u64) -> Value {
    if min >= max {
        return Value::UInt(min);
    }
    Value::UInt(rng.random_range(min..=max))
}

/// Generate a random float in `[0, 1)`.
pub fn generate_fraction<R: Rng>(rng: &mut R) -> Value {
    Value::Float(rng.random::<f64>())
}

/// Generate a random decimal in `[0, 1)` with exactly `scale` fractional digits.
pub fn generate_decimal_fraction<R: Rng>(rng: &mut R, scale: u32) -> Value {
    let scale = scale.min(MAX_DECIMAL_SCALE);
    let bound = 10i64.pow(scale);
    let mantissa = rng.random_range(0..bound);
    Value::Decimal(Decimal::new(mantissa, scale))
}

/// Generate `count` comma separated integers.
pub fn generate_comma_separated_ints<R: Rng>(rng: &mut R, count: usize) -> Value {
    let ints: Vec<String> = (0..count)
        .map(|_| rng.random_range(-4_294_967_295i64..=4_294_967_295).to_string())
        .collect();
    Value::String(ints.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_int_range() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let value = generate_int_range(&mut rng, -32768, 32767);
            if let Value::Int(v) = value {
                assert!((-32768..=32767).contains(&v));
            } else {
                panic!("Expected Int value");
            }
        }
    }

    #[test]
    fn test_generate_uint_full_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_uint_range(&mut rng, 0, u64::MAX);
        assert!(matches!(value, Value::UInt(_)));
    }

    #[test]
    fn test_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(generate_int_range(&mut rng, 5, 5), Value::Int(5));
    }

    #[test]
    fn test_generate_fraction() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            if let Value::Float(v) = generate_fraction(&mut rng) {
                assert!((0.0..1.0).contains(&v));
            } else {
                panic!("Expected Float value");
            }
        }
    }

    #[test]
    fn test_generate_decimal_fraction() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            if let Value::Decimal(d) = generate_decimal_fraction(&mut rng, 3) {
                assert_eq!(d.scale(), 3);
                assert!(d >= Decimal::ZERO && d < Decimal::ONE);
            } else {
                panic!("Expected Decimal value");
            }
        }
    }

    #[test]
    fn test_comma_separated_ints() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_comma_separated_ints(&mut rng, 10);

        let s = value.as_str().unwrap();
        assert_eq!(s.split(',').count(), 10);
        assert!(s.split(',').all(|part| part.parse::<i64>().is_ok()));
    }
}
