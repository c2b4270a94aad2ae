//! UUID value generator.

use rand::Rng;
use seed_core::Value;
use uuid::{Builder, Uuid};

/// Draw a version 4 UUID from `rng`, so seeded runs repeat their keys.
pub fn generate_uuid_v4<R: Rng>(rng: &mut R) -> Value {
    Value::Uuid(random_uuid(rng))
}

fn random_uuid<R: Rng>(rng: &mut R) -> Uuid {
    Builder::from_random_bytes(rng.random()).into_uuid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uuid::Variant;

    #[test]
    fn test_version_and_variant_bits() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let uuid = random_uuid(&mut rng);
            assert_eq!(uuid.get_version_num(), 4);
            assert_eq!(uuid.get_variant(), Variant::RFC4122);
        }
    }

    #[test]
    fn test_same_seed_same_uuid() {
        let mut rng1 = StdRng::seed_from_u64(7);
        let mut rng2 = StdRng::seed_from_u64(7);

        let first = generate_uuid_v4(&mut rng1);
        assert_eq!(first, generate_uuid_v4(&mut rng2));
        assert_ne!(first, generate_uuid_v4(&mut rng1));
    }
}
