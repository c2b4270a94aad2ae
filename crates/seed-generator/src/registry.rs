//! Per-locale generator cache.

use crate::faker::Faker;
use crate::locale::Locale;
use rand::Rng;
use std::collections::HashMap;

/// Owns one [`Faker`] per locale for the lifetime of a seeding session.
///
/// With a base seed every locale's faker is seeded deterministically from it;
/// without one each faker gets a random seed on first use.
pub struct GeneratorRegistry {
    /// Base seed for reproducible generation
    seed: Option<u64>,
    /// Fakers created so far, keyed by locale
    fakers: HashMap<Locale, Faker>,
}

impl GeneratorRegistry {
    /// Create an empty registry.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            fakers: HashMap::new(),
        }
    }

    /// Get the faker for `locale`, creating it on first use.
    pub fn faker(&mut self, locale: Locale) -> &mut Faker {
        let seed = self.seed;
        self.fakers.entry(locale).or_insert_with(|| {
            let seed = match seed {
                Some(base) => seed_for_locale(base, locale),
                None => rand::rng().random(),
            };
            tracing::debug!(locale = %locale, seed, "Creating faker");
            Faker::new(locale, seed)
        })
    }

    /// Number of fakers created so far.
    pub fn len(&self) -> usize {
        self.fakers.len()
    }

    /// Whether no faker has been created yet.
    pub fn is_empty(&self) -> bool {
        self.fakers.is_empty()
    }
}

/// Derive a locale's seed from the base seed.
fn seed_for_locale(base: u64, locale: Locale) -> u64 {
    let index = Locale::ALL.iter().position(|l| *l == locale).unwrap_or(0) as u64;
    base.wrapping_add(index.wrapping_mul(0x9E3779B97F4A7C15))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faker_is_cached_per_locale() {
        let mut registry = GeneratorRegistry::new(Some(42));
        assert!(registry.is_empty());

        registry.faker(Locale::En);
        registry.faker(Locale::En);
        registry.faker(Locale::JaJp);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.faker(Locale::JaJp).locale(), Locale::JaJp);
    }

    #[test]
    fn test_seeded_registries_agree() {
        let mut registry1 = GeneratorRegistry::new(Some(42));
        let mut registry2 = GeneratorRegistry::new(Some(42));

        let name1 = registry1.faker(Locale::En).first_name();
        let name2 = registry2.faker(Locale::En).first_name();
        assert_eq!(name1, name2);
    }

    #[test]
    fn test_locales_get_distinct_seeds() {
        assert_ne!(
            seed_for_locale(42, Locale::En),
            seed_for_locale(42, Locale::FrFr)
        );
        assert_eq!(seed_for_locale(42, Locale::En), 42);
    }
}
