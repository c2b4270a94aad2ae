//! Seeded, locale-aware fake value generator.

use crate::category::Category;
use crate::generators::{binary, network, numeric, temporal, uuid};
use crate::locale::{localized, Locale};
use fake::faker::address::raw::{BuildingNumber, CityName, CountryName, PostCode, StateName, StreetName};
use fake::faker::internet::raw::{DomainSuffix, SafeEmail, Username};
use fake::faker::lorem::raw::{Paragraph, Sentence, Word, Words};
use fake::faker::name::raw::{FirstName, LastName};
use fake::faker::phone_number::raw::PhoneNumber;
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use seed_core::Value;

/// Default bound for unbounded text.
pub const DEFAULT_TEXT_LENGTH: usize = 200;

/// Strings shorter than this bound are generated as a single word.
pub const SINGLE_WORD_THRESHOLD: usize = 5;

/// Number of integers in a comma separated list.
const COMMA_SEPARATED_COUNT: usize = 10;

/// Generator of fake values for one locale.
///
/// The generator owns a seeded random number generator, so two fakers built
/// with the same locale and seed produce the same sequence of values.
pub struct Faker {
    /// Locale for names, addresses and text
    locale: Locale,
    /// Seeded random number generator for reproducibility
    rng: StdRng,
}

impl Faker {
    /// Create a new faker for `locale` seeded with `seed`.
    pub fn new(locale: Locale, seed: u64) -> Self {
        Self {
            locale,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Locale of this faker.
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Underlying random number generator, for callers sampling their own values.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Generate a value for the given category.
    pub fn generate(&mut self, category: &Category) -> Value {
        match category {
            Category::FirstName => Value::String(self.first_name()),
            Category::LastName => Value::String(self.last_name()),
            Category::UserName => Value::String(self.user_name()),
            Category::Email => Value::String(self.email()),
            Category::PhoneNumber => Value::String(self.phone_number()),
            Category::Address => Value::String(self.address()),
            Category::StreetAddress => Value::String(self.street_address()),
            Category::City => Value::String(self.city()),
            Category::Postcode => Value::String(self.postcode()),
            Category::State => Value::String(self.state()),
            Category::Country => Value::String(self.country()),
            Category::Sentence => Value::String(self.sentence()),
            Category::Text { max_length } => {
                Value::String(self.text(max_length.unwrap_or(DEFAULT_TEXT_LENGTH)))
            }
            Category::Word => Value::String(self.word()),
            Category::Boolean => Value::Bool(self.rng.random_bool(0.5)),
            Category::NullBoolean => match self.rng.random_range(0..3) {
                0 => Value::Null,
                1 => Value::Bool(true),
                _ => Value::Bool(false),
            },
            Category::Date => temporal::generate_date(&mut self.rng),
            Category::DateTime => temporal::generate_date_time(&mut self.rng),
            Category::Time => temporal::generate_time(&mut self.rng),
            Category::Duration => temporal::generate_duration(&mut self.rng),
            Category::Uuid => uuid::generate_uuid_v4(&mut self.rng),
            Category::Uri => Value::String(self.uri()),
            Category::Slug => Value::String(self.slug()),
            Category::Ipv4 => network::generate_ipv4(&mut self.rng),
            Category::Ipv6 => network::generate_ipv6(&mut self.rng),
            Category::FileName => {
                let stem = self.word();
                Value::String(binary::file_name(&mut self.rng, &stem))
            }
            Category::Binary => Value::Bytes(self.text(512).into_bytes()),
            Category::Json => Value::Json(self.json()),
            Category::CommaSeparatedInts => {
                numeric::generate_comma_separated_ints(&mut self.rng, COMMA_SEPARATED_COUNT)
            }
            Category::IntRange { min, max } => numeric::generate_int_range(&mut self.rng, *min, *max),
            Category::UIntRange { min, max } => {
                numeric::generate_uint_range(&mut self.rng, *min, *max)
            }
            Category::Fraction => numeric::generate_fraction(&mut self.rng),
            Category::DecimalFraction { scale } => {
                numeric::generate_decimal_fraction(&mut self.rng, *scale)
            }
        }
    }

    /// Person first name.
    pub fn first_name(&mut self) -> String {
        localized!(self.locale, &mut self.rng, FirstName)
    }

    /// Person last name.
    pub fn last_name(&mut self) -> String {
        localized!(self.locale, &mut self.rng, LastName)
    }

    /// Login name.
    pub fn user_name(&mut self) -> String {
        localized!(self.locale, &mut self.rng, Username)
    }

    /// Email address on a reserved example domain.
    pub fn email(&mut self) -> String {
        localized!(self.locale, &mut self.rng, SafeEmail)
    }

    /// Phone number.
    pub fn phone_number(&mut self) -> String {
        localized!(self.locale, &mut self.rng, PhoneNumber)
    }

    /// Street line: building number and street name.
    pub fn street_address(&mut self) -> String {
        let number: String = localized!(self.locale, &mut self.rng, BuildingNumber);
        let street: String = localized!(self.locale, &mut self.rng, StreetName);
        format!("{number} {street}")
    }

    /// Full postal address on two lines.
    pub fn address(&mut self) -> String {
        let street = self.street_address();
        let city = self.city();
        let postcode = self.postcode();
        format!("{street}\n{city} {postcode}")
    }

    /// City name.
    pub fn city(&mut self) -> String {
        localized!(self.locale, &mut self.rng, CityName)
    }

    /// Postal code.
    pub fn postcode(&mut self) -> String {
        localized!(self.locale, &mut self.rng, PostCode)
    }

    /// State or region name.
    pub fn state(&mut self) -> String {
        localized!(self.locale, &mut self.rng, StateName)
    }

    /// Country name.
    pub fn country(&mut self) -> String {
        localized!(self.locale, &mut self.rng, CountryName)
    }

    /// A single word.
    pub fn word(&mut self) -> String {
        localized!(self.locale, &mut self.rng, Word)
    }

    /// One sentence.
    pub fn sentence(&mut self) -> String {
        localized!(self.locale, &mut self.rng, Sentence, 3..8)
    }

    /// Paragraph text of at most `max_length` characters.
    ///
    /// Bounds under [`SINGLE_WORD_THRESHOLD`] yield a single (truncated) word.
    /// Otherwise whole sentences are accumulated while they fit; a first
    /// sentence that is already too long is cut at the bound.
    pub fn text(&mut self, max_length: usize) -> String {
        if max_length < SINGLE_WORD_THRESHOLD {
            return self.word().chars().take(max_length).collect();
        }

        let mut text = String::new();
        let mut length = 0;
        for _ in 0..max_length {
            let sentence = if max_length < 25 {
                let words: Vec<String> = localized!(self.locale, &mut self.rng, Words, 1..4);
                format!("{}.", words.join(" "))
            } else {
                let paragraph: String = localized!(self.locale, &mut self.rng, Paragraph, 1..2);
                paragraph
            };
            let sentence_length = sentence.chars().count();

            if text.is_empty() {
                if sentence_length > max_length {
                    return sentence.chars().take(max_length).collect();
                }
                text = sentence;
                length = sentence_length;
            } else if length + 1 + sentence_length <= max_length {
                text.push(' ');
                text.push_str(&sentence);
                length += 1 + sentence_length;
            } else {
                break;
            }
        }
        text
    }

    /// URI on a generated domain.
    pub fn uri(&mut self) -> String {
        let host = self.word().to_lowercase();
        let suffix: String = localized!(self.locale, &mut self.rng, DomainSuffix);
        let page = self.slug();
        format!("https://www.{host}.{suffix}/{page}/")
    }

    /// URL slug of one to three lower-case words.
    pub fn slug(&mut self) -> String {
        let words: Vec<String> = localized!(self.locale, &mut self.rng, Words, 1..4);
        words
            .iter()
            .map(|w| w.to_lowercase())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Small JSON object with word keys and sentence values.
    pub fn json(&mut self) -> serde_json::Value {
        let entries = self.rng.random_range(1..=3);
        let mut object = serde_json::Map::new();
        for _ in 0..entries {
            let key = self.word();
            let value = self.sentence();
            object.insert(key, serde_json::Value::String(value));
        }
        serde_json::Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_respects_bound() {
        let mut faker = Faker::new(Locale::En, 42);

        for max_length in [1, 4, 5, 12, 24, 25, 80, 200] {
            for _ in 0..20 {
                let text = faker.text(max_length);
                assert!(
                    text.chars().count() <= max_length,
                    "{text:?} longer than {max_length}"
                );
                assert!(!text.is_empty());
            }
        }
    }

    #[test]
    fn test_textual_categories_are_strings() {
        let mut faker = Faker::new(Locale::En, 7);
        let categories = [
            Category::FirstName,
            Category::LastName,
            Category::UserName,
            Category::Email,
            Category::PhoneNumber,
            Category::Address,
            Category::StreetAddress,
            Category::City,
            Category::Postcode,
            Category::State,
            Category::Country,
            Category::Sentence,
            Category::Word,
            Category::Uri,
            Category::Slug,
            Category::Ipv4,
            Category::Ipv6,
            Category::FileName,
            Category::CommaSeparatedInts,
            Category::Text {
                max_length: Some(30),
            },
        ];

        for category in categories {
            assert!(category.is_textual());
            let value = faker.generate(&category);
            assert!(
                matches!(value, Value::String(ref s) if !s.is_empty()),
                "{category:?} produced {value:?}"
            );
        }
    }

    #[test]
    fn test_email_shape() {
        let mut faker = Faker::new(Locale::En, 42);
        let email = faker.email();
        assert!(email.contains('@'));
    }

    #[test]
    fn test_slug_shape() {
        let mut faker = Faker::new(Locale::En, 42);
        let slug = faker.slug();
        assert!(!slug.contains(' '));
        assert_eq!(slug, slug.to_lowercase());
    }

    #[test]
    fn test_structured_categories() {
        let mut faker = Faker::new(Locale::En, 42);

        assert!(matches!(faker.generate(&Category::Boolean), Value::Bool(_)));
        assert!(matches!(faker.generate(&Category::Uuid), Value::Uuid(_)));
        assert!(matches!(faker.generate(&Category::Binary), Value::Bytes(_)));
        assert!(matches!(faker.generate(&Category::Json), Value::Json(_)));
        assert!(matches!(faker.generate(&Category::Duration), Value::Duration(_)));
        assert!(matches!(
            faker.generate(&Category::NullBoolean),
            Value::Null | Value::Bool(_)
        ));
    }

    #[test]
    fn test_deterministic_generation() {
        let mut faker1 = Faker::new(Locale::En, 42);
        let mut faker2 = Faker::new(Locale::En, 42);

        for category in [Category::FirstName, Category::Sentence, Category::Uuid] {
            assert_eq!(faker1.generate(&category), faker2.generate(&category));
        }
    }
}
