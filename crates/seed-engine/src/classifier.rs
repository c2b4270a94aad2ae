//! Formatter inference from field descriptors.
//!
//! Rules are tried in order and the first match wins:
//!
//! 1. A non-unique default becomes a constant.
//! 2. References resolve through a [`Relation`].
//! 3. Auto-increment primary keys are left to storage. Other primary keys
//!    are generated like any unique field.
//! 4. Enumerated values are picked uniformly.
//! 5. Well-known field names map to semantic categories, when the category
//!    fits the declared kind.
//! 6. The declared kind maps to a category honoring its bounds.
//!
//! Overrides are applied before classification by the caller.

use crate::error::{SeedError, SeedResult};
use crate::formatter::Formatter;
use crate::relation::Relation;
use rand::Rng;
use seed_core::{FieldDescriptor, FieldKind, IntegerWidth, IpProtocol};
use seed_generator::faker::SINGLE_WORD_THRESHOLD;
use seed_generator::{Category, Faker};

/// Array length range for generated array fields.
const ARRAY_LENGTH: (usize, usize) = (1, 5);

/// Infer the formatter for a field.
///
/// Returns `None` for auto-increment primary keys, which storage assigns.
pub fn classify(
    record_type: &str,
    field: &FieldDescriptor,
    faker: &mut Faker,
) -> SeedResult<Option<Formatter>> {
    if let Some(default) = &field.default {
        if !field.unique {
            return Ok(Some(Formatter::Constant(default.clone())));
        }
    }

    if let Some(relation) = Relation::from_field(field) {
        return Ok(Some(Formatter::Relation(relation)));
    }

    if field.is_auto_primary_key() {
        return Ok(None);
    }

    let allowed = field.allowed_values();
    if !allowed.is_empty() {
        return Ok(Some(Formatter::Choice(allowed.to_vec())));
    }

    if let Some(category) = guess_by_name(field) {
        return Ok(Some(Formatter::Generate {
            category,
            unique: field.enforces_uniqueness(),
        }));
    }

    guess_by_kind(record_type, field, faker).map(Some)
}

/// Category implied by a well-known field name, if compatible with the kind.
pub fn guess_by_name(field: &FieldDescriptor) -> Option<Category> {
    let name = field.name.to_lowercase();

    if name.starts_with("is_") {
        return field.kind.is_bool().then_some(Category::Boolean);
    }
    if name.ends_with("_at") {
        return field.kind.is_date_time().then_some(Category::DateTime);
    }

    let category = match name.as_str() {
        "first_name" | "firstname" | "first" => Category::FirstName,
        "last_name" | "lastname" | "last" => Category::LastName,
        "username" | "login" | "nickname" => Category::UserName,
        "email" | "email_address" => Category::Email,
        "phone_number" | "phonenumber" | "phone" => Category::PhoneNumber,
        "address" => Category::Address,
        "city" => Category::City,
        "streetaddress" | "street_address" => Category::StreetAddress,
        "postcode" | "zipcode" => Category::Postcode,
        "state" => Category::State,
        "country" => Category::Country,
        "title" => Category::Sentence,
        "body" | "summary" | "description" => Category::Text {
            max_length: field.max_length,
        },
        _ => return None,
    };
    field.kind.is_string_like().then_some(category)
}

/// Formatter implied by the declared kind.
pub fn guess_by_kind(
    record_type: &str,
    field: &FieldDescriptor,
    faker: &mut Faker,
) -> SeedResult<Formatter> {
    if let FieldKind::Array { of } = &field.kind {
        let element = kind_category(of, field, faker)
            .ok_or_else(|| unsupported(record_type, field))?;
        return Ok(Formatter::Array {
            element,
            min_length: ARRAY_LENGTH.0,
            max_length: ARRAY_LENGTH.1,
        });
    }

    let category =
        kind_category(&field.kind, field, faker).ok_or_else(|| unsupported(record_type, field))?;
    Ok(Formatter::Generate {
        category,
        unique: field.enforces_uniqueness(),
    })
}

fn kind_category(kind: &FieldKind, field: &FieldDescriptor, faker: &mut Faker) -> Option<Category> {
    let category = match kind {
        FieldKind::Bool if field.nullable => Category::NullBoolean,
        FieldKind::Bool => Category::Boolean,
        FieldKind::Integer { width, unsigned } => integer_category(*width, *unsigned),
        FieldKind::Decimal { decimal_places, .. } => Category::DecimalFraction {
            scale: *decimal_places,
        },
        FieldKind::Float => Category::Fraction,
        FieldKind::String => match field.max_length {
            Some(max_length) if max_length < SINGLE_WORD_THRESHOLD => Category::Word,
            max_length => Category::Text { max_length },
        },
        FieldKind::Text => Category::Text {
            max_length: field.max_length,
        },
        FieldKind::Date => Category::Date,
        FieldKind::DateTime => Category::DateTime,
        FieldKind::Time => Category::Time,
        FieldKind::Duration => Category::Duration,
        FieldKind::Uuid => Category::Uuid,
        FieldKind::Binary => Category::Binary,
        FieldKind::Email => Category::Email,
        FieldKind::Url => Category::Uri,
        FieldKind::Slug => Category::Slug,
        FieldKind::IpAddress { protocol } => match protocol {
            IpProtocol::Ipv4 => Category::Ipv4,
            IpProtocol::Ipv6 => Category::Ipv6,
            IpProtocol::Both if faker.rng().random_bool(0.5) => Category::Ipv4,
            IpProtocol::Both => Category::Ipv6,
        },
        FieldKind::FilePath => Category::FileName,
        FieldKind::CommaSeparatedInt => Category::CommaSeparatedInts,
        FieldKind::Json => Category::Json,
        FieldKind::Auto
        | FieldKind::Enum { .. }
        | FieldKind::Array { .. }
        | FieldKind::ForeignKey { .. }
        | FieldKind::OneToOne { .. }
        | FieldKind::ManyToMany { .. }
        | FieldKind::Custom { .. } => return None,
    };
    Some(category)
}

fn integer_category(width: IntegerWidth, unsigned: bool) -> Category {
    match (width, unsigned) {
        (IntegerWidth::Small, true) => Category::UIntRange { min: 0, max: 65535 },
        (IntegerWidth::Small, false) => Category::IntRange {
            min: -32768,
            max: 32767,
        },
        (IntegerWidth::Regular, true) => Category::UIntRange {
            min: 0,
            max: 4_294_967_295,
        },
        (IntegerWidth::Regular, false) => Category::IntRange {
            min: -4_294_967_295,
            max: 4_294_967_295,
        },
        (IntegerWidth::Big, true) => Category::UIntRange {
            min: 0,
            max: u64::MAX,
        },
        (IntegerWidth::Big, false) => Category::IntRange {
            min: -i64::MAX,
            max: i64::MAX,
        },
    }
}

fn unsupported(record_type: &str, field: &FieldDescriptor) -> SeedError {
    SeedError::UnsupportedFieldKind {
        record_type: record_type.to_string(),
        field: Box::new(field.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seed_core::Value;
    use seed_generator::Locale;

    fn faker() -> Faker {
        Faker::new(Locale::En, 7)
    }

    fn category_of(formatter: Option<Formatter>) -> Category {
        match formatter {
            Some(Formatter::Generate { category, .. }) => category,
            other => panic!("expected a generated value, got {other:?}"),
        }
    }

    #[test]
    fn test_default_becomes_constant() {
        let field = FieldDescriptor::new("status", FieldKind::String).with_default("draft");
        let formatter = classify("game", &field, &mut faker()).unwrap();
        assert!(matches!(formatter, Some(Formatter::Constant(Value::String(s))) if s == "draft"));
    }

    #[test]
    fn test_unique_default_is_generated() {
        let field = FieldDescriptor::new("code", FieldKind::String)
            .with_default("x")
            .unique();
        let formatter = classify("game", &field, &mut faker()).unwrap();
        assert!(matches!(
            formatter,
            Some(Formatter::Generate { unique: true, .. })
        ));
    }

    #[test]
    fn test_primary_key_skipped() {
        let field = FieldDescriptor::new("id", FieldKind::Auto);
        assert!(classify("game", &field, &mut faker()).unwrap().is_none());
    }

    #[test]
    fn test_declared_primary_key_is_generated() {
        let field = FieldDescriptor::new("code", FieldKind::Uuid).primary_key();
        let formatter = classify("token", &field, &mut faker()).unwrap();
        assert!(matches!(
            formatter,
            Some(Formatter::Generate {
                category: Category::Uuid,
                unique: true,
            })
        ));
    }

    #[test]
    fn test_reference_becomes_relation() {
        let field = FieldDescriptor::new(
            "game",
            FieldKind::ForeignKey {
                to: "game".to_string(),
            },
        );
        let formatter = classify("player", &field, &mut faker()).unwrap();
        assert!(matches!(formatter, Some(Formatter::Relation(relation)) if relation.target == "game"));
    }

    #[test]
    fn test_choices_and_enums() {
        let field = FieldDescriptor::new("level", FieldKind::Integer {
            width: IntegerWidth::Small,
            unsigned: false,
        })
        .with_choices(vec![Value::Int(1), Value::Int(2)]);
        let formatter = classify("game", &field, &mut faker()).unwrap();
        assert!(matches!(formatter, Some(Formatter::Choice(values)) if values.len() == 2));

        let field = FieldDescriptor::new(
            "mode",
            FieldKind::Enum {
                values: vec![Value::from("solo"), Value::from("team")],
            },
        );
        let formatter = classify("game", &field, &mut faker()).unwrap();
        assert!(matches!(formatter, Some(Formatter::Choice(values)) if values.len() == 2));
    }

    #[test]
    fn test_name_guesses() {
        let cases = [
            ("first_name", Category::FirstName),
            ("LastName", Category::LastName),
            ("nickname", Category::UserName),
            ("email", Category::Email),
            ("phone", Category::PhoneNumber),
            ("city", Category::City),
            ("zipcode", Category::Postcode),
            ("country", Category::Country),
            ("title", Category::Sentence),
        ];
        for (name, expected) in cases {
            let field = FieldDescriptor::new(name, FieldKind::String).with_max_length(100);
            assert_eq!(
                category_of(classify("player", &field, &mut faker()).unwrap()),
                expected,
                "field {name}"
            );
        }

        let active = FieldDescriptor::new("is_active", FieldKind::Bool);
        assert_eq!(
            category_of(classify("player", &active, &mut faker()).unwrap()),
            Category::Boolean
        );

        let created = FieldDescriptor::new("created_at", FieldKind::DateTime);
        assert_eq!(
            category_of(classify("player", &created, &mut faker()).unwrap()),
            Category::DateTime
        );
    }

    #[test]
    fn test_name_guess_requires_compatible_kind() {
        let field = FieldDescriptor::new("email", FieldKind::Integer {
            width: IntegerWidth::Regular,
            unsigned: true,
        });
        assert_eq!(
            category_of(classify("player", &field, &mut faker()).unwrap()),
            Category::UIntRange {
                min: 0,
                max: 4_294_967_295
            }
        );
    }

    #[test]
    fn test_integer_ranges() {
        let small = FieldDescriptor::new("score", FieldKind::Integer {
            width: IntegerWidth::Small,
            unsigned: true,
        });
        assert_eq!(
            category_of(classify("game", &small, &mut faker()).unwrap()),
            Category::UIntRange { min: 0, max: 65535 }
        );

        let big = FieldDescriptor::new("total", FieldKind::Integer {
            width: IntegerWidth::Big,
            unsigned: false,
        });
        assert_eq!(
            category_of(classify("game", &big, &mut faker()).unwrap()),
            Category::IntRange {
                min: -i64::MAX,
                max: i64::MAX
            }
        );
    }

    #[test]
    fn test_strings_honor_max_length() {
        let short = FieldDescriptor::new("code", FieldKind::String).with_max_length(3);
        assert_eq!(
            category_of(classify("game", &short, &mut faker()).unwrap()),
            Category::Word
        );

        let long = FieldDescriptor::new("name", FieldKind::String).with_max_length(40);
        assert_eq!(
            category_of(classify("game", &long, &mut faker()).unwrap()),
            Category::Text {
                max_length: Some(40)
            }
        );
    }

    #[test]
    fn test_nullable_bool() {
        let field = FieldDescriptor::new("verified", FieldKind::Bool).nullable();
        assert_eq!(
            category_of(classify("player", &field, &mut faker()).unwrap()),
            Category::NullBoolean
        );
    }

    #[test]
    fn test_ip_address_protocol() {
        let field = FieldDescriptor::new(
            "host",
            FieldKind::IpAddress {
                protocol: IpProtocol::Ipv6,
            },
        );
        assert_eq!(
            category_of(classify("server", &field, &mut faker()).unwrap()),
            Category::Ipv6
        );

        let both = FieldDescriptor::new("remote", FieldKind::IpAddress {
            protocol: IpProtocol::Both,
        });
        let category = category_of(classify("server", &both, &mut faker()).unwrap());
        assert!(category == Category::Ipv4 || category == Category::Ipv6);
    }

    #[test]
    fn test_array_of_scalars() {
        let field = FieldDescriptor::new(
            "scores",
            FieldKind::Array {
                of: Box::new(FieldKind::Float),
            },
        );
        let formatter = classify("game", &field, &mut faker()).unwrap();
        assert!(matches!(
            formatter,
            Some(Formatter::Array {
                element: Category::Fraction,
                min_length: 1,
                max_length: 5
            })
        ));
    }

    #[test]
    fn test_unsupported_kinds() {
        let custom = FieldDescriptor::new(
            "area",
            FieldKind::Custom {
                name: "geometry".to_string(),
            },
        );
        assert!(matches!(
            classify("game", &custom, &mut faker()),
            Err(SeedError::UnsupportedFieldKind { .. })
        ));

        let references = FieldDescriptor::new(
            "owners",
            FieldKind::Array {
                of: Box::new(FieldKind::ForeignKey {
                    to: "player".to_string(),
                }),
            },
        );
        assert!(matches!(
            classify("game", &references, &mut faker()),
            Err(SeedError::UnsupportedFieldKind { .. })
        ));
    }
}
