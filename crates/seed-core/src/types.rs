//! Field kinds for the model-seed framework.
//!
//! This module defines `FieldKind`, the closed set of declared field kinds the
//! seeding engine dispatches on. The host schema adapter produces one
//! `FieldKind` per field; the classifier matches on it exhaustively.

use crate::values::Value;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;

/// Declared width of an integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegerWidth {
    /// 16-bit integer
    Small,
    /// 32-bit integer
    Regular,
    /// 64-bit integer
    Big,
}

/// Address family accepted by an IP address field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpProtocol {
    /// IPv4 only
    Ipv4,
    /// IPv6 only
    Ipv6,
    /// Either family
    #[default]
    Both,
}

/// Declared kind of a record field.
///
/// # YAML Format
///
/// Simple kinds can be specified as strings:
/// ```yaml
/// type: uuid
/// type: positive_int
/// type: date_time
/// ```
///
/// Parameterised kinds use object format:
/// ```yaml
/// type:
///   type: decimal
///   max_digits: 10
///   decimal_places: 2
/// type:
///   type: foreign_key
///   to: game
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Auto-increment primary key, assigned by storage
    Auto,

    /// Boolean value
    Bool,

    /// Integer with declared width and signedness
    Integer {
        /// Declared width
        width: IntegerWidth,
        /// Whether negative values are excluded
        unsigned: bool,
    },

    /// Exact decimal
    Decimal {
        /// Total number of digits
        max_digits: u32,
        /// Number of digits after the decimal point
        decimal_places: u32,
    },

    /// Floating point
    Float,

    /// Bounded string (bound comes from the field's `max_length`)
    String,

    /// Unbounded text
    Text,

    /// Date only
    Date,

    /// Date and time
    DateTime,

    /// Time only
    Time,

    /// Time duration
    Duration,

    /// UUID
    Uuid,

    /// Binary blob
    Binary,

    /// Email address
    Email,

    /// URL
    Url,

    /// URL slug
    Slug,

    /// IP address
    IpAddress {
        /// Accepted address family
        protocol: IpProtocol,
    },

    /// File path
    FilePath,

    /// Comma separated list of integers stored as a string
    CommaSeparatedInt,

    /// Enumerated choice list
    Enum {
        /// Allowed values
        values: Vec<Value>,
    },

    /// JSON document
    Json,

    /// Array of values of another kind
    Array {
        /// Element kind
        of: Box<FieldKind>,
    },

    /// Many-to-one reference
    ForeignKey {
        /// Referenced record type
        to: String,
    },

    /// One-to-one reference
    OneToOne {
        /// Referenced record type
        to: String,
    },

    /// Many-to-many reference, stored in a link table
    ManyToMany {
        /// Referenced record type
        to: String,
    },

    /// A host type the engine has no generator for
    Custom {
        /// Declared type name
        name: String,
    },
}

impl FieldKind {
    /// Schema name of this kind.
    pub fn name(&self) -> &str {
        match self {
            Self::Auto => "auto",
            Self::Bool => "bool",
            Self::Integer { width, unsigned } => match (width, unsigned) {
                (IntegerWidth::Small, false) => "small_int",
                (IntegerWidth::Regular, false) => "int",
                (IntegerWidth::Big, false) => "big_int",
                (IntegerWidth::Small, true) => "positive_small_int",
                (IntegerWidth::Regular, true) => "positive_int",
                (IntegerWidth::Big, true) => "positive_big_int",
            },
            Self::Decimal { .. } => "decimal",
            Self::Float => "float",
            Self::String => "string",
            Self::Text => "text",
            Self::Date => "date",
            Self::DateTime => "date_time",
            Self::Time => "time",
            Self::Duration => "duration",
            Self::Uuid => "uuid",
            Self::Binary => "binary",
            Self::Email => "email",
            Self::Url => "url",
            Self::Slug => "slug",
            Self::IpAddress { .. } => "ip_address",
            Self::FilePath => "file_path",
            Self::CommaSeparatedInt => "comma_separated_int",
            Self::Enum { .. } => "enum",
            Self::Json => "json",
            Self::Array { .. } => "array",
            Self::ForeignKey { .. } => "foreign_key",
            Self::OneToOne { .. } => "one_to_one",
            Self::ManyToMany { .. } => "many_to_many",
            Self::Custom { name } => name,
        }
    }

    /// Referenced record type, for reference kinds.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::ForeignKey { to } | Self::OneToOne { to } | Self::ManyToMany { to } => Some(to),
            _ => None,
        }
    }

    /// Whether this kind references another record type.
    pub fn is_reference(&self) -> bool {
        self.target().is_some()
    }

    /// Whether values of this kind are stored as strings.
    pub fn is_string_like(&self) -> bool {
        matches!(
            self,
            Self::String
                | Self::Text
                | Self::Email
                | Self::Url
                | Self::Slug
                | Self::FilePath
                | Self::CommaSeparatedInt
        )
    }

    /// Whether values of this kind carry a date and time.
    pub fn is_date_time(&self) -> bool {
        matches!(self, Self::DateTime)
    }

    /// Whether values of this kind are booleans.
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array { of } => write!(f, "array<{of}>"),
            Self::ForeignKey { to } | Self::OneToOne { to } | Self::ManyToMany { to } => {
                write!(f, "{}({to})", self.name())
            }
            _ => f.write_str(self.name()),
        }
    }
}

fn simple_kind(name: &str) -> Option<FieldKind> {
    let kind = match name {
        "auto" | "auto_increment" => FieldKind::Auto,
        "bool" | "boolean" => FieldKind::Bool,
        "small_int" | "smallint" => FieldKind::Integer {
            width: IntegerWidth::Small,
            unsigned: false,
        },
        "int" | "integer" => FieldKind::Integer {
            width: IntegerWidth::Regular,
            unsigned: false,
        },
        "big_int" | "bigint" => FieldKind::Integer {
            width: IntegerWidth::Big,
            unsigned: false,
        },
        "positive_small_int" => FieldKind::Integer {
            width: IntegerWidth::Small,
            unsigned: true,
        },
        "positive_int" => FieldKind::Integer {
            width: IntegerWidth::Regular,
            unsigned: true,
        },
        "positive_big_int" => FieldKind::Integer {
            width: IntegerWidth::Big,
            unsigned: true,
        },
        "float" | "double" => FieldKind::Float,
        "string" | "char" | "var_char" | "varchar" => FieldKind::String,
        "text" => FieldKind::Text,
        "date" => FieldKind::Date,
        "date_time" | "datetime" => FieldKind::DateTime,
        "time" => FieldKind::Time,
        "duration" => FieldKind::Duration,
        "uuid" => FieldKind::Uuid,
        "binary" | "bytes" | "blob" => FieldKind::Binary,
        "email" => FieldKind::Email,
        "url" => FieldKind::Url,
        "slug" => FieldKind::Slug,
        "ip_address" | "ip" => FieldKind::IpAddress {
            protocol: IpProtocol::Both,
        },
        "file_path" | "file" | "image" => FieldKind::FilePath,
        "comma_separated_int" => FieldKind::CommaSeparatedInt,
        "json" | "jsonb" => FieldKind::Json,
        _ => return None,
    };
    Some(kind)
}

impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, MapAccess, Visitor};

        struct FieldKindVisitor;

        impl<'de> Visitor<'de> for FieldKindVisitor {
            type Value = FieldKind;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or map representing a field kind")
            }

            // Handle string format: "uuid", "int", etc.
            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                Ok(simple_kind(value).unwrap_or_else(|| FieldKind::Custom {
                    name: value.to_string(),
                }))
            }

            // Handle map format: {"type": "foreign_key", "to": "game"}
            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut type_name: Option<String> = None;
                let mut fields: HashMap<String, serde_yaml::Value> = HashMap::new();

                while let Some(key) = map.next_key::<String>()? {
                    if key == "type" {
                        type_name = Some(map.next_value()?);
                    } else {
                        fields.insert(key, map.next_value()?);
                    }
                }

                let type_name = type_name.ok_or_else(|| M::Error::missing_field("type"))?;

                match type_name.as_str() {
                    "decimal" => {
                        let max_digits = get_field(&fields, "max_digits").unwrap_or(10);
                        let decimal_places = get_field(&fields, "decimal_places").unwrap_or(2);
                        Ok(FieldKind::Decimal {
                            max_digits,
                            decimal_places,
                        })
                    }
                    "ip_address" | "ip" => {
                        let protocol = get_field(&fields, "protocol").unwrap_or_default();
                        Ok(FieldKind::IpAddress { protocol })
                    }
                    "enum" => {
                        let values: Vec<serde_yaml::Value> =
                            get_field_required(&fields, "values")?;
                        Ok(FieldKind::Enum {
                            values: values.iter().map(Value::from_yaml).collect(),
                        })
                    }
                    "array" => {
                        let of: FieldKind = get_field_required(&fields, "of")?;
                        Ok(FieldKind::Array { of: Box::new(of) })
                    }
                    "foreign_key" => Ok(FieldKind::ForeignKey {
                        to: get_field_required(&fields, "to")?,
                    }),
                    "one_to_one" => Ok(FieldKind::OneToOne {
                        to: get_field_required(&fields, "to")?,
                    }),
                    "many_to_many" => Ok(FieldKind::ManyToMany {
                        to: get_field_required(&fields, "to")?,
                    }),
                    other => Ok(simple_kind(other).unwrap_or_else(|| FieldKind::Custom {
                        name: other.to_string(),
                    })),
                }
            }
        }

        deserializer.deserialize_any(FieldKindVisitor)
    }
}

// Helper functions for deserialization
fn get_field<T: for<'de> Deserialize<'de>>(
    fields: &HashMap<String, serde_yaml::Value>,
    key: &str,
) -> Option<T> {
    fields
        .get(key)
        .and_then(|v| serde_yaml::from_value(v.clone()).ok())
}

fn get_field_required<T: for<'de> Deserialize<'de>, E: serde::de::Error>(
    fields: &HashMap<String, serde_yaml::Value>,
    key: &'static str,
) -> Result<T, E> {
    let value = fields.get(key).ok_or_else(|| E::missing_field(key))?;
    serde_yaml::from_value(value.clone())
        .map_err(|e| E::custom(format!("invalid field '{key}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> FieldKind {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_simple_kinds() {
        assert_eq!(parse("bool"), FieldKind::Bool);
        assert_eq!(parse("date_time"), FieldKind::DateTime);
        assert_eq!(
            parse("positive_small_int"),
            FieldKind::Integer {
                width: IntegerWidth::Small,
                unsigned: true
            }
        );
    }

    #[test]
    fn test_map_kinds() {
        assert_eq!(
            parse("{ type: decimal, max_digits: 8, decimal_places: 3 }"),
            FieldKind::Decimal {
                max_digits: 8,
                decimal_places: 3
            }
        );
        assert_eq!(
            parse("{ type: foreign_key, to: game }"),
            FieldKind::ForeignKey {
                to: "game".to_string()
            }
        );
        assert_eq!(
            parse("{ type: array, of: int }"),
            FieldKind::Array {
                of: Box::new(FieldKind::Integer {
                    width: IntegerWidth::Regular,
                    unsigned: false
                })
            }
        );
        assert_eq!(
            parse("{ type: ip_address, protocol: ipv6 }"),
            FieldKind::IpAddress {
                protocol: IpProtocol::Ipv6
            }
        );
    }

    #[test]
    fn test_enum_values() {
        let kind = parse("{ type: enum, values: [fire, move, 3] }");
        assert_eq!(
            kind,
            FieldKind::Enum {
                values: vec![
                    Value::String("fire".to_string()),
                    Value::String("move".to_string()),
                    Value::Int(3),
                ]
            }
        );
    }

    #[test]
    fn test_reference_requires_target() {
        let result: Result<FieldKind, _> = serde_yaml::from_str("{ type: one_to_one }");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_type_is_custom() {
        assert_eq!(
            parse("geometry"),
            FieldKind::Custom {
                name: "geometry".to_string()
            }
        );
        assert_eq!(parse("geometry").name(), "geometry");
    }

    #[test]
    fn test_reference_helpers() {
        let kind = parse("{ type: many_to_many, to: player }");
        assert!(kind.is_reference());
        assert_eq!(kind.target(), Some("player"));
        assert_eq!(kind.to_string(), "many_to_many(player)");
        assert!(!FieldKind::Text.is_reference());
        assert!(FieldKind::Slug.is_string_like());
    }
}
