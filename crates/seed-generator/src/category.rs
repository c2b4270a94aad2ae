//! Semantic value categories.

/// A semantic category the [`Faker`](crate::Faker) can produce values for.
#[derive(Debug, Clone, PartialEq)]
pub enum Category {
    /// Person first name
    FirstName,
    /// Person last name
    LastName,
    /// Login name
    UserName,
    /// Email address
    Email,
    /// Phone number
    PhoneNumber,
    /// Full postal address
    Address,
    /// Street line of an address
    StreetAddress,
    /// City name
    City,
    /// Postal code
    Postcode,
    /// State or region name
    State,
    /// Country name
    Country,
    /// One sentence
    Sentence,
    /// Paragraph text, bounded when `max_length` is set
    Text {
        /// Upper bound on the generated length in characters
        max_length: Option<usize>,
    },
    /// A single word
    Word,
    /// Boolean
    Boolean,
    /// Boolean or null
    NullBoolean,
    /// Calendar date
    Date,
    /// Date and time in UTC
    DateTime,
    /// Time of day
    Time,
    /// Duration up to the current epoch offset
    Duration,
    /// Version 4 UUID
    Uuid,
    /// URI
    Uri,
    /// URL slug
    Slug,
    /// IPv4 address
    Ipv4,
    /// IPv6 address
    Ipv6,
    /// File name with a media extension
    FileName,
    /// Binary blob
    Binary,
    /// JSON object
    Json,
    /// Comma separated integers
    CommaSeparatedInts,
    /// Signed integer in an inclusive range
    IntRange {
        /// Minimum value (inclusive)
        min: i64,
        /// Maximum value (inclusive)
        max: i64,
    },
    /// Unsigned integer in an inclusive range
    UIntRange {
        /// Minimum value (inclusive)
        min: u64,
        /// Maximum value (inclusive)
        max: u64,
    },
    /// Float in `[0, 1)`
    Fraction,
    /// Decimal in `[0, 1)` with a fixed number of fractional digits
    DecimalFraction {
        /// Number of digits after the decimal point
        scale: u32,
    },
}

impl Category {
    /// Whether values of this category are strings.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            Self::FirstName
                | Self::LastName
                | Self::UserName
                | Self::Email
                | Self::PhoneNumber
                | Self::Address
                | Self::StreetAddress
                | Self::City
                | Self::Postcode
                | Self::State
                | Self::Country
                | Self::Sentence
                | Self::Text { .. }
                | Self::Word
                | Self::Uri
                | Self::Slug
                | Self::Ipv4
                | Self::Ipv6
                | Self::FileName
                | Self::CommaSeparatedInts
        )
    }
}
