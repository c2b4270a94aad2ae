//! Value generator for the model-seed framework.
//!
//! This crate provides the [`Faker`], which produces locale-aware fake values
//! for semantic categories (names, addresses, dates, emails, ...), and the
//! [`GeneratorRegistry`], which hands out one seeded `Faker` per locale.
//!
//! # Architecture
//!
//! ```text
//! GeneratorRegistry (base seed)
//!        │  one per locale
//!        ▼
//! ┌─────────────────┐
//! │      Faker      │
//! │                 │
//! │  - locale       │
//! │  - rng (StdRng) │
//! └────────┬────────┘
//!          │ generate(&Category)
//!          ▼
//!        Value
//! ```
//!
//! # Example
//!
//! ```rust
//! use seed_generator::{Category, GeneratorRegistry, Locale};
//! use seed_core::Value;
//!
//! let mut registry = GeneratorRegistry::new(Some(42));
//! let faker = registry.faker(Locale::En);
//!
//! let value = faker.generate(&Category::IntRange { min: 1, max: 6 });
//! assert!(matches!(value, Value::Int(1..=6)));
//! ```

pub mod category;
pub mod faker;
pub mod generators;
pub mod locale;
pub mod registry;

// Re-exports for convenience
pub use category::Category;
pub use faker::Faker;
pub use locale::{Locale, LocaleError};
pub use registry::GeneratorRegistry;
