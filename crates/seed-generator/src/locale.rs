//! Locales supported by the value generator.

use std::fmt;
use std::str::FromStr;

/// Error returned when a locale string is not recognised.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unsupported locale: {0}")]
pub struct LocaleError(pub String);

/// Locale of generated names, addresses and text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    /// English
    #[default]
    En,
    /// French (France)
    FrFr,
    /// Portuguese (Brazil)
    PtBr,
    /// Japanese
    JaJp,
    /// Chinese (Simplified)
    ZhCn,
}

impl Locale {
    /// Every supported locale.
    pub const ALL: [Locale; 5] = [
        Locale::En,
        Locale::FrFr,
        Locale::PtBr,
        Locale::JaJp,
        Locale::ZhCn,
    ];

    /// Canonical locale code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::FrFr => "fr_FR",
            Self::PtBr => "pt_BR",
            Self::JaJp => "ja_JP",
            Self::ZhCn => "zh_CN",
        }
    }

    /// Parse a locale, falling back to English when it is not supported.
    pub fn parse_or_default(code: &str) -> Self {
        code.parse().unwrap_or_else(|e: LocaleError| {
            tracing::warn!("{e}, falling back to {}", Locale::En.code());
            Locale::En
        })
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "" | "default" | "en" | "en_us" | "en_gb" => Ok(Self::En),
            "fr" | "fr_fr" => Ok(Self::FrFr),
            "pt" | "pt_br" => Ok(Self::PtBr),
            "ja" | "ja_jp" => Ok(Self::JaJp),
            "zh" | "zh_cn" => Ok(Self::ZhCn),
            _ => Err(LocaleError(s.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Invoke a `fake` raw faker with the locale type matching a [`Locale`].
///
/// ```ignore
/// let name: String = localized!(self.locale, &mut self.rng, FirstName);
/// let text: String = localized!(self.locale, &mut self.rng, Sentence, 3..8);
/// ```
macro_rules! localized {
    ($locale:expr, $rng:expr, $faker:ident $(, $arg:expr)*) => {{
        use fake::locales::{EN, FR_FR, JA_JP, PT_BR, ZH_CN};
        match $locale {
            $crate::locale::Locale::En => $faker(EN $(, $arg)*).fake_with_rng($rng),
            $crate::locale::Locale::FrFr => $faker(FR_FR $(, $arg)*).fake_with_rng($rng),
            $crate::locale::Locale::PtBr => $faker(PT_BR $(, $arg)*).fake_with_rng($rng),
            $crate::locale::Locale::JaJp => $faker(JA_JP $(, $arg)*).fake_with_rng($rng),
            $crate::locale::Locale::ZhCn => $faker(ZH_CN $(, $arg)*).fake_with_rng($rng),
        }
    }};
}

pub(crate) use localized;
