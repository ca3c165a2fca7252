use serde::{Deserialize, Serialize};

/// Whether an entered amount already includes tax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceBasis {
    /// Tax is added on top of the amount.
    #[default]
    Exclusive,
    /// The amount is a tax-inclusive price; tax is backed out of it.
    Inclusive,
}

impl PriceBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exclusive => "excl",
            Self::Inclusive => "incl",
        }
    }

    /// Short label used in history entries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Exclusive => "Excl.",
            Self::Inclusive => "Incl.",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excl" | "exclusive" => Some(Self::Exclusive),
            "incl" | "inclusive" => Some(Self::Inclusive),
            _ => None,
        }
    }
}
