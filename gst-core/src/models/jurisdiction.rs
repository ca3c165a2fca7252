use serde::{Deserialize, Serialize};

/// Where a supply takes place, which decides how the tax is split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Jurisdiction {
    /// Same state: tax is split evenly into CGST and SGST.
    #[default]
    IntraState,
    /// Across states: a single IGST component.
    InterState,
}

impl Jurisdiction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IntraState => "intra",
            Self::InterState => "inter",
        }
    }

    /// Short label used in history entries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::IntraState => "Intra",
            Self::InterState => "Inter",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "intra" | "intra-state" | "intrastate" => Some(Self::IntraState),
            "inter" | "inter-state" | "interstate" => Some(Self::InterState),
            _ => None,
        }
    }
}
