use std::fmt;

/// Identifier of a region (a ZIP code area in the bundled sources)
///
/// Sources disagree on how they print ZIP codes: a CSV reader may see
/// `98101`, `098101` or ` 98101 `. All-digit identifiers are therefore
/// compared by integer value; anything else is compared as trimmed text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(raw: &str) -> Self {
        RegionId(Self::normalize(raw))
    }

    /// Canonical text form of a raw identifier cell
    pub fn normalize(raw: &str) -> String {
        let trimmed = raw.trim();
        let digits = trimmed.strip_suffix(".0").unwrap_or(trimmed);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = digits.parse::<u64>() {
                return n.to_string();
            }
        }
        trimmed.to_string()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(raw: &str) -> Self {
        RegionId::new(raw)
    }
}
