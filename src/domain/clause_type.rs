use std::fmt;

/// Fixed taxonomy of clause categories. The prompt builder renders this set
/// into the model instructions and the response normalizer coerces anything
/// outside it to `Other`; the two must stay in lockstep, which is why the
/// taxonomy lives in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseType {
    PaymentTerms,
    Termination,
    Confidentiality,
    Liability,
    Indemnification,
    GoverningLaw,
    Other,
}

impl ClauseType {
    pub const ALL: [ClauseType; 7] = [
        ClauseType::PaymentTerms,
        ClauseType::Termination,
        ClauseType::Confidentiality,
        ClauseType::Liability,
        ClauseType::Indemnification,
        ClauseType::GoverningLaw,
        ClauseType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClauseType::PaymentTerms => "payment_terms",
            ClauseType::Termination => "termination",
            ClauseType::Confidentiality => "confidentiality",
            ClauseType::Liability => "liability",
            ClauseType::Indemnification => "indemnification",
            ClauseType::GoverningLaw => "governing_law",
            ClauseType::Other => "other",
        }
    }

    /// Lenient lookup used when validating model output: anything the
    /// taxonomy does not recognize becomes `Other` instead of failing the
    /// whole batch.
    pub fn coerce(s: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .unwrap_or(ClauseType::Other)
    }
}

impl fmt::Display for ClauseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
