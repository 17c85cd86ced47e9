use serde::{Deserialize, Serialize};

/// Minimum confidence for a confident accept.
pub const CONFIDENCE_STRONG_ACCEPT: f32 = 0.30;

/// Persist-but-flag floor: anything strictly above this is kept for
/// manual review even when it misses the strong threshold.
pub const CONFIDENCE_WEAK_ACCEPT: f32 = 0.15;

/// Output of the content analyzer. Derived purely from text, sender
/// metadata and a media count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Matched keywords in table order, one entry per matching keyword.
    pub keywords_found: Vec<String>,
    /// Price-like tokens, in pattern order.
    pub prices_found: Vec<String>,
    /// Phone numbers, @handles and deep links.
    pub contacts_found: Vec<String>,
    /// Heuristic rental-ad confidence in [0, 1].
    pub confidence: f32,
    pub is_likely_rental: bool,
}

/// Tri-state persistence decision, shared by the single-message and batch
/// paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Reject,
    WeakAccept,
    StrongAccept,
}

impl Decision {
    pub fn from_score(score: f32) -> Self {
        if score >= CONFIDENCE_STRONG_ACCEPT {
            Decision::StrongAccept
        } else if score > CONFIDENCE_WEAK_ACCEPT {
            Decision::WeakAccept
        } else {
            Decision::Reject
        }
    }

    pub fn should_persist(self) -> bool {
        !matches!(self, Decision::Reject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_accept_at_threshold() {
        assert_eq!(Decision::from_score(0.30), Decision::StrongAccept);
        assert_eq!(Decision::from_score(0.95), Decision::StrongAccept);
    }

    #[test]
    fn weak_accept_band_is_exclusive_at_the_floor() {
        assert_eq!(Decision::from_score(0.29), Decision::WeakAccept);
        assert_eq!(Decision::from_score(0.16), Decision::WeakAccept);
        // the floor itself rejects
        assert_eq!(Decision::from_score(0.15), Decision::Reject);
    }

    #[test]
    fn rejects_below_floor() {
        assert_eq!(Decision::from_score(0.0), Decision::Reject);
        assert_eq!(Decision::from_score(0.1), Decision::Reject);
    }

    #[test]
    fn both_accept_tiers_persist() {
        assert!(Decision::StrongAccept.should_persist());
        assert!(Decision::WeakAccept.should_persist());
        assert!(!Decision::Reject.should_persist());
    }
}
