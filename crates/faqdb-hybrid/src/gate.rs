use serde::Serialize;

use faqdb_core::config::RetrievalConfig;
use faqdb_core::types::ScoredCandidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Confidence {
    Confident,
    /// Best score under `min_score`.
    Low,
    /// Runner-up within `gap` of the best.
    Ambiguous,
}

impl Confidence {
    /// Uncertain results must be confirmed by the meaning validator.
    pub fn needs_validation(self) -> bool {
        !matches!(self, Self::Confident)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceGate {
    pub min_score: f32,
    pub gap: f32,
}

impl ConfidenceGate {
    pub fn new(min_score: f32, gap: f32) -> Self {
        Self { min_score, gap }
    }

    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self::new(config.min_score, config.gap)
    }

    /// A low best score is reported before ambiguity.
    pub fn classify_scores(&self, best: f32, second: Option<f32>) -> Confidence {
        if best < self.min_score {
            return Confidence::Low;
        }
        match second {
            Some(second) if (best - second).abs() < self.gap => Confidence::Ambiguous,
            _ => Confidence::Confident,
        }
    }

    pub fn classify(&self, best: &ScoredCandidate<'_>, second: Option<&ScoredCandidate<'_>>) -> Confidence {
        self.classify_scores(best.score, second.map(|c| c.score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_best_score() {
        assert_eq!(ConfidenceGate::new(0.10, 0.06).classify_scores(0.05, None), Confidence::Low);
    }

    #[test]
    fn close_runner_up_is_ambiguous() {
        assert_eq!(ConfidenceGate::new(0.10, 0.06).classify_scores(0.30, Some(0.28)), Confidence::Ambiguous);
    }

    #[test]
    fn clear_winner_is_confident() {
        let gate = ConfidenceGate::new(0.10, 0.06);
        assert_eq!(gate.classify_scores(0.30, Some(0.10)), Confidence::Confident);
        assert_eq!(gate.classify_scores(0.30, None), Confidence::Confident);
        assert!(!Confidence::Confident.needs_validation());
    }

    #[test]
    fn low_wins_over_ambiguous() {
        let gate = ConfidenceGate::new(0.25, 0.05);
        assert_eq!(gate.classify_scores(0.20, Some(0.19)), Confidence::Low);
        assert!(Confidence::Low.needs_validation() && Confidence::Ambiguous.needs_validation());
    }

    #[test]
    fn thresholds_come_from_config() {
        let gate = ConfidenceGate::from_config(&RetrievalConfig::default());
        assert_eq!(gate, ConfidenceGate::new(0.10, 0.05));
    }
}
