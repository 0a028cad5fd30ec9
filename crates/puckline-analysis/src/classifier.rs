//! Coverage tier classification of an aggregate momentum score.
//!
//! Lower bounds are inclusive: with the default thresholds, 75 is
//! PLAY_BY_PLAY and 25 is MIXED_COVERAGE.

use puckline_types::RecommendationTier;

use crate::config::TierThresholds;

/// Map an aggregate momentum score onto a coverage tier.
pub const fn classify(aggregate_score: u32, thresholds: &TierThresholds) -> RecommendationTier {
    if aggregate_score >= thresholds.play_by_play {
        RecommendationTier::PlayByPlay
    } else if aggregate_score >= thresholds.mixed_coverage {
        RecommendationTier::MixedCoverage
    } else {
        RecommendationTier::FillerContent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_with_defaults() {
        let t = TierThresholds::default();
        assert_eq!(classify(74, &t), RecommendationTier::MixedCoverage);
        assert_eq!(classify(75, &t), RecommendationTier::PlayByPlay);
        assert_eq!(classify(24, &t), RecommendationTier::FillerContent);
        assert_eq!(classify(25, &t), RecommendationTier::MixedCoverage);
    }

    #[test]
    fn zero_is_filler() {
        assert_eq!(
            classify(0, &TierThresholds::default()),
            RecommendationTier::FillerContent
        );
    }

    #[test]
    fn custom_thresholds_are_honored() {
        let t = TierThresholds {
            play_by_play: 100,
            mixed_coverage: 40,
        };
        assert_eq!(classify(99, &t), RecommendationTier::MixedCoverage);
        assert_eq!(classify(39, &t), RecommendationTier::FillerContent);
        assert_eq!(classify(u32::MAX, &t), RecommendationTier::PlayByPlay);
    }
}
