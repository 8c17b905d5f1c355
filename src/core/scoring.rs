use crate::models::ScoringWeights;

/// Calculate the tag-overlap score of a candidate against a contractor
///
/// Scoring formula, per candidate tag:
///   + weights.primary    if the tag is the contractor's primary focus area
///   + weights.secondary  else if the tag is one of the contractor's focus areas
///
/// Tags are compared exactly; they must already be normalized.
pub fn calculate_match_score(
    candidate_tags: &[String],
    contractor_tags: &[String],
    primary_tag: Option<&str>,
    weights: &ScoringWeights,
) -> f64 {
    candidate_tags
        .iter()
        .map(|tag| {
            if primary_tag == Some(tag.as_str()) {
                weights.primary
            } else if contractor_tags.contains(tag) {
                weights.secondary
            } else {
                0.0
            }
        })
        .sum()
}

/// PowerConfidence bonus for partners (0-5 with default weights)
///
/// The rating is clamped into 0-100 before dividing. Missing ratings add nothing.
#[inline]
pub fn confidence_bonus(powerconfidence_score: Option<f64>, weights: &ScoringWeights) -> f64 {
    match powerconfidence_score {
        Some(score) if score.is_finite() => score.clamp(0.0, 100.0) / weights.confidence_divisor,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_primary_and_secondary_weights() {
        let weights = ScoringWeights::default();
        let contractor = tags(&["marketing_sales", "team_building"]);

        let score = calculate_match_score(
            &tags(&["marketing_sales", "team_building", "operations"]),
            &contractor,
            Some("marketing_sales"),
            &weights,
        );

        assert_eq!(score, 4.0);
    }

    #[test]
    fn test_empty_candidate_scores_zero() {
        let weights = ScoringWeights::default();
        let score = calculate_match_score(&[], &tags(&["a"]), Some("a"), &weights);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_no_primary_counts_everything_as_secondary() {
        let weights = ScoringWeights::default();
        let score = calculate_match_score(&tags(&["a", "b"]), &tags(&["a", "b"]), None, &weights);
        assert_eq!(score, 2.0);
    }

    #[test]
    fn test_primary_not_in_contractor_list_still_counts() {
        let weights = ScoringWeights::default();
        let score = calculate_match_score(&tags(&["growth"]), &[], Some("growth"), &weights);
        assert_eq!(score, 3.0);
    }

    #[test]
    fn test_comparison_is_exact() {
        let weights = ScoringWeights::default();
        let score = calculate_match_score(
            &tags(&["Marketing_Sales"]),
            &tags(&["marketing_sales"]),
            Some("marketing_sales"),
            &weights,
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_confidence_bonus() {
        let weights = ScoringWeights::default();
        assert_eq!(confidence_bonus(Some(80.0), &weights), 4.0);
        assert_eq!(confidence_bonus(Some(150.0), &weights), 5.0);
        assert_eq!(confidence_bonus(Some(-10.0), &weights), 0.0);
        assert_eq!(confidence_bonus(Some(f64::NAN), &weights), 0.0);
        assert_eq!(confidence_bonus(None, &weights), 0.0);
    }
}
