use crate::core::scoring::{calculate_match_score, confidence_bonus};
use crate::core::tags::TagList;
use crate::models::{
    Book, ContentType, Contractor, Event, MatchLimits, Partner, Podcast, Scored, ScoringWeights,
};

/// Content that can be scored against a contractor's focus areas
pub trait Matchable {
    const CONTENT_TYPE: ContentType;

    /// Normalized focus areas covered by this entity
    fn focus_areas(&self) -> &TagList;

    /// Flat bonus added once after tag scoring
    fn bonus(&self, _weights: &ScoringWeights) -> f64 {
        0.0
    }
}

impl Matchable for Book {
    const CONTENT_TYPE: ContentType = ContentType::Book;

    fn focus_areas(&self) -> &TagList {
        &self.focus_areas_covered
    }
}

impl Matchable for Podcast {
    const CONTENT_TYPE: ContentType = ContentType::Podcast;

    fn focus_areas(&self) -> &TagList {
        &self.focus_areas_covered
    }
}

impl Matchable for Event {
    const CONTENT_TYPE: ContentType = ContentType::Event;

    fn focus_areas(&self) -> &TagList {
        &self.focus_areas_covered
    }
}

impl Matchable for Partner {
    const CONTENT_TYPE: ContentType = ContentType::Partner;

    fn focus_areas(&self) -> &TagList {
        &self.focus_areas_served
    }

    fn bonus(&self, weights: &ScoringWeights) -> f64 {
        confidence_bonus(self.powerconfidence_score, weights)
    }
}

/// Score, filter, rank and truncate one content type
///
/// # Pipeline Stages
/// 1. Score every candidate (tag overlap + entity bonus)
/// 2. Drop candidates scoring zero or less
/// 3. Stable sort, highest score first (ties keep storage order)
/// 4. Keep at most `page_size`
pub fn select_top<T: Matchable>(
    candidates: Vec<T>,
    contractor_tags: &[String],
    primary_tag: Option<&str>,
    weights: &ScoringWeights,
    page_size: usize,
) -> Vec<Scored<T>> {
    let mut scored: Vec<Scored<T>> = candidates
        .into_iter()
        .filter_map(|entity| {
            let score = calculate_match_score(
                entity.focus_areas().as_slice(),
                contractor_tags,
                primary_tag,
                weights,
            ) + entity.bonus(weights);

            (score > 0.0).then_some(Scored {
                entity,
                content_type: T::CONTENT_TYPE,
                match_score: score,
            })
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    scored.truncate(page_size);
    scored
}

/// Content matcher holding the configured weights and page sizes
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    limits: MatchLimits,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, limits: MatchLimits) -> Self {
        Self { weights, limits }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
            limits: MatchLimits::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn limits(&self) -> &MatchLimits {
        &self.limits
    }

    /// Score a single entity for a contractor
    pub fn score<T: Matchable>(&self, entity: &T, contractor: &Contractor) -> f64 {
        calculate_match_score(
            entity.focus_areas().as_slice(),
            contractor.focus_areas.as_slice(),
            contractor.primary_focus(),
            &self.weights,
        ) + entity.bonus(&self.weights)
    }

    /// Run the selection pipeline for one content type
    pub fn select<T: Matchable>(
        &self,
        contractor: &Contractor,
        candidates: Vec<T>,
        page_size: usize,
    ) -> Vec<Scored<T>> {
        select_top(
            candidates,
            contractor.focus_areas.as_slice(),
            contractor.primary_focus(),
            &self.weights,
            page_size,
        )
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contractor(focus: &[&str], primary: Option<&str>) -> Contractor {
        Contractor {
            id: 1,
            focus_areas: TagList::from_list(focus.iter().copied()),
            primary_focus_area: primary.map(str::to_string),
        }
    }

    fn partner(id: i32, focus: &[&str], confidence: Option<f64>) -> Partner {
        Partner {
            id,
            company_name: format!("Partner {}", id),
            description: String::new(),
            logo_url: String::new(),
            website: String::new(),
            service_categories: String::new(),
            powerconfidence_score: confidence,
            key_differentiators: TagList::new(),
            testimonials: None,
            success_stories: None,
            focus_areas_served: TagList::from_list(focus.iter().copied()),
        }
    }

    fn book(id: i32, focus: &[&str]) -> Book {
        Book {
            id,
            title: format!("Book {}", id),
            author: None,
            description: None,
            cover_image_url: None,
            amazon_url: None,
            topics: TagList::new(),
            focus_areas_covered: TagList::from_list(focus.iter().copied()),
            key_takeaways: TagList::new(),
            reading_time: None,
        }
    }

    #[test]
    fn test_partner_scoring_includes_bonus() {
        let matcher = Matcher::default();
        let c = contractor(&["marketing_sales", "team_building"], Some("marketing_sales"));

        assert_eq!(matcher.score(&partner(1, &["marketing_sales"], Some(80.0)), &c), 7.0);
        assert_eq!(
            matcher.score(&partner(2, &["team_building", "operations"], Some(60.0)), &c),
            4.0
        );
    }

    #[test]
    fn test_zero_scores_filtered() {
        let matcher = Matcher::default();
        let c = contractor(&["a"], Some("a"));

        let result = matcher.select(&c, vec![book(1, &["b"]), book(2, &[])], 5);
        assert!(result.is_empty());
    }

    #[test]
    fn test_ties_keep_storage_order() {
        let matcher = Matcher::default();
        let c = contractor(&["a", "b"], None);

        let result = matcher.select(&c, vec![book(1, &["a"]), book(2, &["b"]), book(3, &["a", "b"])], 3);
        let ids: Vec<i32> = result.iter().map(|m| m.entity.id).collect();

        assert_eq!(ids, vec![3, 1, 2]);
        assert!(result.iter().all(|m| m.content_type == ContentType::Book));
    }

    #[test]
    fn test_respects_page_size() {
        let matcher = Matcher::default();
        let c = contractor(&["a"], Some("a"));
        let candidates: Vec<Book> = (0..10).map(|i| book(i, &["a"])).collect();

        assert_eq!(matcher.select(&c, candidates, 1).len(), 1);
    }

    #[test]
    fn test_blank_primary_is_ignored() {
        let matcher = Matcher::default();
        let c = contractor(&["a"], Some("   "));

        assert_eq!(matcher.score(&book(1, &["a"]), &c), 1.0);
    }
}
