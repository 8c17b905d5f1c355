use std::fmt::Display;
use std::future::Future;

use crate::core::matcher::Matcher;
use crate::models::{AggregatedMatches, Book, ContentType, Contractor, Event, Partner, Podcast};

/// Storage that can list the active candidates of every content type
///
/// Implementations return rows in their storage order; ties in score keep
/// that order.
pub trait ContentSource {
    type Error: Display;

    /// Active books, ordered by id
    fn active_books(&self) -> impl Future<Output = Result<Vec<Book>, Self::Error>> + Send;

    /// Active podcasts, ordered by id
    fn active_podcasts(&self) -> impl Future<Output = Result<Vec<Podcast>, Self::Error>> + Send;

    /// Active events whose registration is still open, ordered by deadline
    fn upcoming_events(&self) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send;

    /// Active partners, ordered by PowerConfidence score descending
    fn active_partners(&self) -> impl Future<Output = Result<Vec<Partner>, Self::Error>> + Send;
}

/// Aggregated matches plus the content types whose fetch failed
#[derive(Debug, Clone)]
pub struct AggregateOutcome {
    pub matches: AggregatedMatches,
    pub failed_sources: Vec<ContentType>,
}

impl AggregateOutcome {
    /// True when every content type was fetched successfully
    pub fn is_complete(&self) -> bool {
        self.failed_sources.is_empty()
    }
}

impl Matcher {
    /// Build the full match payload for a contractor
    ///
    /// The four content fetches run concurrently. A failed fetch yields an
    /// empty slot (`null` or `[]`) and is reported in `failed_sources`.
    pub async fn aggregate<S: ContentSource>(
        &self,
        source: &S,
        contractor: &Contractor,
    ) -> AggregateOutcome {
        let (books, podcasts, events, partners) = tokio::join!(
            source.active_books(),
            source.active_podcasts(),
            source.upcoming_events(),
            source.active_partners(),
        );

        let mut failed_sources = Vec::new();
        let limits = *self.limits();

        let books = recover(books, ContentType::Book, contractor.id, &mut failed_sources);
        let podcasts = recover(podcasts, ContentType::Podcast, contractor.id, &mut failed_sources);
        let events = recover(events, ContentType::Event, contractor.id, &mut failed_sources);
        let partners = recover(partners, ContentType::Partner, contractor.id, &mut failed_sources);

        let matches = AggregatedMatches {
            book: self.select(contractor, books, limits.books).into_iter().next(),
            podcast: self.select(contractor, podcasts, limits.podcasts).into_iter().next(),
            event: self.select(contractor, events, limits.events).into_iter().next(),
            partners: self.select(contractor, partners, limits.partners),
            focus_areas: contractor.focus_areas.clone(),
            primary_focus: contractor.primary_focus().map(str::to_string),
        };

        tracing::debug!(
            contractor_id = contractor.id,
            book = matches.book.is_some(),
            podcast = matches.podcast.is_some(),
            event = matches.event.is_some(),
            partners = matches.partners.len(),
            failed = failed_sources.len(),
            "Aggregated matches"
        );

        AggregateOutcome {
            matches,
            failed_sources,
        }
    }
}

fn recover<T, E: Display>(
    result: Result<Vec<T>, E>,
    content_type: ContentType,
    contractor_id: i32,
    failed_sources: &mut Vec<ContentType>,
) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(
                contractor_id,
                %content_type,
                "Failed to fetch candidates, leaving slot empty: {}",
                e
            );
            failed_sources.push(content_type);
            Vec::new()
        }
    }
}
