use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{HypeCycleError, Result};
use crate::ids::RecordId;

/// Where a piece of evidence came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Scientific paper. Engagement is the citation count.
    #[default]
    Paper,
    /// Patent filing. Engagement is the forward-citation count.
    Patent,
    /// News article.
    News,
    /// Social post. Engagement is the post score.
    Social,
}

/// Publication venue classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueKind {
    Academic,
    Industry,
    Conference,
    Journal,
    Unknown,
}

/// Years the analysis accepts. A year outside this range resolves to no
/// date at all.
pub const PLAUSIBLE_YEARS: RangeInclusive<i32> = 1000..=9999;

/// Publication date of a record. Sources vary in precision, so a bare year
/// is as legal as a full date.
///
/// Deserializes from an integer year (`2021`) or an ISO date (`"2021-03-04"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PublishedAt {
    Year(i32),
    Date(NaiveDate),
}

impl PublishedAt {
    /// The calendar year, the only time-bucketing key used by the analysis.
    pub fn year(&self) -> i32 {
        match self {
            Self::Year(y) => *y,
            Self::Date(d) => d.year(),
        }
    }
}

/// A single piece of evidence: a paper, patent, news article or social post.
///
/// Immutable once constructed; the engine only ever borrows records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub id: RecordId,
    #[serde(default)]
    pub source: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<PublishedAt>,
    /// Citation count for papers/patents, score for social posts.
    /// `None` means unknown, which is not the same as zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_count: Option<u64>,
    /// Title first, then abstract/body blocks.
    #[serde(default)]
    pub text_fields: Vec<String>,
    /// Fields of study, subreddit, venue type and similar labels.
    #[serde(default)]
    pub category_tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_kind: Option<VenueKind>,
}

impl EvidenceRecord {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            source: SourceKind::default(),
            published_at: None,
            engagement_count: None,
            text_fields: Vec::new(),
            category_tags: BTreeSet::new(),
            venue_kind: None,
        }
    }

    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = source;
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.published_at = Some(PublishedAt::Year(year));
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.published_at = Some(PublishedAt::Date(date));
        self
    }

    pub fn with_engagement(mut self, count: u64) -> Self {
        self.engagement_count = Some(count);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_fields.push(text.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.category_tags.insert(tag.into());
        self
    }

    pub fn with_venue(mut self, venue: VenueKind) -> Self {
        self.venue_kind = Some(venue);
        self
    }

    /// Publication year, `None` when missing or outside [`PLAUSIBLE_YEARS`].
    pub fn year(&self) -> Option<i32> {
        self.published_at
            .map(|p| p.year())
            .filter(|y| PLAUSIBLE_YEARS.contains(y))
    }

    /// Whether any text block has non-whitespace content.
    pub fn has_text(&self) -> bool {
        self.text_fields.iter().any(|t| !t.trim().is_empty())
    }

    /// Venue kind with a missing value folded into `Unknown`.
    pub fn venue(&self) -> VenueKind {
        self.venue_kind.unwrap_or(VenueKind::Unknown)
    }

    /// A record is malformed when it can contribute to no metric at all:
    /// no resolvable date and no usable text.
    pub fn validate(&self) -> Result<()> {
        if self.year().is_none() && !self.has_text() {
            return Err(HypeCycleError::MalformedRecord {
                id: self.id.clone(),
                reason: "no publication date and no text content".into(),
            });
        }
        Ok(())
    }
}
