use std::collections::{BTreeSet, HashMap};

use hypecycle_common::types::VenueKind;

pub(crate) struct VenueStats {
    pub known_venue_records: usize,
    pub venue_academic_pct: f64,
    pub venue_industry_pct: f64,
    pub conference_pct: f64,
    pub journal_pct: f64,
}

/// Proportional venue counts. Unknown venues are left out of the denominator.
#[derive(Default)]
pub(crate) struct VenueTally {
    academic: usize,
    industry: usize,
    conference: usize,
    journal: usize,
}

impl VenueTally {
    pub(crate) fn observe(&mut self, venue: VenueKind) {
        match venue {
            VenueKind::Academic => self.academic += 1,
            VenueKind::Industry => self.industry += 1,
            VenueKind::Conference => self.conference += 1,
            VenueKind::Journal => self.journal += 1,
            VenueKind::Unknown => {}
        }
    }

    pub(crate) fn finish(self) -> VenueStats {
        let known = self.academic + self.industry + self.conference + self.journal;
        let pct = |n: usize| {
            if known == 0 {
                0.0
            } else {
                n as f64 / known as f64 * 100.0
            }
        };

        VenueStats {
            known_venue_records: known,
            venue_academic_pct: pct(self.academic),
            venue_industry_pct: pct(self.industry),
            conference_pct: pct(self.conference),
            journal_pct: pct(self.journal),
        }
    }
}

pub(crate) struct CategoryStats {
    pub top_categories: Vec<(String, usize)>,
    pub category_concentration_hhi: f64,
}

#[derive(Default)]
pub(crate) struct CategoryTally {
    counts: HashMap<String, usize>,
}

impl CategoryTally {
    pub(crate) fn observe(&mut self, tags: &BTreeSet<String>) {
        for tag in tags {
            *self.counts.entry(tag.clone()).or_default() += 1;
        }
    }

    pub(crate) fn finish(self, limit: usize) -> CategoryStats {
        let mut top: Vec<(String, usize)> = self.counts.into_iter().collect();
        top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        // Herfindahl-Hirschman index: 1.0 means a single category. Summed in
        // sorted order so the result is identical across runs.
        let total: usize = top.iter().map(|(_, c)| c).sum();
        let hhi = if total == 0 {
            0.0
        } else {
            top.iter()
                .map(|(_, c)| {
                    let share = *c as f64 / total as f64;
                    share * share
                })
                .sum()
        };

        top.truncate(limit);

        CategoryStats {
            top_categories: top,
            category_concentration_hhi: hhi,
        }
    }
}
