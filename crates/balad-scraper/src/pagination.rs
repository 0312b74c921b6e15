//! Page-ordinal pagination for listing pages (`?page=N`).
//!
//! After each fetched page the controller decides whether to request the
//! next ordinal. Signals are evaluated in a fixed priority order:
//!
//! 1. zero listings on the page
//! 2. the page says there is no next page
//! 3. a known total page count has been reached
//! 4. the configured page ceiling would be exceeded
//!
//! The upstream's total-count metadata is unreliable, so the page's own
//! signals win over it.

/// Why pagination ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EmptyPage,
    LastPage,
    AllKnownPagesConsumed,
    CeilingReached,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::EmptyPage => write!(f, "exhausted: empty page"),
            StopReason::LastPage => write!(f, "last page reached"),
            StopReason::AllKnownPagesConsumed => write!(f, "all known pages consumed"),
            StopReason::CeilingReached => write!(f, "page ceiling reached"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue { next_page: u32 },
    Stop(StopReason),
}

/// Pure transition rule for one observed page.
#[must_use]
pub fn decide(
    listings: usize,
    has_next: bool,
    page: u32,
    ceiling: u32,
    known_total: Option<u32>,
) -> Step {
    if listings == 0 {
        return Step::Stop(StopReason::EmptyPage);
    }
    if !has_next {
        return Step::Stop(StopReason::LastPage);
    }
    if known_total.is_some_and(|total| page >= total) {
        return Step::Stop(StopReason::AllKnownPagesConsumed);
    }
    advance(page, ceiling)
}

fn advance(page: u32, ceiling: u32) -> Step {
    match page.checked_add(1) {
        Some(next_page) if next_page <= ceiling => Step::Continue { next_page },
        _ => Step::Stop(StopReason::CeilingReached),
    }
}

/// Pagination state carried across one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page: u32,
    ceiling: u32,
    known_total: Option<u32>,
}

impl Paginator {
    /// Starts at page 1. A ceiling of 0 is treated as 1.
    #[must_use]
    pub fn new(ceiling: u32) -> Self {
        Self {
            page: 1,
            ceiling: ceiling.max(1),
            known_total: None,
        }
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn known_total(&self) -> Option<u32> {
        self.known_total
    }

    /// Records a fetched page and moves to the next ordinal if pagination continues.
    pub fn observe(&mut self, listings: usize, has_next: bool, total_pages: Option<u32>) -> Step {
        if total_pages.is_some() {
            self.known_total = total_pages;
        }
        let step = decide(listings, has_next, self.page, self.ceiling, self.known_total);
        if let Step::Continue { next_page } = step {
            self.page = next_page;
        }
        step
    }

    /// Moves past a page that could not be used. Only the known total and the
    /// ceiling apply.
    pub fn skip(&mut self) -> Step {
        let step = if self.known_total.is_some_and(|total| self.page >= total) {
            Step::Stop(StopReason::AllKnownPagesConsumed)
        } else {
            advance(self.page, self.ceiling)
        };
        if let Step::Continue { next_page } = step {
            self.page = next_page;
        }
        step
    }
}
