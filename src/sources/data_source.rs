//! Sequenced fetching on top of a [`PaperSource`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::models::{FetchKind, Page, ResultSet};
use crate::observe::{BrowserEvent, BrowserObserver, NoopObserver};
use crate::sources::{PaperSource, SourceError};
use crate::utils::validate_keyword;

/// A request that has been issued but not yet run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Monotonically increasing sequence number, starting at 1
    pub seq: u64,
    pub kind: FetchKind,
}

/// Outcome of running a ticket
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub ticket: FetchTicket,
    pub result_set: ResultSet,
}

/// Fetches papers and decides which response is current.
///
/// Every request gets a sequence number when it is issued. When responses
/// overlap, only the one carrying the most recently issued number is
/// accepted, regardless of arrival order.
#[derive(Debug)]
pub struct DataSource {
    source: Arc<dyn PaperSource>,
    observer: Arc<dyn BrowserObserver>,
    page: Page,
    latest_issued: AtomicU64,
}

impl DataSource {
    pub fn new(source: Arc<dyn PaperSource>) -> Self {
        Self::with_observer(source, Arc::new(NoopObserver))
    }

    pub fn with_observer(source: Arc<dyn PaperSource>, observer: Arc<dyn BrowserObserver>) -> Self {
        Self {
            source,
            observer,
            page: Page::default(),
            latest_issued: AtomicU64::new(0),
        }
    }

    /// Set the pagination window sent with every request
    pub fn with_page(mut self, page: Page) -> Self {
        self.page = page;
        self
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn source(&self) -> &Arc<dyn PaperSource> {
        &self.source
    }

    pub fn observer(&self) -> &Arc<dyn BrowserObserver> {
        &self.observer
    }

    /// Sequence number of the most recently issued request (0 before any)
    pub fn latest_issued(&self) -> u64 {
        self.latest_issued.load(Ordering::SeqCst)
    }

    fn issue(&self, kind: FetchKind) -> FetchTicket {
        let seq = self.latest_issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.observer.notify(&BrowserEvent::FetchStarted {
            seq,
            kind: kind.clone(),
        });
        FetchTicket { seq, kind }
    }

    /// Issue a request for the latest papers
    pub fn issue_latest(&self) -> FetchTicket {
        self.issue(FetchKind::Latest)
    }

    /// Issue a keyword search.
    ///
    /// An empty or whitespace-only keyword is rejected without consuming a
    /// sequence number.
    pub fn issue_search(&self, keyword: &str) -> Result<FetchTicket, SourceError> {
        let keyword = validate_keyword(keyword)?;
        Ok(self.issue(FetchKind::Search { keyword }))
    }

    /// Run an issued request to completion. Failures become an error result set.
    pub async fn run(&self, ticket: FetchTicket) -> Fetched {
        let outcome = match &ticket.kind {
            FetchKind::Latest => self.source.latest(&self.page).await,
            FetchKind::Search { keyword } => self.source.search(keyword, &self.page).await,
        };

        let result_set = match outcome {
            Ok(papers) => {
                let set = ResultSet::loaded(ticket.kind.clone(), papers);
                self.observer.notify(&BrowserEvent::FetchSucceeded {
                    seq: ticket.seq,
                    count: set.len(),
                });
                set
            }
            Err(err) => {
                let reason = err.to_string();
                self.observer.notify(&BrowserEvent::FetchFailed {
                    seq: ticket.seq,
                    reason: reason.clone(),
                });
                ResultSet::error(ticket.kind.clone(), reason)
            }
        };

        Fetched { ticket, result_set }
    }

    /// Fetch the most recently published papers
    pub async fn fetch_latest(&self) -> Fetched {
        let ticket = self.issue_latest();
        self.run(ticket).await
    }

    /// Search for papers matching `keyword`
    pub async fn search(&self, keyword: &str) -> Result<Fetched, SourceError> {
        let ticket = self.issue_search(keyword)?;
        Ok(self.run(ticket).await)
    }

    /// Whether `ticket` is still the most recently issued request
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.seq == self.latest_issued()
    }

    /// Hand back the result set if it answers the latest request, otherwise
    /// drop it.
    pub fn accept(&self, fetched: Fetched) -> Option<ResultSet> {
        let latest = self.latest_issued();
        if fetched.ticket.seq == latest {
            Some(fetched.result_set)
        } else {
            self.observer.notify(&BrowserEvent::StaleResponseDiscarded {
                seq: fetched.ticket.seq,
                latest,
            });
            None
        }
    }
}
