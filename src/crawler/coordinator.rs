//! Crawler coordinator - main crawl orchestration logic
//!
//! The crawl is a small state machine:
//!
//! ```text
//! Start -> Fetching -> Extracting -> ResolvingNext -> (Fetching | Done)
//!              |
//!              +-> DeniedStop / ErrorStop
//! ```
//!
//! Each [`Coordinator::step`] takes the [`CrawlState`] by value and hands it
//! back inside a [`Step`], so the accumulated records always have exactly one
//! owner. Every stop, including failures, keeps the records gathered so far.

use crate::config::CrawlConfig;
use crate::crawler::delay::DelayPolicy;
use crate::crawler::extractor::{extract, parse_selector};
use crate::crawler::fetcher::{FetchOutcome, Fetcher};
use crate::crawler::pagination::find_next;
use crate::crawler::report::{CrawlReport, RecordLayout};
use crate::record::Record;
use crate::robots::RobotsGate;
use crate::state::{CrawlState, StopReason};
use crate::ScrapeError;
use chrono::Utc;
use scraper::Selector;
use tokio::sync::watch;
use url::Url;

/// Outcome of one iteration of the crawl loop
#[derive(Debug)]
pub enum Step {
    /// Fetch the page the cursor now points at
    Continue(CrawlState),

    /// Terminal: the crawl is over
    Stop(CrawlState, StopReason),
}

/// Main crawler coordinator structure
///
/// Holds the compiled selectors, the HTTP session and the robots.txt cache
/// for a single crawl. The crawl progress itself lives in [`CrawlState`].
pub struct Coordinator {
    start_url: Url,
    max_pages: u32,
    attributes: Vec<String>,
    content_selector: Option<Selector>,
    next_selector: Option<Selector>,
    fetcher: Fetcher,
    gate: RobotsGate,
    delay: DelayPolicy,
    interrupt: Option<watch::Receiver<bool>>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration (expected to be validated)
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ScrapeError)` - Bad URL or selector, or the HTTP client could not be built
    pub fn new(config: &CrawlConfig) -> Result<Self, ScrapeError> {
        let start_url = Url::parse(&config.url)?;
        let content_selector = config.content_selector().map(parse_selector).transpose()?;
        let next_selector = config
            .next_page_selector()
            .map(parse_selector)
            .transpose()?;
        let fetcher = Fetcher::new(config)?;

        Ok(Self {
            start_url,
            max_pages: config.max_pages,
            attributes: config.attributes.clone(),
            content_selector,
            next_selector,
            gate: RobotsGate::new(config.respect_robots, fetcher.user_agent()),
            fetcher,
            delay: DelayPolicy::from_config(config)?,
            interrupt: None,
        })
    }

    /// Stops the crawl once the receiver observes `true`
    pub fn with_interrupt(mut self, interrupt: watch::Receiver<bool>) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    /// Overrides the pacing between fetches
    pub fn with_delay(mut self, delay: DelayPolicy) -> Self {
        self.delay = delay;
        self
    }

    fn layout(&self) -> RecordLayout {
        if self.content_selector.is_some() {
            RecordLayout::Fragments
        } else {
            RecordLayout::WholePage
        }
    }

    /// Runs the crawl loop to completion
    ///
    /// Never fails: every error is turned into a [`StopReason`] on the
    /// returned report.
    pub async fn run(mut self) -> CrawlReport {
        let started_at = Utc::now();
        tracing::info!(
            "Starting crawl of {} (max {} page(s))",
            self.start_url,
            self.max_pages
        );

        let mut state = CrawlState::new(self.start_url.clone());
        let (state, stop_reason) = loop {
            match self.step(state).await {
                Step::Continue(next) => state = next,
                Step::Stop(last, reason) => break (last, reason),
            }
        };

        if stop_reason.is_error() {
            tracing::error!("Crawl stopped: {}", stop_reason);
        } else {
            tracing::info!("Crawl finished: {}", stop_reason);
        }
        tracing::info!(
            "{} page(s) fetched, {} record(s) extracted, robots.txt checked for {} authority(ies)",
            state.cursor.pages,
            state.records.len(),
            self.gate.authorities_checked()
        );

        CrawlReport {
            layout: self.layout(),
            pages_fetched: state.cursor.pages,
            last_url: state.cursor.url,
            records: state.records,
            stop_reason,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Performs one iteration: wait, check policy, fetch, extract, paginate
    pub async fn step(&mut self, mut state: CrawlState) -> Step {
        if self.is_interrupted() {
            return Step::Stop(state, StopReason::Interrupted);
        }

        if !state.cursor.is_first() && !self.pause().await {
            return Step::Stop(state, StopReason::Interrupted);
        }

        let url = state.cursor.url.clone();
        let body = match self.fetch_page(&url).await {
            FetchOutcome::Success { body, status_code } => {
                tracing::debug!("Fetched {} ({}, {} bytes)", url, status_code, body.len());
                body
            }
            FetchOutcome::Denied { reason } => {
                tracing::debug!("{}", reason);
                return Step::Stop(
                    state,
                    StopReason::PolicyDenied {
                        url: url.to_string(),
                    },
                );
            }
            FetchOutcome::TransportError { message } => {
                return Step::Stop(
                    state,
                    StopReason::TransportError {
                        url: url.to_string(),
                        message,
                    },
                );
            }
        };

        let records = match &self.content_selector {
            Some(selector) => extract(&body, Some(selector), &self.attributes),
            None => vec![Record::whole_page(url.as_str(), body.as_str())],
        };
        tracing::info!(
            "Page {}: {} record(s) from {}",
            state.cursor.pages + 1,
            records.len(),
            url
        );
        state.records.extend(records);
        state.cursor.advance_count();

        if state.cursor.pages >= self.max_pages {
            return Step::Stop(state, StopReason::PageLimitReached);
        }

        match find_next(&body, self.next_selector.as_ref(), &url) {
            Some(next) => {
                tracing::debug!("Next page: {}", next);
                state.cursor.move_to(next);
                Step::Continue(state)
            }
            None => Step::Stop(state, StopReason::PaginationExhausted),
        }
    }

    /// Runs the policy gate, then the fetch
    async fn fetch_page(&mut self, url: &Url) -> FetchOutcome {
        if !self.gate.can_fetch(&self.fetcher, url).await {
            return FetchOutcome::Denied {
                reason: format!("robots.txt disallows {}", url),
            };
        }
        self.fetcher.fetch(url).await
    }

    fn is_interrupted(&self) -> bool {
        self.interrupt.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Sleeps for the next delay; returns false if interrupted meanwhile
    async fn pause(&mut self) -> bool {
        let wait = self.delay.next_delay();
        if wait.is_zero() {
            return true;
        }
        tracing::debug!("Waiting {:.2}s before next request", wait.as_secs_f64());

        match self.interrupt.as_mut() {
            Some(rx) => {
                tokio::select! {
                    _ = tokio::time::sleep(wait) => true,
                    _ = wait_for_interrupt(rx) => false,
                }
            }
            None => {
                tokio::time::sleep(wait).await;
                true
            }
        }
    }
}

/// Resolves once the interrupt flag turns true; never resolves if the sender
/// is gone
async fn wait_for_interrupt(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Builds a coordinator and runs it, optionally wired to an interrupt signal
pub async fn run_crawl(
    config: &CrawlConfig,
    interrupt: Option<watch::Receiver<bool>>,
) -> Result<CrawlReport, ScrapeError> {
    let mut coordinator = Coordinator::new(config)?;
    if let Some(interrupt) = interrupt {
        coordinator = coordinator.with_interrupt(interrupt);
    }
    Ok(coordinator.run().await)
}
