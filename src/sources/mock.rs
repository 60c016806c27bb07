//! In-memory paper source.
//!
//! Serves a small built-in catalogue so the browser can run without the
//! paper-index service. Tests can script responses per endpoint and add an
//! artificial delay to exercise overlapping requests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::models::{Page, Paper, PaperBuilder};
use crate::sources::{PaperSource, SourceError};

type Scripted = Result<Vec<Paper>, SourceError>;

/// A source backed by a fixed catalogue plus optional scripted responses.
#[derive(Debug)]
pub struct MockSource {
    catalogue: Vec<Paper>,
    latest_responses: Mutex<VecDeque<Scripted>>,
    search_responses: Mutex<VecDeque<Scripted>>,
    delay: Option<Duration>,
    requests: AtomicUsize,
    last_page: Mutex<Option<Page>>,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    /// Create a mock source serving the built-in catalogue.
    pub fn new() -> Self {
        Self::with_catalogue(builtin_catalogue())
    }

    /// Create a mock source serving `catalogue`.
    pub fn with_catalogue(catalogue: Vec<Paper>) -> Self {
        Self {
            catalogue,
            latest_responses: Mutex::new(VecDeque::new()),
            search_responses: Mutex::new(VecDeque::new()),
            delay: None,
            requests: AtomicUsize::new(0),
            last_page: Mutex::new(None),
        }
    }

    /// Wait this long before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a response for the next `latest` call.
    pub fn push_latest(&self, response: Scripted) {
        if let Ok(mut queue) = self.latest_responses.lock() {
            queue.push_back(response);
        }
    }

    /// Queue a response for the next `search` call.
    pub fn push_search(&self, response: Scripted) {
        if let Ok(mut queue) = self.search_responses.lock() {
            queue.push_back(response);
        }
    }

    /// Number of requests answered so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Page sent with the most recent request.
    pub fn last_page(&self) -> Option<Page> {
        self.last_page.lock().ok().and_then(|page| *page)
    }

    pub fn catalogue(&self) -> &[Paper] {
        &self.catalogue
    }

    async fn answer(&self, queue: &Mutex<VecDeque<Scripted>>, page: &Page) -> Option<Scripted> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_page.lock() {
            *last = Some(*page);
        }

        // Take the scripted response before sleeping so call order decides
        // which response each request gets
        let scripted = queue.lock().ok().and_then(|mut q| q.pop_front());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        scripted
    }

    fn window(papers: Vec<Paper>, page: &Page) -> Vec<Paper> {
        papers
            .into_iter()
            .skip(page.start)
            .take(page.max_results)
            .collect()
    }
}

fn matches_keyword(paper: &Paper, needle: &str) -> bool {
    paper.title.to_lowercase().contains(needle)
        || paper.summary.to_lowercase().contains(needle)
        || paper
            .authors
            .iter()
            .any(|a| a.to_lowercase().contains(needle))
}

#[async_trait]
impl PaperSource for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Built-in catalogue"
    }

    async fn latest(&self, page: &Page) -> Result<Vec<Paper>, SourceError> {
        match self.answer(&self.latest_responses, page).await {
            Some(scripted) => scripted,
            None => Ok(Self::window(self.catalogue.clone(), page)),
        }
    }

    async fn search(&self, keyword: &str, page: &Page) -> Result<Vec<Paper>, SourceError> {
        if let Some(scripted) = self.answer(&self.search_responses, page).await {
            return scripted;
        }

        let needle = keyword.to_lowercase();
        let hits = self
            .catalogue
            .iter()
            .filter(|p| matches_keyword(p, &needle))
            .cloned()
            .collect();
        Ok(Self::window(hits, page))
    }
}

/// Helper function to create a paper for tests.
pub fn make_paper(id: &str, title: &str) -> Paper {
    PaperBuilder::new(id, title)
        .summary(format!("Abstract of {}", title))
        .document_url(format!("https://example.com/{}.pdf", id))
        .build()
}

/// The three papers served in mock mode
pub fn builtin_catalogue() -> Vec<Paper> {
    vec![
        PaperBuilder::new("1", "Attention Is All You Need")
            .authors([
                "Ashish Vaswani",
                "Noam Shazeer",
                "Niki Parmar",
                "Jakob Uszkoreit",
                "Llion Jones",
                "Aidan N. Gomez",
                "Łukasz Kaiser",
                "Illia Polosukhin",
            ])
            .summary(
                "The dominant sequence transduction models are based on complex recurrent or \
                 convolutional neural networks in an encoder-decoder architecture. The best \
                 performing models also connect the encoder and decoder through an attention \
                 mechanism. We propose a new simple network architecture, the Transformer, \
                 based solely on attention mechanisms, dispensing with recurrence and \
                 convolutions entirely. Experiments on two machine translation tasks show these \
                 models to be superior in quality while being more parallelizable and requiring \
                 significantly less time to train.",
            )
            .document_url("https://arxiv.org/pdf/1706.03762")
            .published_date("2017-06-12")
            .category("cs.CL")
            .category("cs.LG")
            .build(),
        PaperBuilder::new(
            "2",
            "BERT: Pre-training of Deep Bidirectional Transformers for Language Understanding",
        )
        .authors([
            "Jacob Devlin",
            "Ming-Wei Chang",
            "Kenton Lee",
            "Kristina Toutanova",
        ])
        .summary(
            "We introduce a new language representation model called BERT, which stands for \
             Bidirectional Encoder Representations from Transformers. Unlike recent language \
             representation models, BERT is designed to pre-train deep bidirectional \
             representations from unlabeled text by jointly conditioning on both left and right \
             context in all layers.",
        )
        .document_url("https://arxiv.org/pdf/1810.04805")
        .published_date("2018-10-11")
        .category("cs.CL")
        .build(),
        PaperBuilder::new("3", "Generative Adversarial Networks")
            .authors([
                "Ian J. Goodfellow",
                "Jean Pouget-Abadie",
                "Mehdi Mirza",
                "Bing Xu",
                "David Warde-Farley",
                "Sherjil Ozair",
                "Aaron Courville",
                "Yoshua Bengio",
            ])
            .summary(
                "We propose a new framework for estimating generative models via an \
                 adversarial process, in which we simultaneously train two models: a generative \
                 model G that captures the data distribution, and a discriminative model D that \
                 estimates the probability that a sample came from the training data rather \
                 than G.",
            )
            .document_url("https://arxiv.org/pdf/1406.2661")
            .published_date("2014-06-10")
            .category("stat.ML")
            .category("cs.LG")
            .build(),
    ]
}
