//! Frontier management for one crawl run
//!
//! This module handles:
//! - The FIFO queue of pending `(url, depth)` tasks
//! - The visited set, the single deduplication point
//! - The page budget and depth bound
//!
//! A [`Frontier`] is created fresh for every crawl invocation and dropped
//! when the run ends. Nothing here is shared between runs.

use std::collections::{HashSet, VecDeque};

/// A pending unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// Normalized URL to fetch
    pub url: String,

    /// Hops from the start URL
    pub depth: u32,
}

impl CrawlTask {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// Breadth-first work queue with visited-set tracking
///
/// Invariants:
/// - `visited_count() <= max_pages`
/// - a URL is marked visited exactly once, when it is dequeued, before any
///   fetch is attempted
/// - no dequeued task is deeper than `depth_limit`
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<CrawlTask>,
    visited: HashSet<String>,
    depth_limit: u32,
    max_pages: usize,
}

impl Frontier {
    /// Creates a frontier seeded with the start URL at depth 0
    pub fn new(start_url: impl Into<String>, depth_limit: u32, max_pages: usize) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(CrawlTask::new(start_url, 0));

        Self {
            queue,
            visited: HashSet::new(),
            depth_limit,
            max_pages,
        }
    }

    /// Dequeues the next task worth fetching and marks it visited
    ///
    /// Tasks whose URL was already visited, or that lie beyond the depth
    /// limit, are discarded. Returns `None` once the queue is empty or the
    /// page budget is spent.
    pub fn next_task(&mut self) -> Option<CrawlTask> {
        while !self.is_budget_exhausted() {
            let task = self.queue.pop_front()?;

            if self.visited.contains(&task.url) {
                tracing::trace!("Skipping already visited {}", task.url);
                continue;
            }

            if task.depth > self.depth_limit {
                tracing::trace!("Skipping {} beyond depth limit", task.url);
                continue;
            }

            self.visited.insert(task.url.clone());
            return Some(task);
        }

        None
    }

    /// Enqueues a link discovered on a page at `parent_depth`
    ///
    /// Returns false if the link was already visited. Links already waiting
    /// in the queue are enqueued again; the duplicate is dropped at dequeue.
    pub fn enqueue(&mut self, url: String, parent_depth: u32) -> bool {
        if self.visited.contains(&url) {
            return false;
        }
        self.queue.push_back(CrawlTask::new(url, parent_depth + 1));
        true
    }

    /// Returns true if links found at `depth` should be followed
    pub fn should_expand(&self, depth: u32) -> bool {
        depth < self.depth_limit
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_budget_exhausted(&self) -> bool {
        self.visited.len() >= self.max_pages
    }

    /// Returns true if another task could still be dequeued
    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty() && !self.is_budget_exhausted()
    }
}
