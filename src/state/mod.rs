//! State module for tracking crawl progress
//!
//! A crawl run moves through `Idle → Running → Done`. There is no paused or
//! cancelled state: once started, a run ends when its queue empties or its
//! page budget is spent.

mod crawl_phase;

pub use crawl_phase::CrawlPhase;
