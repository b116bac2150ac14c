//! Crawl statistics
//!
//! One `CrawlStats` value is owned by the crawl engine for the whole run and
//! every counter moves through the `record_*` methods below.

/// Aggregate counters for one crawl run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages fetched successfully
    pub pages_crawled: u64,

    /// Links followed, summed over all fetched pages
    pub links_found: u64,

    /// Fetch failures
    pub errors: u64,

    /// Pages fetched successfully whose record could not be written
    pub save_errors: u64,
}

impl CrawlStats {
    /// Creates zeroed statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful fetch
    pub fn record_page(&mut self) {
        self.pages_crawled += 1;
    }

    /// Records a failed fetch
    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    /// Records a record that could not be persisted
    pub fn record_save_error(&mut self) {
        self.save_errors += 1;
    }

    /// Adds the number of links followed from one page
    pub fn record_links(&mut self, followed: usize) {
        self.links_found += followed as u64;
    }

    /// Number of URLs that reached the fetcher
    pub fn dispatched(&self) -> u64 {
        self.pages_crawled + self.errors
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
/// * `cancelled` - Whether the run was stopped before the traversal finished
pub fn print_statistics(stats: &CrawlStats, cancelled: bool) {
    println!("=== Crawl Statistics ===\n");

    if cancelled {
        println!("Run was stopped before the traversal finished.\n");
    }

    println!("Overview:");
    println!("  Pages crawled: {}", stats.pages_crawled);
    println!("  Links followed: {}", stats.links_found);
    println!("  Fetch errors: {}", stats.errors);
    if stats.save_errors > 0 {
        println!("  Records not saved: {}", stats.save_errors);
    }
    println!();

    let dispatched = stats.dispatched();
    let success_rate = if dispatched > 0 {
        (stats.pages_crawled as f64 / dispatched as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} requests succeeded)",
        success_rate, stats.pages_crawled, dispatched
    );
}
