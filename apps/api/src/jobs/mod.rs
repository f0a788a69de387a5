// Job board: internship scraping, dedup-by-link persistence, listing.

pub mod handlers;
pub mod scraper;
pub mod sync;
