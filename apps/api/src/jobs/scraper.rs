//! Internship listing scraper.
//!
//! Fetching and parsing are split so the parser can be exercised on fixtures.

use std::time::Duration;

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::job::NewJobPosting;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const LISTING_LOCATION: &str = "Remote";
pub const LISTING_TAGS: &[&str] = &["Internship", "Software Development"];

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("listing site returned status {0}")]
    Status(u16),

    #[error("listing site served a captcha")]
    Blocked,

    #[error("listing container not found; the page layout may have changed")]
    MissingContainer,

    #[error("invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

impl From<ScrapeError> for AppError {
    fn from(err: ScrapeError) -> Self {
        warn!("Job scrape failed: {err}");
        AppError::UpstreamUnavailable(format!("Job listing scrape failed: {err}"))
    }
}

#[derive(Clone)]
pub struct JobScraper {
    client: Client,
    listing_url: String,
    base_url: String,
}

impl JobScraper {
    pub fn new(listing_url: String, base_url: String) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            listing_url,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the listing page and returns every complete listing on it.
    pub async fn fetch_listings(&self) -> Result<Vec<NewJobPosting>, ScrapeError> {
        info!("Fetching job listings from {}", self.listing_url);

        let response = self.client.get(&self.listing_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status(status.as_u16()));
        }

        let html = response.text().await?;
        let listings = parse_listings(&html, &self.base_url)?;
        info!("Scraped {} job listings", listings.len());
        Ok(listings)
    }
}

/// Parses a listing page. Cards without a title, company or link are skipped.
pub fn parse_listings(html: &str, base_url: &str) -> Result<Vec<NewJobPosting>, ScrapeError> {
    if html.to_lowercase().contains("captcha") {
        return Err(ScrapeError::Blocked);
    }

    let document = Html::parse_document(html);
    let container_sel = selector("div#internship_list_container")?;
    let card_sel = selector("div.internship_meta")?;
    let title_sel = selector("h3.heading_4_5")?;
    let company_sel = selector("a.link_display_like_text")?;
    let link_sel = selector("a")?;

    let container = document
        .select(&container_sel)
        .next()
        .ok_or(ScrapeError::MissingContainer)?;

    let base_url = base_url.trim_end_matches('/');
    let listings = container
        .select(&card_sel)
        .filter_map(|card| {
            let title_el = card.select(&title_sel).next()?;
            let title = clean_text(title_el);
            let company = clean_text(card.select(&company_sel).next()?);
            let href = title_el.select(&link_sel).next()?.value().attr("href")?;

            if title.is_empty() || company.is_empty() || href.trim().is_empty() {
                return None;
            }

            Some(NewJobPosting {
                title,
                company_name: company,
                location: LISTING_LOCATION.to_string(),
                apply_link: absolute_link(base_url, href.trim()),
                tags: LISTING_TAGS.iter().map(|t| t.to_string()).collect(),
            })
        })
        .collect();

    Ok(listings)
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::InvalidSelector {
        selector: css.to_string(),
        message: format!("{e:?}"),
    })
}

fn clean_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn absolute_link(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{base_url}{href}")
    } else {
        format!("{base_url}/{href}")
    }
}
