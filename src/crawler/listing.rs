//! Listing page parser
//!
//! Turns one page of the ranked-movies listing into movie stubs. The page
//! carries one `article` per ranked movie; any article missing its expected
//! sub-elements means the site layout changed and the whole crawl must abort
//! rather than silently return fewer movies.

use crate::crawler::{element_text, ParseError};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

static ARTICLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article").expect("static selector"));
static RANK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.film-title-user").expect("static selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.film-title-name").expect("static selector"));

/// Movie ids are embedded in detail-page hrefs as `/film/<id>-<slug>/`.
static MOVIE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/film/(\d+)-").expect("static regex"));

/// A ranked movie as extracted from the listing, prior to enrichment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieStub {
    /// Site-assigned movie id
    pub id: i64,

    /// Display title
    pub title: String,

    /// 1-based position in the ranking
    pub rank: u32,

    /// Relative path of the movie's detail page
    pub detail_path: String,
}

/// Parses one listing page into movie stubs, in document order
/// (which is rank order).
pub fn parse_listing_page(html: &str) -> Result<Vec<MovieStub>, ParseError> {
    let document = Html::parse_document(html);

    let mut movies = Vec::new();
    for article in document.select(&ARTICLE_SELECTOR) {
        let rank_span = article
            .select(&RANK_SELECTOR)
            .next()
            .ok_or(ParseError::MissingListingElement {
                what: "span.film-title-user",
            })?;
        let title_link = article
            .select(&TITLE_SELECTOR)
            .next()
            .ok_or(ParseError::MissingListingElement {
                what: "a.film-title-name",
            })?;

        let rank_text = element_text(rank_span);
        let rank: u32 = rank_text
            .trim_end_matches('.')
            .parse()
            .map_err(|_| ParseError::InvalidRank {
                text: rank_text.clone(),
            })?;

        let title = element_text(title_link);
        let href = title_link
            .value()
            .attr("href")
            .ok_or(ParseError::MissingListingElement {
                what: "href on a.film-title-name",
            })?
            .trim()
            .to_string();

        let id = movie_id_from_href(&href)?;

        let movie = MovieStub {
            id,
            title,
            rank,
            detail_path: href,
        };
        tracing::trace!(?movie, "parsed movie");
        movies.push(movie);
    }

    Ok(movies)
}

fn movie_id_from_href(href: &str) -> Result<i64, ParseError> {
    MOVIE_ID_RE
        .captures(href)
        .and_then(|captures| captures.get(1))
        .and_then(|id| id.as_str().parse().ok())
        .ok_or_else(|| ParseError::IdNotFound {
            href: href.to_string(),
        })
}
