//! Detail page parser
//!
//! Extracts the starring actors from a movie's detail page. The cast lives
//! in a `div.creators` container split into labeled sections; only the
//! section headed by the exact cast label is read. A page without that
//! section is valid domain data (animated titles often list no cast), but a
//! page without the container at all means the layout changed.

use crate::crawler::{element_text, ParseError};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::hash::{Hash, Hasher};

/// Heading text of the cast section
pub const CAST_SECTION_LABEL: &str = "Hrají:";

static CREATORS_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.creators").expect("static selector"));
static HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h4").expect("static selector"));
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("static selector"));

/// Actor ids lead their profile hrefs as `/tvurce/<id>-<slug>/`.
static ACTOR_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/tvurce/(\d+)-").expect("static regex"));

/// An actor as extracted from a detail page
///
/// Identity is the site-assigned id alone: the same actor can be rendered
/// with slightly different name text on different pages, and the id is what
/// deduplication across movies keys on.
#[derive(Debug, Clone)]
pub struct ActorStub {
    pub id: i64,
    pub name: String,
}

impl PartialEq for ActorStub {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ActorStub {}

impl Hash for ActorStub {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Parses the starring actors out of a movie detail page.
///
/// Returns an empty list (with a warning event) when the cast section is
/// absent; fails when the cast container itself is missing or an actor link
/// carries no parseable id.
pub fn parse_actors(html: &str) -> Result<Vec<ActorStub>, ParseError> {
    let document = Html::parse_document(html);

    let creators = document
        .select(&CREATORS_SELECTOR)
        .next()
        .ok_or(ParseError::MissingCastContainer)?;

    let cast_section = match find_cast_section(creators) {
        Some(section) => section,
        None => {
            // Happens legitimately, e.g. on animated movies.
            tracing::warn!("no cast section on detail page, assuming no actors");
            return Ok(Vec::new());
        }
    };

    let mut actors = Vec::new();
    for link in cast_section.select(&LINK_SELECTOR) {
        let href = link
            .value()
            .attr("href")
            .ok_or(ParseError::MissingActorHref)?;

        // The trailing "more" link that expands the full cast list.
        if href == "#" {
            continue;
        }

        let name = element_text(link);
        let id = actor_id_from_href(href)?;
        tracing::trace!(id, name = %name, "parsed actor");
        actors.push(ActorStub { id, name });
    }

    Ok(actors)
}

/// Finds the direct child section of the creators container whose heading
/// text is exactly the cast label.
fn find_cast_section(creators: ElementRef<'_>) -> Option<ElementRef<'_>> {
    for child in creators.children() {
        let section = match ElementRef::wrap(child) {
            Some(element) => element,
            None => continue,
        };
        if section.value().name() != "div" {
            continue;
        }
        if let Some(heading) = section.select(&HEADING_SELECTOR).next() {
            if element_text(heading) == CAST_SECTION_LABEL {
                return Some(section);
            }
        }
    }
    None
}

fn actor_id_from_href(href: &str) -> Result<i64, ParseError> {
    ACTOR_ID_RE
        .captures(href)
        .and_then(|captures| captures.get(1))
        .and_then(|id| id.as_str().parse().ok())
        .ok_or_else(|| ParseError::IdNotFound {
            href: href.to_string(),
        })
}
