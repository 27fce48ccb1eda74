//! Pulls the title and relation lists out of an rfc-editor.org HTML page.
//!
//! Two page layouts are in the wild: the xml2rfc v3 rendering keeps the
//! relations in a `<dl id="identifiers">` block, while older htmlized pages
//! carry them inside the preformatted header as
//! `Updated by: <a href="...">1101</a>, <a ...>1183</a>` lines that may wrap.

use crate::error::{Result, ScanError};
use crate::result::{DocumentId, RelationKind, RelationSet};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

const TITLE_SELECTORS: [&str; 3] = ["span.h1", "h1#title", "title"];

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScanError::ParseError(format!("selector {}: {:?}", css, e)))
}

/// Parse a full RFC page into a normalized relation set.
pub fn parse_relation_page(html: &str) -> Result<RelationSet> {
    let document = Html::parse_document(html);
    let mut set = RelationSet::new(extract_title(&document)?);

    for kind in RelationKind::ALL {
        let mut ids = definition_list_ids(&document, kind.label())?;
        if ids.is_empty() {
            ids = header_line_ids(html, kind.label())?;
        }
        debug!("{}: {:?}", kind, ids);
        set.relations.get_mut(kind).extend(ids);
    }

    Ok(set.normalized())
}

pub fn extract_title(document: &Html) -> Result<String> {
    for css in TITLE_SELECTORS {
        let sel = selector(css)?;
        if let Some(title) = document
            .select(&sel)
            .map(|element| collapse_whitespace(&element.text().collect::<String>()))
            .find(|title| !title.is_empty())
        {
            return Ok(title);
        }
    }
    Ok(String::new())
}

fn definition_list_ids(document: &Html, label: &str) -> Result<Vec<DocumentId>> {
    let dt_selector = selector("dt")?;
    let anchor_selector = selector("a")?;
    let mut ids = Vec::new();

    for dt in document.select(&dt_selector) {
        if collapse_whitespace(&dt.text().collect::<String>()) != label {
            continue;
        }
        let dd = dt
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .next()
            .filter(|element| element.value().name() == "dd");
        if let Some(dd) = dd {
            ids.extend(dd.select(&anchor_selector).filter_map(anchor_id));
        }
    }

    Ok(ids)
}

fn header_line_ids(html: &str, label: &str) -> Result<Vec<DocumentId>> {
    let anchor_selector = selector("a")?;
    let lines: Vec<&str> = html.lines().collect();
    let mut ids = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(pos) = lines[i].find(label) else {
            i += 1;
            continue;
        };

        let mut segment = lines[i][pos + label.len()..].to_string();
        let mut next = i + 1;
        while next < lines.len() && is_continuation(lines[next]) {
            segment.push('\n');
            segment.push_str(lines[next]);
            next += 1;
        }

        let fragment = Html::parse_fragment(&segment);
        ids.extend(fragment.select(&anchor_selector).filter_map(anchor_id));
        i = next;
    }

    Ok(ids)
}

/// A wrapped header line: indented, and nothing but links from the first column on.
fn is_continuation(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.len() < line.len() && trimmed.starts_with("<a ")
}

fn anchor_id(anchor: ElementRef<'_>) -> Option<DocumentId> {
    let text = anchor.text().collect::<String>();
    if let Ok(id) = text.parse::<DocumentId>() {
        return Some(id);
    }

    let from_href = anchor.value().attr("href").and_then(href_id);
    if from_href.is_none() {
        debug!("Skipping malformed relation entry {:?}", text.trim());
    }
    from_href
}

fn href_id(href: &str) -> Option<DocumentId> {
    let last = href.trim_end_matches('/').rsplit('/').next()?;
    let stem = last
        .strip_suffix(".html")
        .or_else(|| last.strip_suffix(".txt"))
        .unwrap_or(last);
    stem.strip_prefix("rfc")?.parse().ok()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
