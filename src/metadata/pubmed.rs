//! PubMed identifier handling: PMID extraction and efetch XML parsing.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;
use url::Url;

/// Article identifiers read from one efetch document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleIds {
    /// `ArticleId[IdType="doi"]`
    pub doi: Option<String>,
    /// `ArticleId[IdType="pmc"]`
    pub pmcid: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum IdKind {
    Doi,
    Pmc,
}

/// Returns the PMID from a PubMed article URL (its last non-empty path segment).
#[must_use]
pub fn pmid_from_url(pubmed_url: &str) -> Option<String> {
    if let Ok(parsed) = Url::parse(pubmed_url) {
        return parsed
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .next_back()
            .map(str::to_string);
    }

    pubmed_url
        .split(['?', '#'])
        .next()?
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Reads the article's own DOI and PMC ID from efetch XML.
///
/// Only the first `ArticleId` of each type counts. Identifiers inside a
/// `ReferenceList` belong to cited works and are skipped.
#[must_use]
pub fn parse_article_ids(xml: &str) -> ArticleIds {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut ids = ArticleIds::default();
    let mut reference_depth: usize = 0;
    let mut pending: Option<IdKind> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => match element.name().as_ref() {
                b"ReferenceList" => reference_depth += 1,
                b"ArticleId" if reference_depth == 0 => pending = id_kind(&element),
                _ => {}
            },
            Ok(Event::Text(text)) => {
                let Some(kind) = pending.take() else {
                    continue;
                };
                let Ok(value) = text.unescape() else {
                    continue;
                };
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }
                let slot = match kind {
                    IdKind::Doi => &mut ids.doi,
                    IdKind::Pmc => &mut ids.pmcid,
                };
                if slot.is_none() {
                    *slot = Some(value.to_string());
                }
            }
            Ok(Event::End(element)) => match element.name().as_ref() {
                b"ReferenceList" => reference_depth = reference_depth.saturating_sub(1),
                b"ArticleId" => pending = None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(error) => {
                debug!(error = %error, "malformed PubMed XML; keeping identifiers read so far");
                break;
            }
            _ => {}
        }

        if ids.doi.is_some() && ids.pmcid.is_some() {
            break;
        }
    }

    ids
}

fn id_kind(element: &BytesStart<'_>) -> Option<IdKind> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"IdType")
        .and_then(|attr| match attr.value.as_ref() {
            b"doi" => Some(IdKind::Doi),
            b"pmc" => Some(IdKind::Pmc),
            _ => None,
        })
}
