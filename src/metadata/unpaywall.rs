//! Unpaywall record parsing and open-access URL selection.

use serde::Deserialize;

/// Subset of an Unpaywall v2 DOI record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnpaywallRecord {
    /// All known open-access locations, in Unpaywall's order.
    #[serde(default)]
    pub oa_locations: Option<Vec<OaLocation>>,
    /// Unpaywall's preferred location.
    #[serde(default)]
    pub best_oa_location: Option<OaLocation>,
}

/// One open-access copy of an article.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OaLocation {
    /// `publisher` or `repository`.
    #[serde(default)]
    pub host_type: Option<String>,
    /// Direct PDF link, when known.
    #[serde(default)]
    pub url_for_pdf: Option<String>,
    /// Landing or PDF URL.
    #[serde(default)]
    pub url: Option<String>,
}

impl UnpaywallRecord {
    /// Picks the most useful URL.
    ///
    /// Order: the first publisher-hosted location with a PDF link, then the
    /// first publisher-hosted location's URL, then the best location's PDF
    /// link or URL.
    #[must_use]
    pub fn preferred_url(&self) -> Option<String> {
        let locations = self.oa_locations.as_deref().unwrap_or_default();
        let publisher = || {
            locations
                .iter()
                .filter(|loc| loc.host_type.as_deref() == Some("publisher"))
        };

        publisher()
            .find_map(|loc| non_empty(loc.url_for_pdf.as_deref()))
            .or_else(|| publisher().find_map(|loc| non_empty(loc.url.as_deref())))
            .or_else(|| {
                self.best_oa_location.as_ref().and_then(|best| {
                    non_empty(best.url_for_pdf.as_deref()).or_else(|| non_empty(best.url.as_deref()))
                })
            })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
