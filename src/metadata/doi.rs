//! DOI reference detection.

/// Returns true when `reference` is a bare DOI (`10.…`) or a `doi.org` link.
#[must_use]
pub fn is_doi_reference(reference: &str) -> bool {
    let reference = reference.trim();
    reference.starts_with("10.") || reference.to_ascii_lowercase().contains("doi.org/")
}

/// Returns true when `reference` is a bare DOI with no scheme or host.
#[must_use]
pub fn is_bare_doi(reference: &str) -> bool {
    reference.trim().starts_with("10.")
}
