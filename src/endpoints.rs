//! Base URLs for every external service the resolver talks to.
//!
//! Production code uses [`Endpoints::default`]; tests point individual
//! services at a local mock server.

const DEFAULT_EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
const DEFAULT_PMC_BASE_URL: &str = "https://www.ncbi.nlm.nih.gov";
const DEFAULT_DOI_BASE_URL: &str = "https://doi.org";
const DEFAULT_UNPAYWALL_BASE_URL: &str = "https://api.unpaywall.org/v2";
const DEFAULT_ARXIV_BASE_URL: &str = "https://arxiv.org";

/// External service base URLs (no trailing slash).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// NCBI E-utilities root (`efetch.fcgi` lives below it).
    pub eutils: String,
    /// Host serving `/pmc/articles/{pmcid}/pdf/`.
    pub pmc: String,
    /// DOI resolver.
    pub doi: String,
    /// Unpaywall v2 API root.
    pub unpaywall: String,
    /// arXiv host serving `/pdf/{id}.pdf`.
    pub arxiv: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            eutils: DEFAULT_EUTILS_BASE_URL.to_string(),
            pmc: DEFAULT_PMC_BASE_URL.to_string(),
            doi: DEFAULT_DOI_BASE_URL.to_string(),
            unpaywall: DEFAULT_UNPAYWALL_BASE_URL.to_string(),
            arxiv: DEFAULT_ARXIV_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Points every service at `base`; used by tests with a single mock server.
    #[must_use]
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            eutils: format!("{base}/entrez/eutils"),
            pmc: base.to_string(),
            doi: base.to_string(),
            unpaywall: format!("{base}/unpaywall/v2"),
            arxiv: base.to_string(),
        }
    }

    /// `efetch` URL returning PubMed XML for `pmid`.
    #[must_use]
    pub fn pubmed_efetch(&self, pmid: &str) -> String {
        format!(
            "{}/efetch.fcgi?db=pubmed&id={}&retmode=xml",
            self.eutils.trim_end_matches('/'),
            urlencoding::encode(pmid)
        )
    }

    /// PMC PDF landing path for `pmcid`.
    #[must_use]
    pub fn pmc_pdf(&self, pmcid: &str) -> String {
        format!(
            "{}/pmc/articles/{pmcid}/pdf/",
            self.pmc.trim_end_matches('/')
        )
    }

    /// Resolver URL for a bare DOI.
    #[must_use]
    pub fn doi_url(&self, doi: &str) -> String {
        format!("{}/{}", self.doi.trim_end_matches('/'), doi.trim())
    }

    /// Unpaywall record URL for `doi` with the contact email.
    #[must_use]
    pub fn unpaywall_record(&self, doi: &str, email: &str) -> String {
        format!(
            "{}/{}?email={}",
            self.unpaywall.trim_end_matches('/'),
            doi.trim(),
            urlencoding::encode(email)
        )
    }

    /// Canonical arXiv PDF URL for an identifier.
    #[must_use]
    pub fn arxiv_pdf(&self, arxiv_id: &str) -> String {
        format!("{}/pdf/{arxiv_id}.pdf", self.arxiv.trim_end_matches('/'))
    }
}
