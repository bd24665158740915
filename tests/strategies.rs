//! Integration tests for the site strategies against a scripted transport.

use std::sync::Arc;

use paper_downloader_core::strategy::{
    ArxivStrategy, BiorxivStrategy, CellStrategy, FrontiersStrategy, GenericStrategy,
    NatureStrategy, PubMedStrategy, ScienceStrategy,
};
use paper_downloader_core::{Strategy, StrategyOutcome};

mod support;
use support::scripted_fetch::{ScriptedFetch, context, context_with_email, efetch_xml};

fn expect_pdf(outcome: StrategyOutcome) -> String {
    match outcome {
        StrategyOutcome::Pdf { pdf_url, .. } => pdf_url,
        StrategyOutcome::Failed { reason, .. } => panic!("expected a PDF, got failure: {reason}"),
    }
}

fn expect_failed(outcome: StrategyOutcome) -> (String, Option<String>) {
    match outcome {
        StrategyOutcome::Failed {
            reason,
            fallback_url,
        } => (reason, fallback_url),
        StrategyOutcome::Pdf { pdf_url, .. } => panic!("expected failure, got PDF from {pdf_url}"),
    }
}

// ==================== Generic ====================

#[tokio::test]
async fn test_generic_direct_pdf_succeeds() {
    let url = "https://example.com/files/report.pdf";
    let fetch = Arc::new(ScriptedFetch::new().pdf(url));

    let outcome = GenericStrategy.resolve(url, &context(&fetch)).await;
    assert_eq!(expect_pdf(outcome), url);
    assert_eq!(fetch.requested_urls(), vec![url]);
}

#[tokio::test]
async fn test_generic_html_page_fails_without_fallback() {
    let url = "https://example.com/article/42";
    let fetch = Arc::new(ScriptedFetch::new().html(url, "<html><body>Article</body></html>"));

    let (reason, fallback) = expect_failed(GenericStrategy.resolve(url, &context(&fetch)).await);
    assert_eq!(reason, "No direct PDF");
    assert!(fallback.is_none());
}

#[tokio::test]
async fn test_generic_pdf_content_type_with_error_status_fails() {
    let url = "https://example.com/missing.pdf";
    let fetch = Arc::new(ScriptedFetch::new().respond(url, 404, "application/pdf", b""));

    let (reason, _) = expect_failed(GenericStrategy.resolve(url, &context(&fetch)).await);
    assert_eq!(reason, "No direct PDF");
}

#[tokio::test]
async fn test_generic_transport_error_is_a_plain_failure() {
    let url = "https://unreachable.example/paper.pdf";
    let fetch = Arc::new(ScriptedFetch::new().network_error(url));

    let (reason, fallback) = expect_failed(GenericStrategy.resolve(url, &context(&fetch)).await);
    assert_eq!(reason, "No direct PDF");
    assert!(fallback.is_none());
}

// ==================== arXiv ====================

#[tokio::test]
async fn test_arxiv_abs_url_probes_canonical_pdf() {
    let fetch = Arc::new(ScriptedFetch::new().pdf("https://arxiv.org/pdf/2301.00001.pdf"));

    let outcome = ArxivStrategy
        .resolve("https://arxiv.org/abs/2301.00001", &context(&fetch))
        .await;
    assert_eq!(expect_pdf(outcome), "https://arxiv.org/pdf/2301.00001.pdf");
    assert_eq!(fetch.requested_urls(), vec!["https://arxiv.org/pdf/2301.00001.pdf"]);
}

#[tokio::test]
async fn test_arxiv_abs_and_pdf_forms_are_equivalent() {
    let abs_fetch = Arc::new(ScriptedFetch::new().pdf("https://arxiv.org/pdf/2301.00001.pdf"));
    let pdf_fetch = Arc::new(ScriptedFetch::new().pdf("https://arxiv.org/pdf/2301.00001.pdf"));

    let from_abs = ArxivStrategy
        .resolve("https://arxiv.org/abs/2301.00001", &context(&abs_fetch))
        .await;
    let from_pdf = ArxivStrategy
        .resolve("https://arxiv.org/pdf/2301.00001", &context(&pdf_fetch))
        .await;

    assert_eq!(expect_pdf(from_abs), expect_pdf(from_pdf));
    assert_eq!(abs_fetch.requested_urls(), pdf_fetch.requested_urls());
}

#[tokio::test]
async fn test_arxiv_invalid_url_makes_no_request() {
    let fetch = Arc::new(ScriptedFetch::new());

    let (reason, fallback) = expect_failed(
        ArxivStrategy
            .resolve("https://arxiv.org/list/cs.LG/recent", &context(&fetch))
            .await,
    );
    assert_eq!(reason, "Invalid arXiv URL");
    assert!(fallback.is_none());
    assert!(fetch.requested_urls().is_empty());
}

#[tokio::test]
async fn test_arxiv_probe_failure() {
    let fetch = Arc::new(
        ScriptedFetch::new().html("https://arxiv.org/pdf/2301.00001.pdf", "<html>busy</html>"),
    );

    let (reason, fallback) = expect_failed(
        ArxivStrategy
            .resolve("https://arxiv.org/abs/2301.00001v2", &context(&fetch))
            .await,
    );
    assert_eq!(reason, "arXiv PDF failed");
    assert!(fallback.is_none());
    assert_eq!(fetch.count("https://arxiv.org/pdf/2301.00001.pdf"), 1);
}

// ==================== bioRxiv / medRxiv ====================

#[tokio::test]
async fn test_biorxiv_second_suffix_wins_after_first_404() {
    let base = "https://www.biorxiv.org/content/10.1101/2020.01.01.12345v1";
    let fetch = Arc::new(ScriptedFetch::new().pdf(&format!("{base}/full.pdf")));

    let outcome = BiorxivStrategy
        .resolve(&format!("{base}?versioned=true"), &context(&fetch))
        .await;
    assert_eq!(expect_pdf(outcome), format!("{base}/full.pdf"));
    assert_eq!(
        fetch.requested_urls(),
        vec![format!("{base}.full.pdf"), format!("{base}/full.pdf")]
    );
}

#[tokio::test]
async fn test_biorxiv_first_suffix_short_circuits() {
    let base = "https://www.medrxiv.org/content/10.1101/2021.02.02.21250000v1";
    let fetch = Arc::new(ScriptedFetch::new().pdf(&format!("{base}.full.pdf")));

    let outcome = BiorxivStrategy.resolve(&format!("{base}/"), &context(&fetch)).await;
    assert_eq!(expect_pdf(outcome), format!("{base}.full.pdf"));
    assert_eq!(fetch.requested_urls().len(), 1);
}

#[tokio::test]
async fn test_biorxiv_not_found() {
    let fetch = Arc::new(ScriptedFetch::new());

    let (reason, fallback) = expect_failed(
        BiorxivStrategy
            .resolve("https://www.biorxiv.org/content/10.1101/x", &context(&fetch))
            .await,
    );
    assert_eq!(reason, "bioRxiv PDF not found");
    assert!(fallback.is_none());
}

// ==================== Nature / Science / Cell ====================

#[tokio::test]
async fn test_nature_landing_link_is_absolutized_and_probed() {
    let url = "https://www.nature.com/articles/s41586-020-2649-2";
    let pdf = "https://www.nature.com/articles/s41586-020-2649-2.pdf";
    let fetch = Arc::new(
        ScriptedFetch::new()
            .html(
                url,
                r#"<a href="/articles/s41586-020-2649-2#refs">Refs</a>
                   <a href="/articles/s41586-020-2649-2.pdf">Download PDF</a>"#,
            )
            .pdf(pdf),
    );

    let outcome = NatureStrategy.resolve(url, &context(&fetch)).await;
    assert_eq!(expect_pdf(outcome), pdf);
}

#[tokio::test]
async fn test_nature_unreachable_page_has_no_fallback() {
    let url = "https://www.nature.com/articles/gone";
    let fetch = Arc::new(ScriptedFetch::new().status(url, 503));

    let (reason, fallback) = expect_failed(NatureStrategy.resolve(url, &context(&fetch)).await);
    assert_eq!(reason, "Nature page unreachable");
    assert!(fallback.is_none());
}

#[tokio::test]
async fn test_nature_page_without_pdf_falls_back_to_article() {
    let url = "https://www.nature.com/articles/news-1";
    let fetch = Arc::new(ScriptedFetch::new().html(url, "<a href=\"/subscribe\">Subscribe</a>"));

    let (reason, fallback) = expect_failed(NatureStrategy.resolve(url, &context(&fetch)).await);
    assert_eq!(reason, "Nature PDF not found");
    assert_eq!(fallback.as_deref(), Some(url));
}

#[tokio::test]
async fn test_science_pdf_link_probe_failure_falls_back() {
    let url = "https://www.science.org/doi/10.1126/science.abc1234";
    let fetch = Arc::new(
        ScriptedFetch::new()
            .html(url, r#"<a href="/doi/pdf/10.1126/science.abc1234.pdf">PDF</a>"#)
            .html(
                "https://www.science.org/doi/pdf/10.1126/science.abc1234.pdf",
                "<html>login</html>",
            ),
    );

    let (reason, fallback) = expect_failed(ScienceStrategy.resolve(url, &context(&fetch)).await);
    assert_eq!(reason, "Science PDF not found");
    assert_eq!(fallback.as_deref(), Some(url));
}

#[tokio::test]
async fn test_science_network_error_is_unreachable() {
    let url = "https://www.science.org/doi/10.1126/science.down";
    let fetch = Arc::new(ScriptedFetch::new().network_error(url));

    let (reason, fallback) = expect_failed(ScienceStrategy.resolve(url, &context(&fetch)).await);
    assert_eq!(reason, "Science page unreachable");
    assert!(fallback.is_none());
}

#[tokio::test]
async fn test_cell_success_uses_post_redirect_base() {
    let url = "https://www.cell.com/cell/fulltext/S0092-8674(20)30001-1";
    let landing = "https://www.cell.com/cell/fulltext/S0092-8674(20)30001-1?rss=yes";
    let pdf = "https://www.cell.com/action/showPdf?pii=S0092-8674(20)30001-1&file=main.pdf";
    let fetch = Arc::new(
        ScriptedFetch::new()
            .redirect_to(
                url,
                landing,
                r#"<a href="/action/showPdf?pii=S0092-8674(20)30001-1&amp;file=main.pdf">PDF</a>"#,
            )
            .pdf(pdf),
    );

    let outcome = CellStrategy.resolve(url, &context(&fetch)).await;
    assert_eq!(expect_pdf(outcome), pdf);
}

#[tokio::test]
async fn test_cell_timeout_is_unreachable() {
    let url = "https://www.cell.com/cell/fulltext/slow";
    let fetch = Arc::new(ScriptedFetch::new().timeout(url));

    let (reason, _) = expect_failed(CellStrategy.resolve(url, &context(&fetch)).await);
    assert_eq!(reason, "Cell page unreachable");
}

// ==================== Frontiers ====================

#[tokio::test]
async fn test_frontiers_pdf_suffix_first() {
    let url = "https://www.frontiersin.org/articles/10.3389/fimmu.2021.1/full";
    let fetch = Arc::new(ScriptedFetch::new().pdf(&format!("{url}/pdf")));

    let outcome = FrontiersStrategy.resolve(url, &context(&fetch)).await;
    assert_eq!(expect_pdf(outcome), format!("{url}/pdf"));
    assert_eq!(fetch.requested_urls().len(), 1);
}

#[tokio::test]
async fn test_frontiers_falls_back_to_page_link() {
    let url = "https://www.frontiersin.org/articles/10.3389/fimmu.2021.2/full";
    let pdf = "https://www.frontiersin.org/articles/10.3389/fimmu.2021.2/pdf.pdf";
    let fetch = Arc::new(
        ScriptedFetch::new()
            .html(url, r#"<a href="/articles/10.3389/fimmu.2021.2/pdf.pdf">Download</a>"#)
            .pdf(pdf),
    );

    let outcome = FrontiersStrategy.resolve(url, &context(&fetch)).await;
    assert_eq!(expect_pdf(outcome), pdf);
    assert_eq!(fetch.requested_urls(), vec![format!("{url}/pdf"), url.to_string(), pdf.to_string()]);
}

#[tokio::test]
async fn test_frontiers_not_found_keeps_article_fallback() {
    let url = "https://www.frontiersin.org/articles/10.3389/fimmu.2021.3/full";
    let fetch = Arc::new(ScriptedFetch::new().status(url, 500));

    let (reason, fallback) = expect_failed(FrontiersStrategy.resolve(url, &context(&fetch)).await);
    assert_eq!(reason, "Frontiers PDF not found");
    assert_eq!(fallback.as_deref(), Some(url));
}

// ==================== PubMed ====================

const PUBMED_URL: &str = "https://pubmed.ncbi.nlm.nih.gov/31978945/";
const EFETCH_URL: &str =
    "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi?db=pubmed&id=31978945&retmode=xml";

#[tokio::test]
async fn test_pubmed_pmc_pdf_first() {
    let pmc_pdf = "https://www.ncbi.nlm.nih.gov/pmc/articles/PMC7092803/pdf/";
    let fetch = Arc::new(
        ScriptedFetch::new()
            .xml(
                EFETCH_URL,
                &efetch_xml(Some("10.1056/NEJMoa2001017"), Some("PMC7092803")),
            )
            .pdf(pmc_pdf),
    );

    let outcome = PubMedStrategy.resolve(PUBMED_URL, &context(&fetch)).await;
    assert_eq!(expect_pdf(outcome), pmc_pdf);
    assert_eq!(fetch.requested_urls(), vec![EFETCH_URL, pmc_pdf]);
}

#[tokio::test]
async fn test_pubmed_without_identifiers() {
    let fetch = Arc::new(ScriptedFetch::new().xml(EFETCH_URL, &efetch_xml(None, None)));

    let (reason, fallback) = expect_failed(PubMedStrategy.resolve(PUBMED_URL, &context(&fetch)).await);
    assert_eq!(reason, "No PMC and no DOI");
    assert!(fallback.is_none());
    assert_eq!(fetch.count(EFETCH_URL), 1);
}

#[tokio::test]
async fn test_pubmed_efetch_failure_counts_as_no_identifiers() {
    let fetch = Arc::new(ScriptedFetch::new().network_error(EFETCH_URL));

    let (reason, _) = expect_failed(PubMedStrategy.resolve(PUBMED_URL, &context(&fetch)).await);
    assert_eq!(reason, "No PMC and no DOI");
}

#[tokio::test]
async fn test_pubmed_unresolvable_doi_points_at_doi_org() {
    let fetch = Arc::new(
        ScriptedFetch::new()
            .xml(EFETCH_URL, &efetch_xml(Some("10.1000/xyz"), None))
            .status("https://doi.org/10.1000/xyz", 404),
    );

    let (reason, fallback) = expect_failed(PubMedStrategy.resolve(PUBMED_URL, &context(&fetch)).await);
    assert_eq!(reason, "Could not resolve publisher page");
    assert_eq!(fallback.as_deref(), Some("https://doi.org/10.1000/xyz"));
}

#[tokio::test]
async fn test_pubmed_failed_pmc_probe_moves_on_to_publisher() {
    let landing = "https://journals.example.org/article/xyz";
    let fetch = Arc::new(
        ScriptedFetch::new()
            .xml(EFETCH_URL, &efetch_xml(Some("10.1000/xyz"), Some("PMC1")))
            .status("https://www.ncbi.nlm.nih.gov/pmc/articles/PMC1/pdf/", 403)
            .redirect_to(
                "https://doi.org/10.1000/xyz",
                landing,
                r#"<a href="/article/xyz/fulltext.pdf">Full text</a>"#,
            )
            .pdf("https://journals.example.org/article/xyz/fulltext.pdf"),
    );

    let outcome = PubMedStrategy.resolve(PUBMED_URL, &context(&fetch)).await;
    assert_eq!(
        expect_pdf(outcome),
        "https://journals.example.org/article/xyz/fulltext.pdf"
    );
    assert_eq!(fetch.count(EFETCH_URL), 1);
}

#[tokio::test]
async fn test_pubmed_publisher_without_pdf_needs_manual_download() {
    let landing = "https://journals.example.org/article/xyz";
    let fetch = Arc::new(
        ScriptedFetch::new()
            .xml(EFETCH_URL, &efetch_xml(Some("10.1000/xyz"), None))
            .redirect_to("https://doi.org/10.1000/xyz", landing, "<p>Paywalled</p>"),
    );

    let (reason, fallback) = expect_failed(PubMedStrategy.resolve(PUBMED_URL, &context(&fetch)).await);
    assert_eq!(reason, "Publisher page (manual download)");
    assert_eq!(fallback.as_deref(), Some(landing));
    assert!(
        fetch
            .requested_urls()
            .iter()
            .all(|url| !url.contains("unpaywall")),
        "no Unpaywall request without an email"
    );
}

#[tokio::test]
async fn test_pubmed_unpaywall_rescues_paywalled_article() {
    let landing = "https://journals.example.org/article/xyz";
    let oa_pdf = "https://repository.example.edu/xyz.pdf";
    let fetch = Arc::new(
        ScriptedFetch::new()
            .xml(EFETCH_URL, &efetch_xml(Some("10.1000/xyz"), None))
            .redirect_to("https://doi.org/10.1000/xyz", landing, "<p>Paywalled</p>")
            .json(
                "https://api.unpaywall.org/v2/10.1000/xyz?email=lab%40example.org",
                &serde_json::json!({
                    "oa_locations": [{"host_type": "repository", "url_for_pdf": oa_pdf}],
                    "best_oa_location": {"host_type": "repository", "url_for_pdf": oa_pdf}
                }),
            )
            .pdf(oa_pdf),
    );

    let ctx = context_with_email(&fetch, Some("lab@example.org"));
    let outcome = PubMedStrategy.resolve(PUBMED_URL, &ctx).await;
    assert_eq!(expect_pdf(outcome), oa_pdf);
}

#[tokio::test]
async fn test_pubmed_unpaywall_miss_still_reports_landing() {
    let landing = "https://journals.example.org/article/xyz";
    let fetch = Arc::new(
        ScriptedFetch::new()
            .xml(EFETCH_URL, &efetch_xml(Some("10.1000/xyz"), None))
            .redirect_to("https://doi.org/10.1000/xyz", landing, "<p>Paywalled</p>")
            .json(
                "https://api.unpaywall.org/v2/10.1000/xyz?email=lab%40example.org",
                &serde_json::json!({"oa_locations": [], "best_oa_location": null}),
            ),
    );

    let ctx = context_with_email(&fetch, Some("lab@example.org"));
    let (reason, fallback) = expect_failed(PubMedStrategy.resolve(PUBMED_URL, &ctx).await);
    assert_eq!(reason, "Publisher page (manual download)");
    assert_eq!(fallback.as_deref(), Some(landing));
}
