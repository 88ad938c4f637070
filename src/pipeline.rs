//! Document verification pipeline
//!
//! Extract text -> extract claims -> per claim: formulate query, search,
//! judge. Claims are processed one at a time; a claim-local failure never
//! stops the run. Only document-level extraction failure aborts.

use crate::claims;
use crate::document::{self, ExtractError};
use crate::llm::LanguageModel;
use crate::query;
use crate::search::SearchProvider;
use crate::verdict::{self, VerificationResult};

/// Results requested from the search provider per claim
const SEARCH_MAX_RESULTS: u32 = 5;

/// Verify every claim in a PDF document.
pub async fn verify_document<M, S>(
    pdf_bytes: &[u8],
    model: &M,
    search: &S,
) -> Result<Vec<VerificationResult>, ExtractError>
where
    M: LanguageModel + ?Sized,
    S: SearchProvider + ?Sized,
{
    let text = document::extract_text(pdf_bytes)?;
    println!("[Pipeline] Extracted {} bytes of text", text.len());

    let extraction = claims::extract_claims(&text, model).await;
    println!("[Pipeline] Verifying {} claims", extraction.claims.len());

    let mut results = Vec::with_capacity(extraction.claims.len());

    for claim in &extraction.claims {
        let search_query = query::formulate(&claim.claim_text);

        // Search failures are absorbed: the claim degrades to Unverifiable
        // via the empty result set instead of stopping the run.
        let hits = match search.search(&search_query, SEARCH_MAX_RESULTS).await {
            Ok(hits) => hits,
            Err(e) => {
                eprintln!("[Pipeline] Search failed for \"{}\": {}", search_query, e);
                Vec::new()
            }
        };

        let result = verdict::judge_claim(&claim.claim_text, &hits, model).await;
        println!(
            "[Pipeline]   {} -> {}",
            truncate_for_log(&claim.claim_text),
            result.verdict.as_str()
        );
        results.push(result);
    }

    Ok(results)
}

fn truncate_for_log(claim: &str) -> String {
    if claim.chars().count() > 60 {
        let prefix: String = claim.chars().take(57).collect();
        format!("{}...", prefix)
    } else {
        claim.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchHit;
    use crate::verdict::Verdict;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Fake model that answers extraction and judging deterministically
    struct FakeModel {
        structured: Result<serde_json::Value, String>,
        judge_response: Result<String, String>,
        /// Captured complete_text prompts, for asserting on query/snippet flow
        text_prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LanguageModel for FakeModel {
        async fn complete_structured(&self, _prompt: &str) -> Result<serde_json::Value, String> {
            self.structured.clone()
        }

        async fn complete_text(&self, prompt: &str) -> Result<String, String> {
            self.text_prompts.lock().unwrap().push(prompt.to_string());
            self.judge_response.clone()
        }
    }

    struct FakeSearch {
        response: Result<Vec<SearchHit>, String>,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchProvider for FakeSearch {
        async fn search(&self, query: &str, _max_results: u32) -> Result<Vec<SearchHit>, String> {
            self.queries.lock().unwrap().push(query.to_string());
            self.response.clone()
        }
    }

    // pdf extraction is exercised separately; pipeline tests drive the
    // post-extraction stages through the public claim/judge/search seams
    async fn run_claims_through_pipeline(
        model: &FakeModel,
        search: &FakeSearch,
        text: &str,
    ) -> Vec<VerificationResult> {
        let extraction = claims::extract_claims(text, model).await;
        let mut results = Vec::new();
        for claim in &extraction.claims {
            let q = query::formulate(&claim.claim_text);
            let hits = match search.search(&q, SEARCH_MAX_RESULTS).await {
                Ok(h) => h,
                Err(_) => Vec::new(),
            };
            results.push(verdict::judge_claim(&claim.claim_text, &hits, model).await);
        }
        results
    }

    #[tokio::test]
    async fn test_end_to_end_outdated_scenario() {
        // "Revenue grew 45% in 2023." -> statistic claim -> verbatim query
        // -> snippets with 2024 data -> Outdated
        let model = FakeModel {
            structured: Ok(serde_json::json!({
                "claims": [{"claim_text": "Revenue grew 45% in 2023.", "claim_type": "statistic"}]
            })),
            judge_response: Ok(
                "Outdated. Sources report 2024 revenue figures that supersede the 2023 data."
                    .to_string(),
            ),
            text_prompts: Mutex::new(Vec::new()),
        };
        let search = FakeSearch {
            response: Ok(vec![SearchHit {
                content: "Company revenue grew 38% in fiscal 2024.".to_string(),
                url: "https://news.example/revenue-2024".to_string(),
            }]),
            queries: Mutex::new(Vec::new()),
        };

        let results =
            run_claims_through_pipeline(&model, &search, "Revenue grew 45% in 2023.").await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].verdict, Verdict::Outdated);
        assert_eq!(results[0].original_claim, "Revenue grew 45% in 2023.");
        assert_eq!(results[0].source_url, "https://news.example/revenue-2024");

        // Query used the claim verbatim (contains "45%" and "2023")
        let queries = search.queries.lock().unwrap();
        assert_eq!(queries.as_slice(), ["Revenue grew 45% in 2023."]);

        // Judge prompt carried the snippet with its source label
        let prompts = model.text_prompts.lock().unwrap();
        assert!(prompts.last().unwrap().contains("Source 1: Company revenue grew 38%"));
    }

    #[tokio::test]
    async fn test_search_failure_degrades_claim_to_unverifiable() {
        let model = FakeModel {
            structured: Ok(serde_json::json!({
                "claims": [{"claim_text": "GDP rose 3% in 2022.", "claim_type": "statistic"}]
            })),
            judge_response: Ok("Verified.".to_string()),
            text_prompts: Mutex::new(Vec::new()),
        };
        let search = FakeSearch {
            response: Err("quota exhausted".to_string()),
            queries: Mutex::new(Vec::new()),
        };

        let results = run_claims_through_pipeline(&model, &search, "GDP rose 3% in 2022.").await;

        assert_eq!(results[0].verdict, Verdict::Unverifiable);
        assert_eq!(results[0].source_url, "N/A");
        // Judge never called the model: search failed, so no snippets existed
        assert!(model.text_prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_one_claim_failure_does_not_stop_others() {
        let model = FakeModel {
            structured: Ok(serde_json::json!({
                "claims": [
                    {"claim_text": "Claim one about 10% growth.", "claim_type": "statistic"},
                    {"claim_text": "Claim two about 20% growth.", "claim_type": "statistic"}
                ]
            })),
            judge_response: Err("model timeout".to_string()),
            text_prompts: Mutex::new(Vec::new()),
        };
        let search = FakeSearch {
            response: Ok(vec![SearchHit {
                content: "snippet".to_string(),
                url: "https://a.example".to_string(),
            }]),
            queries: Mutex::new(Vec::new()),
        };

        let results = run_claims_through_pipeline(&model, &search, "two claims").await;

        assert_eq!(results.len(), 2);
        for r in &results {
            assert_eq!(r.verdict, Verdict::Error);
            assert!(r.evidence.contains("model timeout"));
        }
    }

    #[tokio::test]
    async fn test_invalid_pdf_aborts_run() {
        let model = FakeModel {
            structured: Err("unused".to_string()),
            judge_response: Err("unused".to_string()),
            text_prompts: Mutex::new(Vec::new()),
        };
        let search = FakeSearch {
            response: Ok(Vec::new()),
            queries: Mutex::new(Vec::new()),
        };

        let result = verify_document(b"not a pdf", &model, &search).await;
        assert!(result.is_err());
    }
}
