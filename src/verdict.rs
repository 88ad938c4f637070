//! Verdict judging
//!
//! Sends a claim plus top search snippets to the model with a strict rubric
//! and parses the free-text response into one of five labels. Label matching
//! scans a fixed priority order and the first label found anywhere in the
//! response wins; responses mentioning several labels resolve by that order.
//! This is documented behavior carried over from the original rubric design.

use serde::{Deserialize, Serialize};

use crate::llm::LanguageModel;
use crate::search::SearchHit;

/// Maximum evidence length in characters
const EVIDENCE_MAX_CHARS: usize = 300;

/// Snippets used as evidence context per claim
const SNIPPETS_USED: usize = 3;

const NO_SOURCES_EVIDENCE: &str = "Unable to find relevant sources to verify this claim";

/// Terminal classification of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Verified,
    Inaccurate,
    Outdated,
    False,
    Unverifiable,
    Error,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Verified => "Verified",
            Verdict::Inaccurate => "Inaccurate",
            Verdict::Outdated => "Outdated",
            Verdict::False => "False",
            Verdict::Unverifiable => "Unverifiable",
            Verdict::Error => "Error",
        }
    }

    /// Labels the model may return, in parse priority order
    pub const PARSE_ORDER: [Verdict; 5] = [
        Verdict::Verified,
        Verdict::Inaccurate,
        Verdict::Outdated,
        Verdict::False,
        Verdict::Unverifiable,
    ];
}

/// One verified claim, ready for presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub original_claim: String,
    pub verdict: Verdict,
    pub evidence: String,
    pub source_url: String,
}

const RUBRIC_PROMPT: &str = r#"You are a skeptical fact-checker analyzing claims against evidence.

STRICT VERIFICATION RULES:
1. If numbers in the claim do NOT match the sources, mark as "Inaccurate"
2. If dates are outdated (claim says 2023 but sources show 2024/2025 data), mark as "Outdated"
3. If the claim contradicts the evidence, mark as "False"
4. Only mark as "Verified" if evidence directly supports the claim with matching data
5. Look for intentional deception, cherry-picked statistics, or misleading context

Return ONLY one of: Verified, Inaccurate, Outdated, False, or Unverifiable
Then provide a brief evidence statement explaining your verdict.

Claim: {claim}

Evidence from search results:
{evidence}

Provide verdict and explanation:"#;

/// Judge a claim against its search results.
///
/// Zero results (including an absorbed search failure upstream) short-circuit
/// to Unverifiable without a model call. A model call failure yields the
/// Error verdict with the failure message as evidence.
pub async fn judge_claim<M: LanguageModel + ?Sized>(
    claim: &str,
    hits: &[SearchHit],
    model: &M,
) -> VerificationResult {
    if hits.is_empty() {
        return VerificationResult {
            original_claim: claim.to_string(),
            verdict: Verdict::Unverifiable,
            evidence: NO_SOURCES_EVIDENCE.to_string(),
            source_url: "N/A".to_string(),
        };
    }

    let mut results_text = String::new();
    for (idx, hit) in hits.iter().take(SNIPPETS_USED).enumerate() {
        results_text.push_str(&format!("\nSource {}: {}\n", idx + 1, hit.content));
    }

    let prompt = RUBRIC_PROMPT
        .replace("{claim}", claim)
        .replace("{evidence}", &results_text);

    let source_url = hits
        .first()
        .map(|h| h.url.clone())
        .unwrap_or_else(|| "N/A".to_string());

    match model.complete_text(&prompt).await {
        Ok(response) => {
            let (verdict, evidence) = parse_verdict_response(&response);
            VerificationResult {
                original_claim: claim.to_string(),
                verdict,
                evidence,
                source_url,
            }
        }
        Err(e) => VerificationResult {
            original_claim: claim.to_string(),
            verdict: Verdict::Error,
            evidence: format!("Verification failed: {}", e),
            source_url: "N/A".to_string(),
        },
    }
}

/// Parse a free-text judge response into a verdict and evidence string.
///
/// First label from PARSE_ORDER whose text appears (case-insensitive) anywhere
/// in the response wins; Unverifiable if none do. Evidence is the response
/// with the matched label removed, or the raw response if removal empties it,
/// truncated to 300 characters.
pub fn parse_verdict_response(response: &str) -> (Verdict, String) {
    let text = response.trim();
    let lower = text.to_lowercase();

    let verdict = Verdict::PARSE_ORDER
        .iter()
        .copied()
        .find(|v| lower.contains(&v.as_str().to_lowercase()))
        .unwrap_or(Verdict::Unverifiable);

    let stripped = text.replace(verdict.as_str(), "");
    let evidence = if stripped.trim().is_empty() {
        text
    } else {
        stripped.trim()
    };

    (verdict, evidence.chars().take(EVIDENCE_MAX_CHARS).collect())
}
