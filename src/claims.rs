//! Claim extraction
//!
//! Pulls atomic, verifiable claims out of document text via the language
//! model. Best-effort policy with an explicit ordered fallback chain:
//! structured JSON -> CLAIM:-prefixed line scan -> degenerate truncated text.
//! Never returns zero claims for non-empty input.

use serde::{Deserialize, Serialize};

use crate::llm::LanguageModel;

/// Maximum bytes of document text sent to the model per request
const TEXT_PREVIEW_BYTES: usize = 24_000;

/// Category of an extracted claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimType {
    Statistic,
    Date,
    Financial,
    Technical,
    Factual,
    General,
}

impl ClaimType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Statistic => "statistic",
            ClaimType::Date => "date",
            ClaimType::Financial => "financial",
            ClaimType::Technical => "technical",
            ClaimType::Factual => "factual",
            ClaimType::General => "general",
        }
    }

    /// Parse a model-supplied type string. Unknown values map to General.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "statistic" => ClaimType::Statistic,
            "date" => ClaimType::Date,
            "financial" => ClaimType::Financial,
            "technical" => ClaimType::Technical,
            "factual" => ClaimType::Factual,
            _ => ClaimType::General,
        }
    }
}

/// An atomic, independently verifiable claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedClaim {
    pub claim_text: String,
    pub claim_type: ClaimType,
}

/// Which stage of the fallback chain produced the claims
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimSource {
    /// Schema-constrained JSON response parsed cleanly
    Structured,
    /// Loose CLAIM:-prefixed line scan of a free-text response
    LineScan,
    /// First 200 characters of the document, typed "general"
    Degenerate,
}

/// Outcome of claim extraction, tagged with the stage that produced it
#[derive(Debug, Clone)]
pub struct ClaimExtraction {
    pub claims: Vec<ExtractedClaim>,
    pub source: ClaimSource,
}

/// Expected shape of the structured model response
#[derive(Debug, Deserialize)]
struct ClaimsList {
    claims: Vec<RawClaim>,
}

#[derive(Debug, Deserialize)]
struct RawClaim {
    claim_text: String,
    #[serde(default)]
    claim_type: Option<String>,
}

const EXTRACTION_PROMPT: &str = r#"You are a critical fact-checking analyst with expertise in identifying verifiable claims.
Your task is to extract ONLY atomic, verifiable claims from the provided text.

FOCUS ON:
- Statistical claims with specific numbers
- Dates and temporal assertions
- Financial figures and monetary values
- Technical specifications and measurements
- Concrete factual statements about events or entities

IGNORE:
- Subjective opinions and value judgments
- Predictions or speculations
- General statements without specific data
- Contextual information without verifiable facts

Be skeptical and precise. Extract each claim as a standalone statement that can be independently verified against external sources.
Look for claims that could be intentionally misleading, outdated, or factually incorrect.

Extract all verifiable claims from this text:

{text}

Respond with JSON only, no prose:
{"claims": [{"claim_text": "...", "claim_type": "statistic|date|financial|technical|factual"}]}"#;

const FALLBACK_PROMPT: &str = "Extract verifiable claims with numbers, dates, or specific facts. \
Return each claim on a new line starting with 'CLAIM:'.\n\n{text}";

/// Extract claims from document text via the model.
///
/// Tries the structured path first, then the line-scan fallback, then the
/// degenerate single claim. Model call failures are absorbed into the chain.
pub async fn extract_claims<M: LanguageModel + ?Sized>(
    text: &str,
    model: &M,
) -> ClaimExtraction {
    let preview = truncate_on_char_boundary(text, TEXT_PREVIEW_BYTES);

    // Primary path: schema-constrained JSON
    match model.complete_structured(&EXTRACTION_PROMPT.replace("{text}", preview)).await {
        Ok(json) => {
            if let Some(claims) = parse_structured(&json) {
                if !claims.is_empty() {
                    println!("[Claims] Extracted {} claims (structured)", claims.len());
                    return ClaimExtraction { claims, source: ClaimSource::Structured };
                }
            }
            println!("[Claims] Structured response had no usable claims, falling back");
        }
        Err(e) => {
            println!("[Claims] Structured extraction failed, falling back: {}", e);
        }
    }

    // Fallback: CLAIM:-prefixed line scan
    match model.complete_text(&FALLBACK_PROMPT.replace("{text}", preview)).await {
        Ok(response) => {
            let claims = scan_claim_lines(&response);
            if !claims.is_empty() {
                println!("[Claims] Extracted {} claims (line scan)", claims.len());
                return ClaimExtraction { claims, source: ClaimSource::LineScan };
            }
        }
        Err(e) => {
            println!("[Claims] Fallback extraction failed: {}", e);
        }
    }

    // Degenerate: never return zero claims for non-empty text
    println!("[Claims] Using degenerate fallback claim");
    ClaimExtraction {
        claims: vec![ExtractedClaim {
            claim_text: truncate_on_char_boundary(text, 200).to_string(),
            claim_type: ClaimType::General,
        }],
        source: ClaimSource::Degenerate,
    }
}

/// Parse the structured response into claims; None if the shape is wrong
fn parse_structured(json: &serde_json::Value) -> Option<Vec<ExtractedClaim>> {
    let list: ClaimsList = serde_json::from_value(json.clone()).ok()?;
    Some(
        list.claims
            .into_iter()
            .filter(|c| !c.claim_text.trim().is_empty())
            .map(|c| ExtractedClaim {
                claim_text: c.claim_text.trim().to_string(),
                claim_type: ClaimType::from_str(c.claim_type.as_deref().unwrap_or("")),
            })
            .collect(),
    )
}

/// Scan free text for lines starting with CLAIM:
fn scan_claim_lines(response: &str) -> Vec<ExtractedClaim> {
    response
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            let rest = trimmed.strip_prefix("CLAIM:")?.trim();
            if rest.is_empty() {
                return None;
            }
            Some(ExtractedClaim {
                claim_text: rest.to_string(),
                claim_type: ClaimType::Factual,
            })
        })
        .collect()
}

/// Truncate to at most max_bytes, backing off to a char boundary
fn truncate_on_char_boundary(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
