//! claimcheck — fact-checking pipeline
//!
//! Extracts factual claims from an uploaded PDF and verifies each one against
//! live web search results using a language model. The model and search
//! provider sit behind narrow traits (`llm::LanguageModel`,
//! `search::SearchProvider`) so tests run against deterministic fakes.

pub mod claims;
pub mod document;
pub mod llm;
pub mod pipeline;
pub mod query;
pub mod report;
pub mod search;
pub mod settings;
pub mod verdict;
