//! Company profile extraction via LLM.
//!
//! `ProfileExtractor` asks the model to fabricate a `CompanyProfile` for a
//! company name and website, then digs the JSON object out of the reply.
//!
//! Extraction never fails outright: any error (provider, missing braces,
//! malformed JSON, missing field) degrades to `CompanyProfile::placeholder`
//! and the cause is returned as a user-facing notice.

use pitchbot_types::chat::ERROR_MARKER;
use pitchbot_types::error::ExtractionError;
use pitchbot_types::llm::{GenerationSettings, Message};
use pitchbot_types::profile::CompanyProfile;

use crate::llm::box_provider::BoxLlmProvider;

const FENCE_OPEN: &str = "```json";
const FENCE: &str = "```";

/// Prompt asking the model for the profile of `company_name`.
pub fn build_extraction_prompt(company_name: &str, website: &str) -> String {
    format!(
        r#"Extract info for {company_name} ({website}) in JSON only:
{{
  "companyName": "",
  "tagline": "",
  "description": "",
  "services": [],
  "tone": "",
  "industry": "",
  "welcomeMessage": ""
}}
Return ONLY JSON."#
    )
}

/// Remove markdown code fences around a model reply.
///
/// Every ```` ```json ```` opener loses the whitespace after it and every
/// bare fence loses the whitespace before it.
pub fn strip_code_fences(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(idx) = rest.find(FENCE) {
        let before = &rest[..idx];
        let after = &rest[idx..];
        if let Some(tail) = after.strip_prefix(FENCE_OPEN) {
            out.push_str(before);
            rest = tail.trim_start();
        } else {
            out.push_str(before.trim_end());
            rest = &after[FENCE.len()..];
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

/// Greedy slice from the first `{` to the last `}`, inclusive.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse a raw model reply into a profile.
pub fn parse_profile(raw: &str) -> Result<CompanyProfile, ExtractionError> {
    let cleaned = strip_code_fences(raw);
    let json = extract_json_object(&cleaned).ok_or(ExtractionError::JsonNotFound)?;
    serde_json::from_str(json).map_err(|e| ExtractionError::InvalidJson(e.to_string()))
}

/// Profile plus the notice to show when the placeholder was used.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub profile: CompanyProfile,
    pub notice: Option<String>,
}

impl Extraction {
    fn fallback(company_name: &str, cause: &ExtractionError) -> Self {
        Self {
            profile: CompanyProfile::placeholder(company_name),
            notice: Some(format!("{ERROR_MARKER}{cause}")),
        }
    }
}

/// One-shot profile extraction against a provider.
#[derive(Debug, Clone)]
pub struct ProfileExtractor {
    settings: GenerationSettings,
}

impl ProfileExtractor {
    pub fn new(settings: GenerationSettings) -> Self {
        Self { settings }
    }

    /// Ask the model for the profile; fall back to the placeholder on failure.
    #[tracing::instrument(name = "extract_profile", skip(self, provider), fields(model = %self.settings.model))]
    pub async fn extract(
        &self,
        provider: &BoxLlmProvider,
        company_name: &str,
        website: &str,
    ) -> Extraction {
        match self.try_extract(provider, company_name, website).await {
            Ok(profile) => {
                tracing::debug!(tone = %profile.tone, industry = %profile.industry, "profile extracted");
                Extraction {
                    profile,
                    notice: None,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "profile extraction failed; using placeholder");
                Extraction::fallback(company_name, &e)
            }
        }
    }

    async fn try_extract(
        &self,
        provider: &BoxLlmProvider,
        company_name: &str,
        website: &str,
    ) -> Result<CompanyProfile, ExtractionError> {
        let prompt = build_extraction_prompt(company_name, website);
        let request = self.settings.request(vec![Message::user(prompt)]);
        let response = provider.complete(&request).await?;
        let raw = response.content.trim();
        parse_profile(raw).inspect_err(|_| {
            tracing::debug!(
                content_preview = %raw.chars().take(200).collect::<String>(),
                "unparseable profile reply"
            );
        })
    }
}
