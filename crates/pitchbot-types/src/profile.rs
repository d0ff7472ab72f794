//! Company profile types.
//!
//! A `CompanyProfile` is the fabricated descriptive record the language model
//! produces for a company. It is created once per session and never mutated.

use serde::{Deserialize, Serialize};

/// Tagline used when the model could not produce a profile.
pub const PLACEHOLDER_TAGLINE: &str = "Your trusted partner";

/// Services listed when the model could not produce a profile.
pub const PLACEHOLDER_SERVICES: [&str; 3] = ["Support", "Info", "Help"];

/// Tone used when the model could not produce a profile.
pub const PLACEHOLDER_TONE: &str = "friendly";

/// Industry used when the model could not produce a profile.
pub const PLACEHOLDER_INDUSTRY: &str = "Tech";

/// Descriptive record for a company, as fabricated by the language model.
///
/// The JSON wire form uses camelCase keys (`companyName`, `welcomeMessage`, ...)
/// because that is the shape requested from the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub company_name: String,
    pub tagline: String,
    pub description: String,
    pub services: Vec<String>,
    pub tone: String,
    pub industry: String,
    pub welcome_message: String,
}

impl CompanyProfile {
    /// Deterministic stand-in profile derived only from the company name.
    pub fn placeholder(company_name: &str) -> Self {
        Self {
            company_name: company_name.to_string(),
            tagline: PLACEHOLDER_TAGLINE.to_string(),
            description: format!("{company_name} offers great services."),
            services: PLACEHOLDER_SERVICES.iter().map(|s| s.to_string()).collect(),
            tone: PLACEHOLDER_TONE.to_string(),
            industry: PLACEHOLDER_INDUSTRY.to_string(),
            welcome_message: format!("Hi! Welcome to {company_name}!"),
        }
    }

    /// Services joined the way they are presented to the model.
    pub fn services_line(&self) -> String {
        self.services.join(", ")
    }
}

/// Setup-screen input: the company to impersonate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRequest {
    pub company_name: String,
    pub website: String,
}

impl CompanyRequest {
    pub fn new(company_name: impl Into<String>, website: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            website: website.into(),
        }
    }

    /// Both fields must be non-empty before a launch is attempted.
    ///
    /// Whitespace counts as content; the values are used exactly as typed.
    pub fn is_complete(&self) -> bool {
        !self.company_name.is_empty() && !self.website.is_empty()
    }
}
