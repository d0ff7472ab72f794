//! Per-turn prompt construction and reply tagging.

use pitchbot_types::chat::ChatReply;
use pitchbot_types::profile::CompanyProfile;

use super::conversation::Conversation;
use crate::llm::box_provider::BoxLlmProvider;

/// Prompt sent for one user utterance, restating the persona every turn.
pub fn build_turn_prompt(profile: &CompanyProfile, utterance: &str) -> String {
    format!(
        "You are {name}'s assistant.\nTone: {tone}\nServices: {services}\n\nUser: {utterance}\nRespond in 2-3 sentences, {tone} tone.",
        name = profile.company_name,
        tone = profile.tone,
        services = profile.services_line(),
    )
}

/// Ask the model to answer `utterance` in the profile's voice.
///
/// Provider errors are folded into `ChatReply::Failed`; this never returns `Err`.
#[tracing::instrument(
    name = "respond",
    skip_all,
    fields(company = %profile.company_name, turn = conversation.turn_count())
)]
pub async fn respond(
    provider: &BoxLlmProvider,
    conversation: &mut Conversation,
    profile: &CompanyProfile,
    utterance: &str,
) -> ChatReply {
    let prompt = build_turn_prompt(profile, utterance);
    match conversation.send(provider, prompt).await {
        Ok(text) => ChatReply::answer(text),
        Err(e) => {
            tracing::warn!(error = %e, "chat turn failed");
            ChatReply::failed(e.to_string())
        }
    }
}
