use std::sync::Arc;

use crate::error::ProviderError;
use crate::provider::CompletionProvider;
use crate::types::UserProfile;

/// Builds the companion prompt and forwards it to the completion provider.
///
/// Stateless: every turn is independent, with no conversation memory.
/// Failures come back as errors; how they are presented is the caller's
/// decision.
#[derive(Clone)]
pub struct CompanionService {
    provider: Arc<dyn CompletionProvider>,
}

impl CompanionService {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// One chat turn: template the prompt, send it, return the raw text.
    pub async fn respond(
        &self,
        message: &str,
        profile: Option<UserProfile>,
        mood: Option<&str>,
    ) -> Result<String, ProviderError> {
        let profile = profile.unwrap_or_default();
        let prompt = build_prompt(message, &profile, mood);
        self.provider.generate(&prompt).await
    }
}

/// Fixed prompt template for one chat turn.
pub fn build_prompt(message: &str, profile: &UserProfile, mood: Option<&str>) -> String {
    let name = if profile.nickname.is_empty() {
        "User"
    } else {
        &profile.nickname
    };
    let mood = mood.filter(|m| !m.is_empty()).unwrap_or("not provided");

    format!(
        r#"
Dear {name},
Mood: {mood}
Age: {age}
Occupation: {occupation}
Medical conditions: {medical_conditions}

User message: {message}

Instructions:
1) Reply empathetically, match mood.
2) Offer a CBT-inspired coping thought or affirmation.
3) Suggest a simple activity (mindful breathing, short stretch, grounding).
4) Start with a friendly greeting and end with a gentle disclaimer that you're an AI, not a substitute for a professional.
Format with headings and bullet points.
"#,
        age = profile.age,
        occupation = profile.occupation,
        medical_conditions = profile.medical_conditions,
    )
}
