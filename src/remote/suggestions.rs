use serde::{Deserialize, Serialize};

use crate::foundation::error::{ThumbError, ThumbResult};

/// Title ideas and framing tips for a topic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Suggestions {
    pub viral_titles: Vec<String>,
    pub design_tips: Vec<String>,
}

impl Suggestions {
    /// Offline set shown when the remote source has nothing.
    pub fn fallback() -> Self {
        let titles = [
            "I Tried This For 30 Days",
            "Nobody Talks About This",
            "The Honest Truth",
            "Watch Before You Start",
            "This Changed Everything",
        ];
        let tips = [
            "Fill a third of the frame with a clear, expressive face.",
            "Keep the title under five words and readable at phone size.",
            "Use one strong accent color against a darker background.",
        ];
        Self {
            viral_titles: titles.iter().map(|s| s.to_string()).collect(),
            design_tips: tips.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn from_json_str(s: &str) -> ThumbResult<Self> {
        serde_json::from_str(s).map_err(|e| ThumbError::serde(format!("suggestions: {e}")))
    }

    pub fn is_empty(&self) -> bool {
        self.viral_titles.is_empty() && self.design_tips.is_empty()
    }
}

/// Prompt asking for five titles and three framing tips.
pub fn suggestion_prompt(topic: &str) -> String {
    format!(
        "Topic: \"{}\". Suggest 5 viral creator-style video titles and 3 thumbnail framing tips.",
        topic.trim()
    )
}

pub trait SuggestionSource {
    fn suggestions(&self, topic: &str) -> impl Future<Output = ThumbResult<Suggestions>>;
}

/// Ask `source`, answering the fallback set on any failure or an empty answer.
pub async fn suggestions_or_default<S: SuggestionSource>(source: &S, topic: &str) -> Suggestions {
    match source.suggestions(topic).await {
        Ok(s) if !s.is_empty() => s,
        Ok(_) => {
            tracing::debug!(topic, "empty suggestions; using fallback");
            Suggestions::fallback()
        }
        Err(e) => {
            tracing::warn!(topic, error = %e, "suggestion source failed; using fallback");
            Suggestions::fallback()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/remote/suggestions.rs"]
mod tests;
