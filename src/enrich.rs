//! Thin AI enrichment over hosted completion endpoints: news theme analysis
//! and recap/Q&A/analysis fields for curated tech events. Everything here is
//! prompt templating around a pluggable backend; no content intelligence
//! lives in this crate.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::types::{Article, NewsdeckError, Result};

/// Hosted completion endpoint seam. Implementations take a system prompt and
/// a user prompt and return free text (or a JSON object for the JSON
/// variant, where the backend supports enforcing that).
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    fn backend_name(&self) -> String;

    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;

    /// Like `complete`, but the response must be a single JSON object.
    async fn complete_json(&self, system: &str, prompt: &str) -> Result<String> {
        self.complete(system, prompt).await
    }
}

/// OpenAI-compatible chat-completions backend.
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: "gpt-4-turbo-preview".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn chat(&self, system: &str, prompt: &str, json_object: bool) -> Result<String> {
        let mut body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt },
            ],
        });
        if json_object {
            body["response_format"] = json!({ "type": "json_object" });
        }

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| NewsdeckError::Completion(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NewsdeckError::Completion(format!(
                "completion endpoint returned HTTP {status}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| NewsdeckError::Completion(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| NewsdeckError::Completion("empty completion response".to_string()))
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    fn backend_name(&self) -> String {
        format!("openai ({})", self.model)
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        self.chat(system, prompt, false).await
    }

    async fn complete_json(&self, system: &str, prompt: &str) -> Result<String> {
        self.chat(system, prompt, true).await
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Deterministic backend for development and tests.
pub struct MockBackend;

#[async_trait]
impl CompletionBackend for MockBackend {
    fn backend_name(&self) -> String {
        "mock".to_string()
    }

    async fn complete(&self, _system: &str, prompt: &str) -> Result<String> {
        Ok(format!(
            "Mock completion for a prompt of {} characters.",
            prompt.chars().count()
        ))
    }

    async fn complete_json(&self, _system: &str, _prompt: &str) -> Result<String> {
        Ok(json!({
            "themes": [
                {
                    "name": "Mock Theme",
                    "description": "Deterministic theme for tests",
                    "articles": []
                }
            ]
        })
        .to_string())
    }
}

/// A manually curated tech event, as stored by the external events datastore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechEvent {
    pub name: String,
    pub link: String,
    pub kind: String,
    pub date: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeArticle {
    pub title: String,
    pub link: String,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub articles: Vec<ThemeArticle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeAnalysis {
    pub themes: Vec<Theme>,
}

/// Prompt-templated enrichment operations over a completion backend.
pub struct Enricher {
    backend: Arc<dyn CompletionBackend>,
}

impl Enricher {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Newsletter-style prose summary of the day's aggregated articles,
    /// weighted toward overlap with the reader's own articles.
    pub async fn summarize_news(
        &self,
        articles: &[Article],
        personal_articles: &[Article],
        additional_notes: &str,
    ) -> Result<String> {
        let recent = bullet_list(articles, true);
        let personal = bullet_list(personal_articles, false);

        let prompt = format!(
            "Summarize today's news for a busy reader in 2-3 short paragraphs.\n\
             Give the most weight to stories that relate to the reader's own articles.\n\n\
             Recent Articles:\n{recent}\n\n\
             Personal Articles:\n{personal}\n\n\
             Additional Context:\n{additional_notes}"
        );

        debug!(backend = %self.backend.backend_name(), "requesting news summary");
        self.backend
            .complete(
                "You are a helpful AI that writes concise, readable news summaries.",
                &prompt,
            )
            .await
    }

    /// Identify 3-5 cross-cutting themes between the aggregated news set and
    /// the reader's own articles.
    pub async fn analyze_themes(
        &self,
        articles: &[Article],
        personal_articles: &[Article],
        additional_notes: &str,
    ) -> Result<ThemeAnalysis> {
        let recent = bullet_list(articles, true);
        let personal = bullet_list(personal_articles, false);

        let prompt = format!(
            "Based on the following articles, identify 3-5 key themes that might interest the reader.\n\
             For each theme, provide a brief description and list relevant articles.\n\
             Focus on finding connections between the personal articles and the recent news articles.\n\n\
             Recent Articles:\n{recent}\n\n\
             Personal Articles:\n{personal}\n\n\
             Additional Context:\n{additional_notes}\n\n\
             Format your response as a JSON object with a \"themes\" array; each theme has \
             \"name\", \"description\", and \"articles\" (title, link, source)."
        );

        let system = "You are a helpful AI that analyzes articles and identifies relevant themes. \
                      Your responses should be in valid JSON format.";

        debug!(backend = %self.backend.backend_name(), "requesting theme analysis");
        let raw = self.backend.complete_json(system, &prompt).await?;
        let analysis: ThemeAnalysis = serde_json::from_str(&raw)?;
        Ok(analysis)
    }

    /// Concise 3-bullet recap (50-100 words) of an event.
    pub async fn generate_recap(&self, event: &TechEvent) -> Result<String> {
        let prompt = format!(
            "Given the following tech event/article details, generate a concise 3-bullet point \
             recap (50-100 words total):\n\n\
             Event: {}\nType: {}\nDate: {}\nLink: {}\n\nContent:\n{}\n\n\
             Generate 3 bullet points that capture the most important aspects of this event. \
             Focus on key insights, implications, and notable details.",
            event.name, event.kind, event.date, event.link, event.content
        );
        self.backend
            .complete("You are a concise analyst of technology events.", &prompt)
            .await
    }

    /// Answer a free-form question about an event in 50-100 words.
    pub async fn answer_question(&self, event: &TechEvent, question: &str) -> Result<String> {
        let prompt = format!(
            "Given this tech event/article:\n\n\
             Event: {}\nType: {}\n\nContent:\n{}\n\n\
             Please answer this question in 50-100 words:\n{question}\n\n\
             Focus on providing a clear, insightful answer based on the content provided. \
             The answer should be specific and directly address the question.",
            event.name, event.kind, event.content
        );
        self.backend
            .complete("You are a concise analyst of technology events.", &prompt)
            .await
    }

    /// Short "So What?" analysis (20-40 words) of why an event matters to the
    /// reader's organization, described by `organization_context`.
    pub async fn generate_so_what(
        &self,
        event: &TechEvent,
        organization_context: &str,
    ) -> Result<String> {
        let prompt = format!(
            "As a strategic advisor, analyze this tech event's relevance to the organization:\n\n\
             EVENT DETAILS:\n- Name: {}\n- Description: {}\n\n\
             ORGANIZATION CONTEXT:\n{organization_context}\n\n\
             Provide a concise 20-40 word \"So What?\" analysis explaining why this event might \
             be important. Be specific and actionable.",
            event.name, event.content
        );
        self.backend
            .complete(
                "You are a strategic technology advisor providing concise, insightful analysis \
                 of tech events and their implications.",
                &prompt,
            )
            .await
    }

    /// Draft a markdown article about an event.
    pub async fn draft_article(&self, event: &TechEvent) -> Result<String> {
        let prompt = format!(
            "Write an informative article about this tech event:\n\
             Event: {}\nDescription: {}\nEvent Link: {}\n\n\
             Write a well-structured article with an engaging headline, an introduction that \
             hooks the reader, the main points, analysis and insights, and a strong conclusion. \
             Use a professional tone and format the article in markdown.",
            event.name, event.content, event.link
        );
        self.backend
            .complete("You are a professional technology writer.", &prompt)
            .await
    }
}

fn bullet_list(articles: &[Article], with_source: bool) -> String {
    if articles.is_empty() {
        return "(none)".to_string();
    }
    articles
        .iter()
        .map(|a| {
            if with_source {
                format!("- {} ({})", a.title, a.source_name)
            } else {
                format!("- {}", a.title)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> TechEvent {
        TechEvent {
            name: "RustConf".to_string(),
            link: "https://rustconf.com".to_string(),
            kind: "Conference".to_string(),
            date: "2024-09-10".to_string(),
            content: "Annual Rust conference.".to_string(),
        }
    }

    #[tokio::test]
    async fn theme_analysis_parses_backend_json() {
        let enricher = Enricher::new(Arc::new(MockBackend));
        let analysis = enricher.analyze_themes(&[], &[], "no notes").await.unwrap();
        assert_eq!(analysis.themes.len(), 1);
        assert_eq!(analysis.themes[0].name, "Mock Theme");
    }

    #[tokio::test]
    async fn recap_and_answer_return_text() {
        let enricher = Enricher::new(Arc::new(MockBackend));
        let recap = enricher.generate_recap(&event()).await.unwrap();
        assert!(!recap.is_empty());

        let answer = enricher
            .answer_question(&event(), "Who should attend?")
            .await
            .unwrap();
        assert!(!answer.is_empty());
    }
}
