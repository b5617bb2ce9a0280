//! News summaries: AI-written when a model is available, a deterministic
//! headline digest otherwise. The result always says which path produced it.

use crate::ai::{GenerateRequest, TextModel};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const DEFAULT_CATEGORY: &str = "Default";

const FALLBACK_HEADLINES: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub source: Option<String>,
    /// Company the article is about
    #[serde(default)]
    pub company: Option<String>,
    /// That company's category, used to pick a prompt
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub published_date: Option<DateTime<Utc>>,
}

/// Prompt pair tailored to one company category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPrompt {
    pub category: String,
    pub system_prompt: String,
    pub user_prompt: String,
}

impl CategoryPrompt {
    /// Used when no configured prompt matches the category or `Default`
    pub fn builtin() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            system_prompt: "You are a financial news analyst. Write concise, factual \
                            briefings for busy readers."
                .to_string(),
            user_prompt: "Summarize the key developments in the following articles. \
                          Group related stories, highlight anything material for each \
                          company and keep the summary under 300 words."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    pub text: String,
    /// False whenever the fallback digest was used
    #[serde(rename = "usedAI")]
    pub used_ai: bool,
    pub article_count: usize,
    pub category: String,
}

/// Summarize `articles`, preferring the model when one is given.
///
/// Model errors never surface; they switch to the fallback digest.
pub async fn generate_summary(
    model: Option<&dyn TextModel>,
    articles: &[Article],
    prompts: &[CategoryPrompt],
) -> Result<SummaryResult> {
    if articles.is_empty() {
        return Err(Error::NoArticles);
    }

    let category = dominant_category(articles);
    let prompt = select_prompt(prompts, &category);

    let ai_text = match model {
        Some(model) => {
            info!(
                model = model.model_name(),
                %category,
                articles = articles.len(),
                "Generating AI summary"
            );
            let request = GenerateRequest::new(format!(
                "{}\n\nARTICLES:\n{}",
                prompt.user_prompt,
                format_articles(articles)
            ))
            .with_system(prompt.system_prompt.clone())
            .with_temperature(0.7)
            .with_max_tokens(1000);

            match model.generate(&request).await {
                Ok(text) if !text.trim().is_empty() => Some(text),
                Ok(_) => {
                    warn!("AI summary was empty, falling back");
                    None
                }
                Err(e) => {
                    warn!(error = %e, "AI summary failed, falling back");
                    None
                }
            }
        }
        None => {
            info!("No AI model configured, using fallback summary");
            None
        }
    };

    let used_ai = ai_text.is_some();
    let text = ai_text.unwrap_or_else(|| fallback_summary(articles));

    Ok(SummaryResult {
        text,
        used_ai,
        article_count: articles.len(),
        category,
    })
}

/// Most common category, first seen wins ties
fn dominant_category(articles: &[Article]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for category in articles.iter().filter_map(|a| a.category.as_deref()) {
        match counts.iter_mut().find(|(name, _)| *name == category) {
            Some((_, count)) => *count += 1,
            None => counts.push((category, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (name, count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((name, count));
        }
    }

    best.map_or_else(|| DEFAULT_CATEGORY.to_string(), |(name, _)| name.to_string())
}

fn select_prompt(prompts: &[CategoryPrompt], category: &str) -> CategoryPrompt {
    prompts
        .iter()
        .find(|p| p.category == category)
        .or_else(|| prompts.iter().find(|p| p.category == DEFAULT_CATEGORY))
        .cloned()
        .unwrap_or_else(CategoryPrompt::builtin)
}

fn format_articles(articles: &[Article]) -> String {
    articles
        .iter()
        .map(|a| {
            format!(
                "Title: {}\nSource: {}\nCompany: {}\nCategory: {}\nSummary: {}",
                a.title,
                a.source.as_deref().unwrap_or("Unknown"),
                a.company.as_deref().unwrap_or("Unknown"),
                a.category.as_deref().unwrap_or("Unknown"),
                a.summary.as_deref().unwrap_or("No summary available"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Headline digest, newest first; undated articles go last
pub fn fallback_summary(articles: &[Article]) -> String {
    let mut sorted: Vec<&Article> = articles.iter().collect();
    sorted.sort_by(|a, b| match (a.published_date, b.published_date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let mut companies: Vec<&str> = Vec::new();
    for company in sorted.iter().filter_map(|a| a.company.as_deref()) {
        if !companies.contains(&company) {
            companies.push(company);
        }
    }

    let mut text = format!(
        "This is an automated summary of recent news about {}.\n\nTop headlines:\n",
        companies.join(", ")
    );
    for (index, article) in sorted.iter().take(FALLBACK_HEADLINES).enumerate() {
        text.push_str(&format!(
            "{}. {} ({})\n",
            index + 1,
            article.title,
            article.source.as_deref().unwrap_or("Unknown source")
        ));
    }
    text.push_str(&format!(
        "\nThis summary covers {} articles from {} companies.",
        articles.len(),
        companies.len()
    ));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::scripted::ScriptedModel;
    use chrono::TimeZone;

    fn article(id: &str, company: &str, category: &str, day: Option<u32>) -> Article {
        Article {
            id: id.to_string(),
            title: format!("Headline {id}"),
            url: format!("https://news.example.com/{id}"),
            source: Some("Reuters".to_string()),
            company: Some(company.to_string()),
            category: Some(category.to_string()),
            summary: None,
            published_date: day.map(|d| Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap()),
        }
    }

    fn articles() -> Vec<Article> {
        let mut untitled_source = article("7", "Acme", "Tech", Some(2));
        untitled_source.source = None;
        vec![
            article("1", "Acme", "Tech", Some(1)),
            article("2", "Globex", "Energy", Some(5)),
            article("3", "Acme", "Tech", None),
            article("4", "Initech", "Energy", Some(3)),
            article("5", "Globex", "Energy", Some(4)),
            article("6", "Acme", "Tech", Some(6)),
            untitled_source,
        ]
    }

    #[tokio::test]
    async fn empty_input_is_an_error() {
        let result = generate_summary(None, &[], &[]).await;
        assert!(matches!(result, Err(Error::NoArticles)));
    }

    #[tokio::test]
    async fn without_model_uses_fallback() {
        let result = generate_summary(None, &articles(), &[]).await.unwrap();

        assert!(!result.used_ai);
        assert_eq!(result.article_count, 7);
        assert_eq!(result.category, "Tech");

        let expected = "This is an automated summary of recent news about Acme, Globex, Initech.\n\n\
                        Top headlines:\n\
                        1. Headline 6 (Reuters)\n\
                        2. Headline 2 (Reuters)\n\
                        3. Headline 5 (Reuters)\n\
                        4. Headline 4 (Reuters)\n\
                        5. Headline 7 (Unknown source)\n\
                        \nThis summary covers 7 articles from 3 companies.";
        assert_eq!(result.text, expected);
    }

    #[tokio::test]
    async fn model_text_is_used_with_category_prompt() {
        let model = ScriptedModel::replying("Energy stocks rallied.");
        let prompts = vec![
            CategoryPrompt {
                category: "Default".to_string(),
                system_prompt: "default system".to_string(),
                user_prompt: "default user".to_string(),
            },
            CategoryPrompt {
                category: "Energy".to_string(),
                system_prompt: "energy system".to_string(),
                user_prompt: "energy user".to_string(),
            },
        ];
        let energy = vec![
            article("1", "Globex", "Energy", Some(1)),
            article("2", "Acme", "Tech", Some(2)),
            article("3", "Initech", "Energy", Some(3)),
        ];

        let result = generate_summary(Some(&model), &energy, &prompts).await.unwrap();
        assert!(result.used_ai);
        assert_eq!(result.text, "Energy stocks rallied.");
        assert_eq!(result.category, "Energy");

        let request = model.last_request().unwrap();
        assert_eq!(request.system.as_deref(), Some("energy system"));
        assert!(request.prompt.starts_with("energy user\n\nARTICLES:\nTitle: Headline 1"));
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 1000);
    }

    #[tokio::test]
    async fn model_failure_falls_back() {
        let model = ScriptedModel::failing();
        let result = generate_summary(Some(&model), &articles(), &[]).await.unwrap();

        assert!(!result.used_ai);
        assert!(result.text.starts_with("This is an automated summary"));
    }

    #[test]
    fn category_ties_keep_first_seen() {
        let tied = vec![
            article("1", "Globex", "Energy", None),
            article("2", "Acme", "Tech", None),
        ];
        assert_eq!(dominant_category(&tied), "Energy");

        let mut none = article("3", "Acme", "Tech", None);
        none.category = None;
        assert_eq!(dominant_category(&[none]), DEFAULT_CATEGORY);
    }

    #[test]
    fn prompt_selection_falls_back_to_builtin() {
        assert_eq!(select_prompt(&[], "Tech"), CategoryPrompt::builtin());
    }

    #[test]
    fn result_serializes_used_ai_flag() {
        let result = SummaryResult {
            text: "x".to_string(),
            used_ai: false,
            article_count: 1,
            category: "Default".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["usedAI"], false);
        assert_eq!(json["articleCount"], 1);
    }
}
