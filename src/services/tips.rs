//! Daily financial tip
//!
//! The tip comes from an injected [`TipProvider`]. The production provider
//! calls the Gemini `generateContent` endpoint; any failure there turns into
//! a fixed fallback sentence, so callers always get a string.

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::settings::{Settings, TipSettings};
use crate::error::{FinTrackError, FinTrackResult};

/// Shown when the provider fails
pub const FALLBACK_TIP: &str =
    "The best time to start investing was yesterday; the second best time is today.";

/// Shown when the provider answers with nothing
pub const EMPTY_TIP: &str =
    "Save at least 20% of your income every month to build a strong safety net.";

const PROMPT: &str = "Give me one concise, professional financial tip or smart investing advice for today. Keep it under 150 characters.";

const SYSTEM_INSTRUCTION: &str = "You are a world-class financial advisor. Your tips are practical, encouraging, and highly specific to personal finance management.";

const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Source of tip text
pub trait TipProvider {
    /// Produce a tip, optionally informed by a summary of the user's ledger
    fn fetch_tip(&self, summary: Option<&str>) -> FinTrackResult<String>;
}

impl<T: TipProvider + ?Sized> TipProvider for Box<T> {
    fn fetch_tip(&self, summary: Option<&str>) -> FinTrackResult<String> {
        (**self).fetch_tip(summary)
    }
}

/// Provider that always answers with the same text
pub struct StaticTipProvider(pub String);

impl TipProvider for StaticTipProvider {
    fn fetch_tip(&self, _summary: Option<&str>) -> FinTrackResult<String> {
        Ok(self.0.clone())
    }
}

/// Gemini REST provider
pub struct GeminiTipProvider {
    http: reqwest::blocking::Client,
    model: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> String {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
            .trim()
            .to_string()
    }
}

impl GeminiTipProvider {
    /// Build a provider from settings, reading the key from the configured env var
    pub fn from_settings(settings: &TipSettings) -> FinTrackResult<Self> {
        if !settings.enabled {
            return Err(FinTrackError::ExternalService(
                "tip service disabled in settings".into(),
            ));
        }

        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                FinTrackError::ExternalService(format!("{} is not set", settings.api_key_env))
            })?;

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| FinTrackError::ExternalService(e.to_string()))?;

        Ok(Self {
            http,
            model: settings.model.clone(),
            api_key,
        })
    }
}

impl TipProvider for GeminiTipProvider {
    fn fetch_tip(&self, summary: Option<&str>) -> FinTrackResult<String> {
        let url = format!("{}/{}:generateContent", ENDPOINT, self.model);

        let prompt = match summary {
            Some(summary) => format!("{}\n\nMy recent finances: {}", PROMPT, summary),
            None => PROMPT.to_string(),
        };

        let body = json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": 0.7 },
        });

        let res = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| FinTrackError::ExternalService(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(FinTrackError::ExternalService(format!(
                "tip service answered {}",
                status
            )));
        }

        let parsed: GenerateResponse = res
            .json()
            .map_err(|e| FinTrackError::ExternalService(e.to_string()))?;

        Ok(parsed.text())
    }
}

/// What [`TipService::daily_tip`] produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTip {
    pub text: String,
    /// True when the provider answered and `settings` changed
    pub fresh: bool,
}

/// Hands out at most one provider call per day
pub struct TipService<P: TipProvider> {
    provider: P,
}

impl<P: TipProvider> TipService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Today's tip
    ///
    /// Calls the provider only if no analysis ran today (or `force` is set)
    /// and never fails. The day and text are recorded in `settings` only when
    /// the provider answered, so a failed call is retried on the next request.
    /// The caller persists `settings` when the tip is `fresh`.
    pub fn daily_tip(
        &self,
        settings: &mut Settings,
        today: NaiveDate,
        force: bool,
        summary: Option<&str>,
    ) -> DailyTip {
        if !force && settings.last_daily_analysis == Some(today) {
            if let Some(text) = &settings.last_tip {
                return DailyTip {
                    text: text.clone(),
                    fresh: false,
                };
            }
        }

        let text = match self.provider.fetch_tip(summary) {
            Ok(text) if text.trim().is_empty() => EMPTY_TIP.to_string(),
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "tip provider failed, using fallback");
                return DailyTip {
                    text: FALLBACK_TIP.to_string(),
                    fresh: false,
                };
            }
        };

        settings.last_daily_analysis = Some(today);
        settings.last_tip = Some(text.clone());

        DailyTip { text, fresh: true }
    }
}

/// Provider used when the remote one can't be built
pub struct UnavailableTipProvider(pub String);

impl TipProvider for UnavailableTipProvider {
    fn fetch_tip(&self, _summary: Option<&str>) -> FinTrackResult<String> {
        Err(FinTrackError::ExternalService(self.0.clone()))
    }
}
