// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

const DEFAULT_LANG: &str = "pt";

// Idioma das mensagens devolvidas ao cliente ("pt" ou "en").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANG.to_string())
    }
}

impl Locale {
    pub fn from_header(header_str: &str) -> Self {
        let lang = accept_language::parse(header_str)
            .first()
            // "pt-BR" -> "pt", "en" -> "en"
            .and_then(|tag| tag.split('-').next())
            .map(|primary| primary.to_ascii_lowercase())
            .filter(|primary| primary == "en" || primary == "pt")
            .unwrap_or_else(|| DEFAULT_LANG.to_string());

        Locale(lang)
    }

    pub fn is_english(&self) -> bool {
        self.0 == "en"
    }

    /// Escolhe entre o texto em português e em inglês.
    pub fn pick<'a>(&self, pt: &'a str, en: &'a str) -> &'a str {
        if self.is_english() { en } else { pt }
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .map(Locale::from_header)
            .unwrap_or_default();

        Ok(locale)
    }
}
