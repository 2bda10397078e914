// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};

use crate::common::i18n::DEFAULT_LANG;

const SUPPORTED_LANGS: [&str; 3] = ["en", "pt", "fr"];

// Idioma das mensagens de erro, vindo do Accept-Language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Locale {
    /// Primeiro idioma suportado na ordem de preferência do cliente.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let lang = headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| {
                accept_language::parse(raw).into_iter().find_map(|tag| {
                    // "pt-BR" -> "pt"
                    let base = tag.split('-').next().unwrap_or(&tag).to_lowercase();
                    SUPPORTED_LANGS.contains(&base.as_str()).then_some(base)
                })
            })
            .unwrap_or_else(|| DEFAULT_LANG.to_string());

        Locale(lang)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANG.to_string())
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Locale::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn regional_tag_maps_to_base_language() {
        assert_eq!(Locale::from_headers(&headers("pt-BR,pt;q=0.9")).0, "pt");
    }

    #[test]
    fn unsupported_languages_are_skipped() {
        assert_eq!(Locale::from_headers(&headers("de-DE, fr;q=0.8")).0, "fr");
    }

    #[test]
    fn missing_header_falls_back_to_english() {
        assert_eq!(Locale::from_headers(&HeaderMap::new()).0, "en");
        assert_eq!(Locale::from_headers(&headers("de")).0, "en");
    }
}
