// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_LANG: &str = "en";

// Catálogos embutidos no binário (locales/*.json)
const CATALOGS: [(&str, &str); 3] = [
    ("en", include_str!("../../locales/en.json")),
    ("pt", include_str!("../../locales/pt.json")),
    ("fr", include_str!("../../locales/fr.json")),
];

/// Mensagens traduzidas, indexadas por idioma e chave.
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: Arc<HashMap<String, HashMap<String, String>>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut catalogs = HashMap::new();
        for (lang, raw) in CATALOGS {
            let messages: HashMap<String, String> = serde_json::from_str(raw)
                .map_err(|e| anyhow::anyhow!("Catálogo '{}' inválido: {}", lang, e))?;
            catalogs.insert(lang.to_string(), messages);
        }
        Ok(Self {
            catalogs: Arc::new(catalogs),
        })
    }

    /// Busca a mensagem no idioma pedido, cai para o inglês e por fim devolve a própria chave.
    pub fn translate(&self, lang: &str, key: &str, args: &[(&str, &str)]) -> String {
        let template = self
            .catalogs
            .get(lang)
            .and_then(|c| c.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|c| c.get(key)));

        let mut message = match template {
            Some(t) => t.clone(),
            None => return key.to_string(),
        };
        for (name, value) in args {
            message = message.replace(&format!("{{{}}}", name), value);
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_has_the_same_keys() {
        let store = I18nStore::load().unwrap();
        let reference = &store.catalogs["en"];
        for (lang, catalog) in store.catalogs.iter() {
            for key in reference.keys() {
                assert!(catalog.contains_key(key), "'{}' sem a chave '{}'", lang, key);
            }
        }
    }

    #[test]
    fn interpolates_arguments() {
        let store = I18nStore::load().unwrap();
        let msg = store.translate("fr", "errors.not_found", &[("resource", "Décaissement")]);
        assert_eq!(msg, "Décaissement introuvable.");
    }

    #[test]
    fn falls_back_to_english_then_to_key() {
        let store = I18nStore::load().unwrap();
        assert_eq!(
            store.translate("de", "validation.required", &[]),
            "This field is required."
        );
        assert_eq!(store.translate("pt", "unknown.key", &[]), "unknown.key");
    }
}
