//! Build-time configuration for the bill service and the identity provider,
//! with an optional runtime override. The runtime config is read from
//! `window.BILLDESK_CONFIG` (if present) so static deployments can change
//! endpoints without rebuilding. The static host renders that object from its
//! own flags. Configuration values are public; do not store secrets here.

use crate::identity::firebase::{FirebaseConfig, IDENTITY_TOOLKIT_URL, SECURE_TOKEN_URL};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "https://b12a10v3.vercel.app";

/// Name of the global the browser bundle reads its overrides from.
pub const RUNTIME_CONFIG_GLOBAL: &str = "BILLDESK_CONFIG";

/// Frontend configuration derived from build-time environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    /// Web API key of the Firebase project. Empty selects the in-memory
    /// identity provider.
    pub firebase_api_key: String,
    pub identity_base_url: String,
    pub token_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            firebase_api_key: String::new(),
            identity_base_url: IDENTITY_TOOLKIT_URL.to_string(),
            token_base_url: SECURE_TOKEN_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads config from build-time environment variables and applies runtime overrides.
    pub fn load() -> Self {
        let defaults = Self::default();
        let mut config = Self {
            api_base_url: option_env!("BILLDESK_API_BASE_URL")
                .map_or(defaults.api_base_url, str::to_string),
            firebase_api_key: option_env!("BILLDESK_FIREBASE_API_KEY")
                .map_or(defaults.firebase_api_key, str::to_string),
            identity_base_url: option_env!("BILLDESK_IDENTITY_BASE_URL")
                .map_or(defaults.identity_base_url, str::to_string),
            token_base_url: option_env!("BILLDESK_TOKEN_BASE_URL")
                .map_or(defaults.token_base_url, str::to_string),
        };

        if let Some(runtime) = runtime_config() {
            apply_runtime_overrides(&mut config, runtime);
        }

        config
    }

    pub fn has_identity_provider(&self) -> bool {
        !self.firebase_api_key.trim().is_empty()
    }

    /// Identity adapter settings; `request_uri` is the page origin.
    pub fn firebase_config(&self, request_uri: &str) -> FirebaseConfig {
        FirebaseConfig {
            identity_base_url: self.identity_base_url.clone(),
            token_base_url: self.token_base_url.clone(),
            request_uri: request_uri.to_string(),
            ..FirebaseConfig::new(self.firebase_api_key.trim())
        }
    }
}

/// Overrides published by the static host. Missing or blank values keep the
/// build-time setting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firebase_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_base_url: Option<String>,
}

impl RuntimeConfig {
    /// Builds overrides from raw values, dropping blank ones.
    pub fn from_values(
        api_base_url: Option<&str>,
        firebase_api_key: Option<&str>,
        identity_base_url: Option<&str>,
        token_base_url: Option<&str>,
    ) -> Self {
        Self {
            api_base_url: api_base_url.and_then(normalize_runtime_value),
            firebase_api_key: firebase_api_key.and_then(normalize_runtime_value),
            identity_base_url: identity_base_url.and_then(normalize_runtime_value),
            token_base_url: token_base_url.and_then(normalize_runtime_value),
        }
    }

    /// JavaScript that installs these overrides as `window.BILLDESK_CONFIG`.
    ///
    /// # Errors
    ///
    /// Returns an error if the overrides cannot be encoded as JSON.
    pub fn to_script(&self) -> serde_json::Result<String> {
        let json = serde_json::to_string(self)?;
        // Keep the payload inert if a value contains a closing script tag.
        let json = json.replace("</", "<\\/");
        Ok(format!("window.{RUNTIME_CONFIG_GLOBAL} = {json};\n"))
    }
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = runtime.firebase_api_key {
        config.firebase_api_key = value;
    }
    if let Some(value) = runtime.identity_base_url {
        config.identity_base_url = value;
    }
    if let Some(value) = runtime.token_base_url {
        config.token_base_url = value;
    }
}

#[cfg(target_arch = "wasm32")]
fn runtime_config() -> Option<RuntimeConfig> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let config = Reflect::get(&window, &JsValue::from_str(RUNTIME_CONFIG_GLOBAL)).ok()?;
    if config.is_null() || config.is_undefined() {
        return None;
    }
    let object = Object::from(config);

    Some(RuntimeConfig {
        api_base_url: read_runtime_value(&object, "api_base_url"),
        firebase_api_key: read_runtime_value(&object, "firebase_api_key"),
        identity_base_url: read_runtime_value(&object, "identity_base_url"),
        token_base_url: read_runtime_value(&object, "token_base_url"),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_config() -> Option<RuntimeConfig> {
    None
}

#[cfg(target_arch = "wasm32")]
fn read_runtime_value(object: &js_sys::Object, key: &str) -> Option<String> {
    let value = js_sys::Reflect::get(object, &wasm_bindgen::JsValue::from_str(key))
        .ok()?
        .as_string()?;
    normalize_runtime_value(&value)
}

fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_runtime_overrides, normalize_runtime_value, AppConfig, RuntimeConfig};

    fn defaults() -> AppConfig {
        AppConfig {
            api_base_url: "https://api.default".to_string(),
            firebase_api_key: "default-key".to_string(),
            identity_base_url: "https://identity.default".to_string(),
            token_base_url: "https://token.default".to_string(),
        }
    }

    #[test]
    fn normalize_runtime_value_trims_and_rejects_empty() {
        assert_eq!(normalize_runtime_value(""), None);
        assert_eq!(normalize_runtime_value("   "), None);
        assert_eq!(
            normalize_runtime_value("  https://bills.example "),
            Some("https://bills.example".to_string())
        );
    }

    #[test]
    fn apply_runtime_overrides_ignores_empty_values() {
        let mut config = defaults();
        let runtime = RuntimeConfig::from_values(Some(""), Some("  "), None, Some(" "));

        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config, defaults());
    }

    #[test]
    fn apply_runtime_overrides_overwrites_when_present() {
        let mut config = defaults();
        let runtime = RuntimeConfig::from_values(
            Some("https://api.override"),
            Some("override-key"),
            Some("https://identity.override"),
            Some("https://token.override"),
        );

        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config.api_base_url, "https://api.override");
        assert_eq!(config.firebase_api_key, "override-key");
        assert_eq!(config.identity_base_url, "https://identity.override");
        assert_eq!(config.token_base_url, "https://token.override");
    }

    #[test]
    fn script_only_carries_present_values() {
        let runtime = RuntimeConfig::from_values(Some("https://api.override"), None, None, None);
        assert_eq!(
            runtime.to_script().unwrap(),
            "window.BILLDESK_CONFIG = {\"api_base_url\":\"https://api.override\"};\n"
        );
        assert_eq!(
            RuntimeConfig::default().to_script().unwrap(),
            "window.BILLDESK_CONFIG = {};\n"
        );
    }

    #[test]
    fn script_escapes_closing_tags() {
        let runtime = RuntimeConfig::from_values(Some("https://x/</script>"), None, None, None);
        assert!(!runtime.to_script().unwrap().contains("</script>"));
    }

    #[test]
    fn identity_provider_requires_api_key() {
        let mut config = defaults();
        assert!(config.has_identity_provider());
        config.firebase_api_key = " ".to_string();
        assert!(!config.has_identity_provider());
    }

    #[test]
    fn firebase_config_carries_endpoints() {
        let firebase = defaults().firebase_config("https://bills.example");
        assert_eq!(firebase.api_key, "default-key");
        assert_eq!(firebase.identity_base_url, "https://identity.default");
        assert_eq!(firebase.request_uri, "https://bills.example");
    }
}
