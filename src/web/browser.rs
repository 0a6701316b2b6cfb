//! Browser bindings: refresh-token persistence in `localStorage`, the
//! federated consent hook, file downloads and a few window helpers. Only the refresh token is
//! persisted; ID tokens stay in memory.

use crate::identity::firebase::{
    FederatedConsent, FederatedCredential, TokenStore, GOOGLE_PROVIDER_ID,
};
use crate::errors::AppError;
use crate::session::AuthError;
use async_trait::async_trait;
use chrono::NaiveDate;
use js_sys::{Array, Function, Promise, Reflect, Uint8Array};
use secrecy::{ExposeSecret, SecretString};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Storage, Url};

const REFRESH_TOKEN_KEY: &str = "billdesk.refresh_token";

/// Global function the page installs to run a provider-hosted consent flow.
/// It must return a promise resolving to `{ providerId, idToken }` and reject
/// when the user dismisses the window.
const CONSENT_HOOK: &str = "billdeskFederatedConsent";

pub struct LocalStorageTokenStore;

fn storage() -> Result<Storage, AuthError> {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .ok_or_else(|| AuthError::unknown().with_detail("local storage unavailable"))
}

impl TokenStore for LocalStorageTokenStore {
    fn load(&self) -> Option<SecretString> {
        storage()
            .ok()?
            .get_item(REFRESH_TOKEN_KEY)
            .ok()
            .flatten()
            .map(SecretString::from)
    }

    fn save(&self, refresh_token: &SecretString) -> Result<(), AuthError> {
        storage()?
            .set_item(REFRESH_TOKEN_KEY, refresh_token.expose_secret())
            .map_err(|_| AuthError::unknown().with_detail("failed to persist session"))
    }

    fn clear(&self) -> Result<(), AuthError> {
        storage()?
            .remove_item(REFRESH_TOKEN_KEY)
            .map_err(|_| AuthError::unknown().with_detail("failed to clear session"))
    }
}

pub struct BrowserConsent;

#[async_trait(?Send)]
impl FederatedConsent for BrowserConsent {
    async fn request(&self) -> Result<FederatedCredential, AuthError> {
        let window = web_sys::window().ok_or_else(AuthError::unknown)?;
        let hook = Reflect::get(&window, &JsValue::from_str(CONSENT_HOOK))
            .map_err(|_| AuthError::popup_closed())?;
        let Some(hook) = hook.dyn_ref::<Function>() else {
            return Err(AuthError::popup_closed().with_detail("federated sign-in is not configured"));
        };

        let pending = hook.call0(&window).map_err(|_| AuthError::popup_closed())?;
        let credential = JsFuture::from(Promise::resolve(&pending))
            .await
            .map_err(|_| AuthError::popup_closed())?;

        let id_token = read_string(&credential, "idToken").ok_or_else(AuthError::popup_closed)?;
        let provider_id = read_string(&credential, "providerId")
            .unwrap_or_else(|| GOOGLE_PROVIDER_ID.to_string());

        Ok(FederatedCredential {
            provider_id,
            id_token: SecretString::from(id_token),
        })
    }
}

fn read_string(object: &JsValue, key: &str) -> Option<String> {
    Reflect::get(object, &JsValue::from_str(key))
        .ok()?
        .as_string()
        .filter(|value| !value.trim().is_empty())
}

/// Page origin, reported to the identity service as the federated redirect URI.
pub fn origin() -> String {
    web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .unwrap_or_else(|| "http://localhost".to_string())
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Blocking `window.confirm`; false when no window is available.
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Saves `bytes` as `file_name` through a temporary object URL.
pub fn download(bytes: &[u8], file_name: &str, mime: &str) -> Result<(), AppError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| AppError::Report("no document to download into".to_string()))?;

    let parts = Array::of1(&Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|err| download_error("create blob", &err))?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|err| download_error("create object URL", &err))?;

    let anchor = document
        .create_element("a")
        .map_err(|err| download_error("create link", &err))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| AppError::Report("unexpected link element".to_string()))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    let _ = Url::revoke_object_url(&url);
    Ok(())
}

fn download_error(step: &str, err: &JsValue) -> AppError {
    AppError::Report(format!("failed to {step}: {err:?}"))
}
