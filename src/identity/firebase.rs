//! Firebase Identity Toolkit adapter over its REST API. The adapter owns the
//! refresh-token persistence and publishes every auth-state transition
//! through its notifier. ID tokens, refresh tokens and passwords must never
//! be logged.

use super::{AuthNotifier, AuthSubscription, IdentityProvider};
use crate::http;
use crate::session::{AuthError, AuthErrorReason, UserIdentity};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, instrument, warn};
use url::{form_urlencoded, Url};

pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1";
pub const GOOGLE_PROVIDER_ID: &str = "google.com";

#[derive(Clone, Debug)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub identity_base_url: String,
    pub token_base_url: String,
    /// Origin reported to `signInWithIdp`; must be an authorized domain.
    pub request_uri: String,
}

impl FirebaseConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            identity_base_url: IDENTITY_TOOLKIT_URL.to_string(),
            token_base_url: SECURE_TOKEN_URL.to_string(),
            request_uri: "http://localhost".to_string(),
        }
    }
}

/// Where the adapter keeps the refresh token between page loads.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<SecretString>;

    /// # Errors
    ///
    /// Returns an error if the token cannot be written.
    fn save(&self, refresh_token: &SecretString) -> Result<(), AuthError>;

    /// # Errors
    ///
    /// Returns an error if the stored token cannot be removed.
    fn clear(&self) -> Result<(), AuthError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<SecretString>>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<SecretString> {
        lock(&self.token)
            .as_ref()
            .map(|token| SecretString::from(token.expose_secret().to_string()))
    }

    fn save(&self, refresh_token: &SecretString) -> Result<(), AuthError> {
        *lock(&self.token) = Some(SecretString::from(
            refresh_token.expose_secret().to_string(),
        ));
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *lock(&self.token) = None;
        Ok(())
    }
}

/// Credential handed back by a provider-hosted consent window.
pub struct FederatedCredential {
    pub provider_id: String,
    pub id_token: SecretString,
}

/// Opens the consent window of a federated identity provider.
#[async_trait(?Send)]
pub trait FederatedConsent: Send + Sync {
    /// # Errors
    ///
    /// Returns `popup-closed` when the user dismisses the window.
    async fn request(&self) -> Result<FederatedCredential, AuthError>;
}

/// Consent source for builds without a federated provider wired in.
pub struct ConsentUnavailable;

#[async_trait(?Send)]
impl FederatedConsent for ConsentUnavailable {
    async fn request(&self) -> Result<FederatedCredential, AuthError> {
        Err(AuthError::popup_closed().with_detail("federated sign-in is not configured"))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdpRequest<'a> {
    post_body: String,
    request_uri: &'a str,
    return_idp_credential: bool,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileRequest<'a> {
    id_token: &'a str,
    display_name: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
    id_token: Option<String>,
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AuthResponse>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Maps an Identity Toolkit error message such as
/// `WEAK_PASSWORD : Password should be at least 6 characters` onto a reason.
pub fn map_error_code(message: &str) -> AuthError {
    let code = message.split(':').next().unwrap_or_default().trim();
    let error = match code {
        "EMAIL_NOT_FOUND"
        | "INVALID_PASSWORD"
        | "INVALID_LOGIN_CREDENTIALS"
        | "INVALID_EMAIL"
        | "MISSING_PASSWORD"
        | "USER_DISABLED"
        | "EMAIL_EXISTS"
        | "WEAK_PASSWORD"
        | "INVALID_IDP_RESPONSE"
        | "TOKEN_EXPIRED"
        | "INVALID_REFRESH_TOKEN"
        | "USER_NOT_FOUND" => AuthError::invalid_credentials(),
        _ => AuthError::unknown(),
    };

    if code.is_empty() {
        error
    } else {
        error.with_detail(code)
    }
}

fn map_transport_error(err: &reqwest::Error) -> AuthError {
    if err.is_decode() {
        AuthError::unknown().with_detail("unexpected response from the identity service")
    } else {
        AuthError::network_failure()
    }
}

pub struct FirebaseProvider {
    http: Client,
    config: FirebaseConfig,
    notifier: AuthNotifier,
    tokens: Arc<dyn TokenStore>,
    consent: Arc<dyn FederatedConsent>,
    id_token: Mutex<Option<SecretString>>,
}

impl FirebaseProvider {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        config: FirebaseConfig,
        tokens: Arc<dyn TokenStore>,
        consent: Arc<dyn FederatedConsent>,
    ) -> reqwest::Result<Self> {
        Ok(Self {
            http: http::client()?,
            config,
            notifier: AuthNotifier::new(),
            tokens,
            consent,
            id_token: Mutex::new(None),
        })
    }

    /// Resolves the initial auth state from a persisted refresh token and
    /// publishes it. Until this completes subscribers receive nothing.
    #[instrument(skip(self))]
    pub async fn restore(&self) {
        let Some(refresh_token) = self.tokens.load() else {
            debug!("no persisted session");
            self.notifier.publish(None);
            return;
        };

        match self.refresh(&refresh_token).await {
            Ok(identity) => {
                debug!(uid = %identity.uid, "persisted session restored");
                self.notifier.publish(Some(identity));
            }
            Err(err) if err.reason == AuthErrorReason::NetworkFailure => {
                // The token stays for the next load; only this one starts signed out.
                warn!(reason = %err.reason, "identity service unreachable; keeping persisted token");
                self.notifier.publish(None);
            }
            Err(err) => {
                warn!(reason = %err.reason, "persisted session rejected");
                if let Err(err) = self.tokens.clear() {
                    warn!(reason = %err.reason, "failed to drop persisted token");
                }
                self.notifier.publish(None);
            }
        }
    }

    async fn refresh(&self, refresh_token: &SecretString) -> Result<UserIdentity, AuthError> {
        let url = self.token_url()?;
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.expose_secret()),
        ];
        let response = self
            .http
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(|err| map_transport_error(&err))?;
        let refreshed: RefreshResponse = Self::decode(response).await?;

        self.tokens
            .save(&SecretString::from(refreshed.refresh_token))?;
        let lookup: LookupResponse = self
            .post(
                "lookup",
                &LookupRequest {
                    id_token: &refreshed.id_token,
                },
            )
            .await?;
        *lock(&self.id_token) = Some(SecretString::from(refreshed.id_token));

        let account = lookup
            .users
            .into_iter()
            .next()
            .ok_or_else(|| AuthError::unknown().with_detail("USER_NOT_FOUND"))?;
        Ok(Self::identity(account, None))
    }

    fn endpoint(&self, method: &str) -> Result<Url, AuthError> {
        let base = http::join_url(&self.config.identity_base_url, &format!("accounts:{method}"));
        let mut url = Url::parse(&base)
            .map_err(|err| AuthError::unknown().with_detail(format!("invalid endpoint: {err}")))?;
        url.query_pairs_mut().append_pair("key", &self.config.api_key);
        Ok(url)
    }

    fn token_url(&self) -> Result<Url, AuthError> {
        let base = http::join_url(&self.config.token_base_url, "token");
        let mut url = Url::parse(&base)
            .map_err(|err| AuthError::unknown().with_detail(format!("invalid endpoint: {err}")))?;
        url.query_pairs_mut().append_pair("key", &self.config.api_key);
        Ok(url)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, AuthError> {
        let url = self.endpoint(method)?;
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| map_transport_error(&err))?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AuthError> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|err| map_transport_error(&err));
        }

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => Err(map_error_code(&envelope.error.message)),
            Err(_) if status.is_server_error() => {
                Err(AuthError::network_failure().with_detail(format!("HTTP {}", status.as_u16())))
            }
            Err(_) => Err(AuthError::unknown().with_detail(format!("HTTP {}", status.as_u16()))),
        }
    }

    fn identity(response: AuthResponse, email: Option<&str>) -> UserIdentity {
        UserIdentity {
            uid: response.local_id,
            email: response
                .email
                .or_else(|| email.map(str::to_string))
                .unwrap_or_default(),
            display_name: response.display_name.filter(|name| !name.is_empty()),
            avatar_url: response.photo_url.filter(|url| !url.is_empty()),
        }
    }

    /// Keeps the tokens of a fresh sign-in, then publishes the identity.
    fn establish(&self, mut response: AuthResponse, email: Option<&str>) -> UserIdentity {
        if let Some(id_token) = response.id_token.take() {
            *lock(&self.id_token) = Some(SecretString::from(id_token));
        }
        if let Some(refresh_token) = response.refresh_token.take() {
            if let Err(err) = self.tokens.save(&SecretString::from(refresh_token)) {
                warn!(reason = %err.reason, "session will not survive a reload");
            }
        }

        let identity = Self::identity(response, email);
        self.notifier.publish(Some(identity.clone()));
        identity
    }
}

#[async_trait(?Send)]
impl IdentityProvider for FirebaseProvider {
    fn subscribe(&self) -> AuthSubscription {
        self.notifier.subscribe()
    }

    #[instrument(skip(self, email, password))]
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<UserIdentity, AuthError> {
        let response: AuthResponse = self
            .post(
                "signInWithPassword",
                &PasswordRequest {
                    email,
                    password: password.expose_secret(),
                    return_secure_token: true,
                },
            )
            .await?;
        Ok(self.establish(response, Some(email)))
    }

    #[instrument(skip(self))]
    async fn sign_in_with_federated(&self) -> Result<UserIdentity, AuthError> {
        let credential = self.consent.request().await?;
        let post_body = form_urlencoded::Serializer::new(String::new())
            .append_pair("id_token", credential.id_token.expose_secret())
            .append_pair("providerId", &credential.provider_id)
            .finish();

        let response: AuthResponse = self
            .post(
                "signInWithIdp",
                &IdpRequest {
                    post_body,
                    request_uri: &self.config.request_uri,
                    return_idp_credential: true,
                    return_secure_token: true,
                },
            )
            .await?;
        Ok(self.establish(response, None))
    }

    #[instrument(skip(self, email, password))]
    async fn create_account(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<UserIdentity, AuthError> {
        let response: AuthResponse = self
            .post(
                "signUp",
                &PasswordRequest {
                    email,
                    password: password.expose_secret(),
                    return_secure_token: true,
                },
            )
            .await?;
        Ok(self.establish(response, Some(email)))
    }

    #[instrument(skip(self))]
    async fn update_display_name(&self, display_name: &str) -> Result<UserIdentity, AuthError> {
        let id_token = lock(&self.id_token)
            .as_ref()
            .map(|token| token.expose_secret().to_string())
            .ok_or_else(|| AuthError::unknown().with_detail("no signed-in user"))?;
        let current = self.notifier.current_identity();

        let response: AuthResponse = self
            .post(
                "update",
                &UpdateProfileRequest {
                    id_token: &id_token,
                    display_name,
                    return_secure_token: true,
                },
            )
            .await?;

        let mut identity = self.establish(
            response,
            current.as_ref().map(|identity| identity.email.as_str()),
        );
        if identity.avatar_url.is_none() {
            if let Some(current) = current {
                identity.avatar_url = current.avatar_url;
            }
        }
        Ok(identity)
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<(), AuthError> {
        self.tokens.clear()?;
        *lock(&self.id_token) = None;
        self.notifier.publish(None);
        Ok(())
    }
}
