//! REST client for the remote bill service. The service owns persistence and
//! access control; the client only shapes requests and surfaces failures as
//! `AppError` with a sanitized body.

use super::types::{Bill, Category, NewBill, Payment, PaymentRequest, PaymentUpdate};
use crate::errors::AppError;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

/// Query for `GET /bills`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BillQuery {
    pub category: Option<Category>,
    pub limit: Option<usize>,
}

impl BillQuery {
    /// The home page shows the six most recent bills.
    pub fn recent(category: Option<Category>) -> Self {
        Self {
            category,
            limit: Some(6),
        }
    }

    pub fn all(category: Option<Category>) -> Self {
        Self {
            category,
            limit: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BillClient {
    client: Client,
    base_url: Url,
}

impl BillClient {
    /// # Errors
    ///
    /// Returns `AppError::Config` when `base_url` is not an absolute URL.
    pub fn new(client: Client, base_url: &str) -> Result<Self, AppError> {
        let mut base_url = Url::parse(base_url.trim())
            .map_err(|err| AppError::Config(format!("Invalid bill service URL: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "Invalid bill service URL: {base_url}"
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// # Errors
    ///
    /// Returns an error when the request fails or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_bills(&self, query: BillQuery) -> Result<Vec<Bill>, AppError> {
        let mut url = self.endpoint(&["bills"])?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(category) = query.category {
                pairs.append_pair("category", category.as_str());
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        strip_empty_query(&mut url);

        let response = self.client.get(url).send().await?;
        handle_json(response).await
    }

    /// # Errors
    ///
    /// Returns `AppError::Http` with status 404 when the bill does not exist.
    #[instrument(skip(self))]
    pub async fn get_bill(&self, id: &str) -> Result<Bill, AppError> {
        let url = self.endpoint(&["bills", id])?;
        let response = self.client.get(url).send().await?;
        handle_json(response).await
    }

    /// # Errors
    ///
    /// Returns an error when the service rejects the bill.
    #[instrument(skip(self, bill), fields(title = %bill.title))]
    pub async fn create_bill(&self, bill: &NewBill) -> Result<(), AppError> {
        let url = self.endpoint(&["bills"])?;
        let response = self.client.post(url).json(bill).send().await?;
        handle_empty(response).await
    }

    /// Records a payment in the user's history.
    ///
    /// # Errors
    ///
    /// Returns an error when the service rejects the payment.
    #[instrument(skip(self, payment), fields(bill_id = %payment.bill_id))]
    pub async fn pay_bill(&self, payment: &PaymentRequest) -> Result<(), AppError> {
        let url = self.endpoint(&["myBills"])?;
        let response = self.client.post(url).json(payment).send().await?;
        handle_empty(response).await
    }

    /// # Errors
    ///
    /// Returns an error when the request fails or the response cannot be decoded.
    #[instrument(skip(self, email))]
    pub async fn list_payments(&self, email: &str) -> Result<Vec<Payment>, AppError> {
        let mut url = self.endpoint(&["myBills"])?;
        url.query_pairs_mut().append_pair("email", email);
        let response = self.client.get(url).send().await?;
        handle_json(response).await
    }

    /// # Errors
    ///
    /// Returns an error when the service rejects the update.
    #[instrument(skip(self, update))]
    pub async fn update_payment(&self, id: &str, update: &PaymentUpdate) -> Result<(), AppError> {
        let url = self.endpoint(&["myBills", id])?;
        let response = self.client.put(url).json(update).send().await?;
        handle_empty(response).await
    }

    /// # Errors
    ///
    /// Returns an error when the service rejects the deletion.
    #[instrument(skip(self))]
    pub async fn delete_payment(&self, id: &str) -> Result<(), AppError> {
        let url = self.endpoint(&["myBills", id])?;
        let response = self.client.delete(url).send().await?;
        handle_empty(response).await
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AppError::Config("Bill service URL cannot carry a path.".to_string()))?
            .pop_if_empty()
            .extend(segments);
        debug!(%url, "bill service request");
        Ok(url)
    }
}

fn strip_empty_query(url: &mut Url) {
    if url.query().is_some_and(str::is_empty) {
        url.set_query(None);
    }
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
async fn handle_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let status = response.status();
    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Http {
            status: status.as_u16(),
            message: sanitize_body(&body),
        })
    }
}

async fn handle_empty(response: Response) -> Result<(), AppError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Http {
            status: status.as_u16(),
            message: sanitize_body(&body),
        })
    }
}

/// Trims and truncates HTTP error bodies for user-facing messages.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> BillClient {
        BillClient::new(Client::new(), base).unwrap()
    }

    #[test]
    fn sanitize_body_trims_and_truncates() {
        assert_eq!(sanitize_body("   "), "Request failed.");
        assert_eq!(sanitize_body(" nope \n"), "nope");
        assert_eq!(sanitize_body(&"x".repeat(500)).chars().count(), MAX_ERROR_CHARS);
    }

    #[test]
    fn endpoint_encodes_ids_and_keeps_base_path() {
        let bills = client("https://api.tld/v1");
        assert_eq!(
            bills.endpoint(&["bills", "a b/c"]).unwrap().as_str(),
            "https://api.tld/v1/bills/a%20b%2Fc"
        );
        let bills = client("https://api.tld/");
        assert_eq!(
            bills.endpoint(&["myBills"]).unwrap().as_str(),
            "https://api.tld/myBills"
        );
    }

    #[test]
    fn rejects_relative_base_url() {
        assert!(matches!(
            BillClient::new(Client::new(), "/api"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn recent_query_limits_to_six() {
        assert_eq!(BillQuery::recent(None).limit, Some(6));
        assert_eq!(BillQuery::all(Some(Category::Gas)).limit, None);
    }
}
