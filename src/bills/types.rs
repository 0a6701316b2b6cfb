use crate::errors::AppError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Image used when a new bill is submitted without one.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/800x400?text=Bill+Image";

/// Wire format of every bill and payment date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const MISSING_FIELDS: &str = "Please fill all required fields.";
const AMOUNT_NOT_NUMERIC: &str = "Amount must be a number.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Electricity,
    Gas,
    Water,
    Internet,
    /// Any category the bill service returns that this client does not know.
    #[serde(other)]
    Other,
}

impl Category {
    /// Categories offered by the filters and the add-bill form.
    pub const ALL: [Category; 4] = [
        Category::Electricity,
        Category::Gas,
        Category::Water,
        Category::Internet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Electricity => "Electricity",
            Self::Gas => "Gas",
            Self::Water => "Water",
            Self::Internet => "Internet",
            Self::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub category: Category,
    #[serde(deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Bill {
    /// Bills are payable only within the calendar month of their date.
    pub fn is_payable(&self, today: NaiveDate) -> bool {
        is_payable(&self.date, today)
    }
}

/// Body of `POST /bills`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewBill {
    pub title: String,
    pub category: Category,
    pub amount: f64,
    pub location: String,
    pub description: String,
    pub image: String,
    pub date: String,
    pub email: String,
}

/// Raw add-bill form input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BillDraft {
    pub title: String,
    pub category: Category,
    pub amount: String,
    pub location: String,
    pub description: String,
    pub image: String,
    pub date: String,
}

impl BillDraft {
    /// Empty form with the date pre-filled.
    pub fn for_date(today: NaiveDate) -> Self {
        Self {
            date: today.format(DATE_FORMAT).to_string(),
            ..Self::default()
        }
    }

    /// Validates the form and stamps the bill with the submitting user's email.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when a required field is blank or the
    /// amount is not a number.
    pub fn validate(&self, email: &str) -> Result<NewBill, AppError> {
        let required = [
            &self.title,
            &self.amount,
            &self.location,
            &self.description,
            &self.date,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(AppError::Validation(MISSING_FIELDS.to_string()));
        }
        let amount = parse_amount(&self.amount)?;
        let image = match self.image.trim() {
            "" => PLACEHOLDER_IMAGE.to_string(),
            image => image.to_string(),
        };

        Ok(NewBill {
            title: self.title.trim().to_string(),
            category: self.category,
            amount,
            location: self.location.trim().to_string(),
            description: self.description.trim().to_string(),
            image,
            date: self.date.trim().to_string(),
            email: email.to_string(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "billsId")]
    pub bill_id: String,
    pub username: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    #[serde(deserialize_with = "lenient_amount")]
    pub amount: f64,
    pub date: String,
}

/// Body of `POST /myBills`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaymentRequest {
    #[serde(rename = "billsId")]
    pub bill_id: String,
    pub username: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub amount: f64,
    pub date: String,
}

/// Raw pay-bill form input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaymentDraft {
    pub username: String,
    pub address: String,
    pub phone: String,
}

impl PaymentDraft {
    /// Builds the payment for `bill`, paid by `email` on `today`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when a contact field is blank.
    pub fn validate(
        &self,
        bill: &Bill,
        email: &str,
        today: NaiveDate,
    ) -> Result<PaymentRequest, AppError> {
        if [&self.username, &self.address, &self.phone]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(AppError::Validation(MISSING_FIELDS.to_string()));
        }

        Ok(PaymentRequest {
            bill_id: bill.id.clone(),
            username: self.username.trim().to_string(),
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: email.to_string(),
            amount: bill.amount,
            date: today.format(DATE_FORMAT).to_string(),
        })
    }
}

/// Body of `PUT /myBills/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaymentUpdate {
    pub amount: f64,
    pub address: String,
    pub phone: String,
    pub date: String,
}

/// Raw update-payment form input, pre-filled from the payment being edited.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaymentUpdateDraft {
    pub amount: String,
    pub address: String,
    pub phone: String,
    pub date: String,
}

impl PaymentUpdateDraft {
    pub fn from_payment(payment: &Payment) -> Self {
        Self {
            amount: payment.amount.to_string(),
            address: payment.address.clone(),
            phone: payment.phone.clone(),
            date: payment.date.clone(),
        }
    }

    /// # Errors
    ///
    /// Returns `AppError::Validation` when a field is blank or the amount is
    /// not a number.
    pub fn validate(&self) -> Result<PaymentUpdate, AppError> {
        if [&self.amount, &self.address, &self.phone, &self.date]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(AppError::Validation(MISSING_FIELDS.to_string()));
        }

        Ok(PaymentUpdate {
            amount: parse_amount(&self.amount)?,
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
            date: self.date.trim().to_string(),
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PaymentSummary {
    pub count: usize,
    pub total: f64,
}

impl PaymentSummary {
    pub fn from_payments(payments: &[Payment]) -> Self {
        Self {
            count: payments.len(),
            total: payments.iter().map(|payment| payment.amount).sum(),
        }
    }
}

/// True when `bill_date` (YYYY-MM-DD, optionally followed by a time) falls in
/// the same year and month as `today`. Unparseable dates are never payable.
pub fn is_payable(bill_date: &str, today: NaiveDate) -> bool {
    parse_date(bill_date)
        .is_some_and(|date| date.year() == today.year() && date.month() == today.month())
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, DATE_FORMAT).ok()
}

/// Renders an amount the way the bill views show it.
pub fn format_amount(amount: f64) -> String {
    format!("৳ {}", plain_amount(amount))
}

/// Amount without the currency sign: whole numbers without decimals.
pub fn plain_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}

fn parse_amount(value: &str) -> Result<f64, AppError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| AppError::Validation(AMOUNT_NOT_NUMERIC.to_string()))
}

/// The bill service stores amounts as numbers, but edited payments can come
/// back as numeric strings.
fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(amount) => Ok(amount),
        Amount::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid amount: {text}"))),
    }
}
