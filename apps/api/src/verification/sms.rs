//! SMS delivery. `AppState` holds an `Arc<dyn SmsSender>`; production uses
//! Fast2SMS's quick route.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

const FAST2SMS_URL: &str = "https://www.fast2sms.com/dev/bulkV2";
/// Quick route: no DLT template registration needed.
const FAST2SMS_ROUTE: &str = "q";

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider rejected the message (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid phone number: {0}")]
    InvalidNumber(String),
}

#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Sends `message` to a normalized phone number.
    async fn send(&self, phone: &str, message: &str) -> Result<(), SmsError>;
}

#[derive(Debug, Deserialize)]
struct Fast2SmsResponse {
    #[serde(rename = "return")]
    accepted: bool,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    message: serde_json::Value,
}

#[derive(Clone)]
pub struct Fast2SmsClient {
    client: Client,
    api_key: String,
}

impl Fast2SmsClient {
    pub fn new(api_key: String) -> Result<Self, SmsError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()?;
        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl SmsSender for Fast2SmsClient {
    async fn send(&self, phone: &str, message: &str) -> Result<(), SmsError> {
        let response = self
            .client
            .get(FAST2SMS_URL)
            .query(&[
                ("authorization", self.api_key.as_str()),
                ("route", FAST2SMS_ROUTE),
                ("message", message),
                ("flash", "0"),
                ("numbers", phone),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed: Option<Fast2SmsResponse> = serde_json::from_str(&body).ok();

        match parsed {
            Some(reply) if status.is_success() && reply.accepted => {
                debug!(request_id = ?reply.request_id, "SMS accepted");
                Ok(())
            }
            Some(reply) => {
                warn!(status = status.as_u16(), message = %reply.message, "SMS rejected");
                Err(SmsError::Rejected {
                    status: status.as_u16(),
                    message: reply.message.to_string(),
                })
            }
            None => Err(SmsError::Rejected {
                status: status.as_u16(),
                message: body,
            }),
        }
    }
}

/// Digits only. A 12-digit number with the Indian `91` prefix is reduced to
/// its 10-digit national form.
pub fn normalize_phone(raw: &str) -> Result<String, SmsError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let digits = if digits.len() == 12 && digits.starts_with("91") {
        digits[2..].to_string()
    } else {
        digits
    };
    if digits.len() < 7 || digits.len() > 15 {
        return Err(SmsError::InvalidNumber(raw.to_string()));
    }
    Ok(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_formatting() {
        assert_eq!(normalize_phone("(987) 654-3210").unwrap(), "9876543210");
    }

    #[test]
    fn test_drops_indian_prefix() {
        assert_eq!(normalize_phone("+91 98765 43210").unwrap(), "9876543210");
    }

    #[test]
    fn test_keeps_leading_zero_national_form() {
        assert_eq!(normalize_phone("08271753556").unwrap(), "08271753556");
    }

    #[test]
    fn test_other_twelve_digit_numbers_untouched() {
        assert_eq!(normalize_phone("+44 7911 123456").unwrap(), "447911123456");
    }

    #[test]
    fn test_rejects_too_short() {
        assert!(matches!(
            normalize_phone("12-34"),
            Err(SmsError::InvalidNumber(_))
        ));
        assert!(normalize_phone("").is_err());
    }

    #[test]
    fn test_provider_reply_parses() {
        let reply: Fast2SmsResponse = serde_json::from_str(
            r#"{"return": true, "request_id": "abc", "message": ["SMS sent successfully."]}"#,
        )
        .unwrap();
        assert!(reply.accepted);
        assert_eq!(reply.request_id.as_deref(), Some("abc"));
    }
}
