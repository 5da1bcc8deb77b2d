use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::candidates::handlers::{require_user, user_not_found};
use crate::candidates::repository::set_verified_phone;
use crate::errors::AppError;
use crate::state::AppState;
use crate::verification::otp::{
    generate_code, sms_message, store_code, verify_code, OtpCheck,
};
use crate::verification::sms::{normalize_phone, SmsError};

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub external_id: String,
    pub phone: String,
    pub country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmOtpRequest {
    pub external_id: String,
    pub phone: String,
    pub code: String,
    pub country_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OtpSentResponse {
    pub phone: String,
    pub expires_in_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct PhoneVerifiedResponse {
    pub phone: String,
    pub phone_verified: bool,
}

fn phone_or_400(raw: &str) -> Result<String, AppError> {
    normalize_phone(raw).map_err(|e| AppError::Validation(e.to_string()))
}

/// Maps a failed check to the message shown on the onboarding form.
pub fn rejection(check: OtpCheck) -> Option<AppError> {
    let message = match check {
        OtpCheck::Verified => return None,
        OtpCheck::Mismatch { attempts_left } => {
            format!("Invalid verification code. {attempts_left} attempt(s) left")
        }
        OtpCheck::Exhausted => {
            "Too many incorrect attempts. Please request a new code".to_string()
        }
        OtpCheck::Expired => {
            "Verification code expired or was never requested".to_string()
        }
    };
    Some(AppError::Validation(message))
}

/// POST /api/v1/verification/otp
pub async fn handle_send_otp(
    State(state): State<AppState>,
    Json(req): Json<SendOtpRequest>,
) -> Result<Json<OtpSentResponse>, AppError> {
    let phone = phone_or_400(&req.phone)?;
    require_user(&state, &req.external_id).await?;

    let code = generate_code();
    let ttl = state.config.otp_ttl_secs;
    store_code(&state.redis, &req.external_id, &phone, &code, ttl).await?;

    state
        .sms
        .send(&phone, &sms_message(&code))
        .await
        .map_err(|e| match e {
            SmsError::InvalidNumber(_) => AppError::Validation(e.to_string()),
            other => AppError::Sms(other.to_string()),
        })?;

    info!(
        external_id = %req.external_id,
        country_code = ?req.country_code,
        "Verification code sent"
    );
    Ok(Json(OtpSentResponse {
        phone,
        expires_in_secs: ttl,
    }))
}

/// POST /api/v1/verification/otp/confirm
pub async fn handle_confirm_otp(
    State(state): State<AppState>,
    Json(req): Json<ConfirmOtpRequest>,
) -> Result<Json<PhoneVerifiedResponse>, AppError> {
    let phone = phone_or_400(&req.phone)?;
    if req.code.trim().is_empty() {
        return Err(AppError::Validation("code is required".to_string()));
    }

    let check = verify_code(
        &state.redis,
        &req.external_id,
        &phone,
        &req.code,
        state.config.otp_ttl_secs,
    )
    .await?;
    if let Some(err) = rejection(check) {
        return Err(err);
    }

    let updated = set_verified_phone(
        &state.db,
        &req.external_id,
        &phone,
        req.country_code.as_deref(),
    )
    .await?;
    if !updated {
        return Err(user_not_found(&req.external_id));
    }

    info!(external_id = %req.external_id, "Phone verified");
    Ok(Json(PhoneVerifiedResponse {
        phone,
        phone_verified: true,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verified_is_not_rejected() {
        assert!(rejection(OtpCheck::Verified).is_none());
    }

    #[test]
    fn test_mismatch_reports_attempts_left() {
        match rejection(OtpCheck::Mismatch { attempts_left: 2 }) {
            Some(AppError::Validation(msg)) => assert!(msg.contains("2 attempt(s) left")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_expired_and_exhausted_are_validation_errors() {
        assert!(matches!(
            rejection(OtpCheck::Expired),
            Some(AppError::Validation(_))
        ));
        assert!(matches!(
            rejection(OtpCheck::Exhausted),
            Some(AppError::Validation(_))
        ));
    }
}
