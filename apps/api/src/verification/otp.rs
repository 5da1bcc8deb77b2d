//! One-time passcodes kept in Redis with a TTL.

use rand::Rng;
use redis::AsyncCommands;
use tracing::warn;

use crate::errors::AppError;

pub const CODE_MIN: u32 = 100_000;
pub const CODE_MAX: u32 = 999_999;
/// Wrong guesses allowed before the code is discarded.
pub const MAX_ATTEMPTS: u32 = 5;

pub fn otp_key(external_id: &str, phone: &str) -> String {
    format!("otp:{external_id}:{phone}")
}

fn attempts_key(external_id: &str, phone: &str) -> String {
    format!("{}:attempts", otp_key(external_id, phone))
}

/// Six-digit code in `[100000, 999999]`.
pub fn generate_code() -> String {
    rand::rng().random_range(CODE_MIN..=CODE_MAX).to_string()
}

pub fn sms_message(code: &str) -> String {
    format!("Your verification code is: {code}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpCheck {
    Verified,
    Mismatch { attempts_left: u32 },
    Exhausted,
    Expired,
}

/// Compares a submitted code with the stored one. `attempts` counts this
/// submission.
pub fn check_code(stored: Option<&str>, submitted: &str, attempts: u32) -> OtpCheck {
    let Some(stored) = stored else {
        return OtpCheck::Expired;
    };
    if attempts > MAX_ATTEMPTS {
        return OtpCheck::Exhausted;
    }
    if stored == submitted.trim() {
        OtpCheck::Verified
    } else if attempts >= MAX_ATTEMPTS {
        OtpCheck::Exhausted
    } else {
        OtpCheck::Mismatch {
            attempts_left: MAX_ATTEMPTS - attempts,
        }
    }
}

fn redis_error(e: redis::RedisError) -> AppError {
    AppError::Internal(anyhow::anyhow!("Redis error: {e}"))
}

/// Stores a fresh code, replacing any previous one and its attempt count.
pub async fn store_code(
    redis: &redis::Client,
    external_id: &str,
    phone: &str,
    code: &str,
    ttl_secs: u64,
) -> Result<(), AppError> {
    let mut conn = redis
        .get_multiplexed_async_connection()
        .await
        .map_err(redis_error)?;
    redis::cmd("SET")
        .arg(otp_key(external_id, phone))
        .arg(code)
        .arg("EX")
        .arg(ttl_secs)
        .query_async::<_, ()>(&mut conn)
        .await
        .map_err(redis_error)?;
    conn.del::<_, ()>(attempts_key(external_id, phone))
        .await
        .map_err(redis_error)?;
    Ok(())
}

/// Checks a submitted code. The stored code is deleted once verified or
/// once the attempts run out.
pub async fn verify_code(
    redis: &redis::Client,
    external_id: &str,
    phone: &str,
    submitted: &str,
    ttl_secs: u64,
) -> Result<OtpCheck, AppError> {
    let key = otp_key(external_id, phone);
    let counter = attempts_key(external_id, phone);
    let mut conn = redis
        .get_multiplexed_async_connection()
        .await
        .map_err(redis_error)?;

    let stored: Option<String> = conn.get(&key).await.map_err(redis_error)?;
    if stored.is_none() {
        return Ok(OtpCheck::Expired);
    }

    let attempts: u32 = conn.incr(&counter, 1).await.map_err(redis_error)?;
    if attempts == 1 {
        redis::cmd("EXPIRE")
            .arg(&counter)
            .arg(ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(redis_error)?;
    }

    let outcome = check_code(stored.as_deref(), submitted, attempts);
    match outcome {
        OtpCheck::Verified | OtpCheck::Exhausted => {
            conn.del::<_, ()>(vec![key, counter])
                .await
                .map_err(redis_error)?;
            if outcome == OtpCheck::Exhausted {
                warn!(external_id, "OTP attempts exhausted");
            }
        }
        OtpCheck::Mismatch { .. } | OtpCheck::Expired => {}
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_six_digits_in_range() {
        for _ in 0..1_000 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            let n: u32 = code.parse().unwrap();
            assert!((CODE_MIN..=CODE_MAX).contains(&n));
        }
    }

    #[test]
    fn test_key_layout() {
        assert_eq!(otp_key("user_1", "9876543210"), "otp:user_1:9876543210");
        assert_eq!(
            attempts_key("user_1", "9876543210"),
            "otp:user_1:9876543210:attempts"
        );
    }

    #[test]
    fn test_message_text() {
        assert_eq!(sms_message("123456"), "Your verification code is: 123456");
    }

    #[test]
    fn test_check_code_outcomes() {
        assert_eq!(check_code(None, "123456", 1), OtpCheck::Expired);
        assert_eq!(check_code(Some("123456"), " 123456 ", 1), OtpCheck::Verified);
        assert_eq!(
            check_code(Some("123456"), "000000", 1),
            OtpCheck::Mismatch { attempts_left: 4 }
        );
    }

    #[test]
    fn test_fifth_wrong_attempt_exhausts() {
        assert_eq!(
            check_code(Some("123456"), "000000", 4),
            OtpCheck::Mismatch { attempts_left: 1 }
        );
        assert_eq!(check_code(Some("123456"), "000000", 5), OtpCheck::Exhausted);
        assert_eq!(check_code(Some("123456"), "123456", 5), OtpCheck::Verified);
        assert_eq!(check_code(Some("123456"), "123456", 6), OtpCheck::Exhausted);
    }
}
