pub mod handlers;
pub mod otp;
pub mod sms;
