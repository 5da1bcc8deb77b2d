pub mod handlers;
pub mod scorer;
