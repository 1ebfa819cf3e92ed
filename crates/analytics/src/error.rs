use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid analysis parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}
