use thiserror::Error;

#[derive(Error, Debug)]
pub enum PitlaneError {
    #[error("Configuration error: {0}")]
    Config(String),
}
