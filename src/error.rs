use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),

    #[error("Scope not found: {0}")]
    ScopeNotFound(String),
}

pub type Result<T> = std::result::Result<T, IndexerError>;
