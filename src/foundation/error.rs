/// Crate-wide result alias.
pub type PromoResult<T> = Result<T, PromoError>;

/// Error type returned by the rendering pipeline.
#[derive(thiserror::Error, Debug)]
pub enum PromoError {
    /// Invalid configuration or geometry (bad canvas size, zero-sized screenshot, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure while rasterizing or compositing pixels.
    #[error("render error: {0}")]
    Render(String),

    /// IO, decode and encode failures with attached context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PromoError {
    /// Build a [`PromoError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PromoError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
