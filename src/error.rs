pub type AnimsvgResult<T> = Result<T, AnimsvgError>;

#[derive(thiserror::Error, Debug)]
pub enum AnimsvgError {
    #[error("input error: {0}")]
    Input(String),

    #[error("animation error: {0}")]
    Animation(String),

    #[error("raster error: {0}")]
    Raster(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AnimsvgError {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}
