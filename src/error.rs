#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid RGB buffer: {len} bytes cannot hold a {width}x{height} image")]
    InvalidBuffer { width: u32, height: u32, len: usize },
}
