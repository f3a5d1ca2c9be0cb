#[derive(Debug, thiserror::Error)]
pub enum CrashError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("package info unavailable: {0}")]
    PackageInfo(String),
}
