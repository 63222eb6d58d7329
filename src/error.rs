use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The iteration count handed to the indicator was zero or negative.
    #[error("number of iterations must be positive, got {0}")]
    InvalidConfiguration(i64),

    /// `update` was called before any iteration count was set.
    #[error("number of iterations not set")]
    NotConfigured,

    #[error("failed to write progress: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        assert_eq!(
            Error::InvalidConfiguration(-5).to_string(),
            "number of iterations must be positive, got -5"
        );
        assert_eq!(Error::NotConfigured.to_string(), "number of iterations not set");

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let error: Error = io.into();
        assert!(error.to_string().contains("pipe closed"));
    }
}
