use super::LlmError;

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return LlmError::TimeoutError(e.to_string());
        }
        if e.is_connect() {
            return LlmError::ConnectionError(e.to_string());
        }
        LlmError::HttpError(e.to_string())
    }
}

impl From<std::io::Error> for LlmError {
    fn from(e: std::io::Error) -> Self {
        LlmError::StreamError(e.to_string())
    }
}
