/// Errors from the ML service client.
///
/// Every variant means the same thing to the caller — the prediction
/// service is unavailable for this request — but the split keeps the
/// cause visible in logs.
#[derive(Debug, thiserror::Error)]
pub enum MlError {
    /// The HTTP request itself failed (connect, DNS, TLS, timeout).
    #[error("ML request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("ML service error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The service returned a 2xx response whose body did not match the
    /// expected contract.
    #[error("malformed ML response: {0}")]
    InvalidResponse(String),
}
