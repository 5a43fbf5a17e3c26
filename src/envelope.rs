use std::fmt::Display;

use serde::Serialize;

pub const DEFAULT_FAILURE_MESSAGE: &str = "API unavailable";

/// Uniform result of every API client call.
///
/// Fields are private so the two states cannot be mixed up: a successful
/// response never carries an error, and a failed one always carries a
/// non-empty message next to the empty value of `T`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    pub fn failure(message: impl Display) -> Self
    where
        T: Default,
    {
        let message = message.to_string();
        let message = if message.trim().is_empty() {
            DEFAULT_FAILURE_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            success: false,
            data: T::default(),
            error: Some(message),
        }
    }

    pub fn from_result(result: anyhow::Result<T>) -> Self
    where
        T: Default,
    {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::failure(err),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn into_parts(self) -> (bool, T, Option<String>) {
        (self.success, self.data, self.error)
    }

    pub fn into_result(self) -> Result<T, String> {
        match self.error {
            Some(message) if !self.success => Err(message),
            _ => Ok(self.data),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            success: self.success,
            data: f(self.data),
            error: self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_failure_message_is_replaced() {
        let resp: ApiResponse<Vec<u32>> = ApiResponse::failure("   ");
        assert!(!resp.is_success());
        assert_eq!(resp.error(), Some(DEFAULT_FAILURE_MESSAGE));
        assert!(resp.data().is_empty());
    }

    #[test]
    fn success_serializes_without_error_field() {
        let resp = ApiResponse::ok(vec![1, 2]);
        let json = serde_json::to_string(&resp).expect("serializable");
        assert_eq!(json, r#"{"success":true,"data":[1,2]}"#);
    }

    #[test]
    fn from_result_keeps_outer_context_only() {
        let err = anyhow::anyhow!("connection refused").context("Network error occurred");
        let resp: ApiResponse<Option<u8>> = ApiResponse::from_result(Err(err));
        assert_eq!(resp.into_result(), Err("Network error occurred".to_string()));
    }
}
