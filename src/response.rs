use serde::{Deserialize, Serialize};

/// Uniform response envelope used by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
        }
    }

    pub fn ok_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            error: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            error,
        }
    }
}

/// Query-string pagination shared by list endpoints.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

impl Pagination {
    /// Clamp to a sane window so a client cannot ask for the whole table.
    pub fn clamped(&self) -> (i64, i64) {
        (self.limit.clamp(1, 100), self.offset.max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_skips_absent_fields() {
        let body = ApiResponse::ok(serde_json::json!({"id": 1}));
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains(r#""success":true"#));
        assert!(!json.contains("message"));
        assert!(!json.contains("error"));
    }

    #[test]
    fn failure_envelope_carries_message_and_detail() {
        let body = ApiResponse::<()>::failure("nope", Some("detail".into()));
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains(r#""success":false"#));
        assert!(json.contains(r#""message":"nope""#));
        assert!(json.contains(r#""error":"detail""#));
        assert!(!json.contains("data"));
    }

    #[test]
    fn pagination_defaults_and_clamping() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.limit, 20);
        assert_eq!(p.offset, 0);

        let p = Pagination {
            limit: 10_000,
            offset: -3,
        };
        assert_eq!(p.clamped(), (100, 0));
    }
}
