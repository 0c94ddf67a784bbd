use serde::{Deserialize, Serialize};

/// Generic outcome body, `{"status": "ok"}` on success or the error message
/// otherwise. Error bodies also carry the request `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Status {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            path: None,
        }
    }

    pub fn ok() -> Self {
        Self::new("ok")
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

pub mod transaction {
    use super::*;

    /// Request body of `PUT /transactionservice/transaction/{id}`.
    ///
    /// `kind` is optional here so a missing type is reported as a validation
    /// error rather than a malformed body. A missing amount counts as `0`.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TransactionPut {
        #[serde(rename = "type")]
        pub kind: Option<String>,
        #[serde(default)]
        pub amount: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub parent_id: Option<i64>,
    }

    /// Response body of `GET /transactionservice/transaction/{id}`.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TransactionView {
        #[serde(rename = "type")]
        pub kind: String,
        pub amount: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub parent_id: Option<i64>,
    }
}

pub mod sum {
    use super::*;

    /// Response body of `GET /transactionservice/sum/{id}`.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Sum {
        pub sum: f64,
    }
}
