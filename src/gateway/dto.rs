use serde::Deserialize;

/// Error body the course service sends alongside a non-success status.
#[derive(Debug, Deserialize)]
pub struct RemoteError {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl RemoteError {
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}

/// Body returned by a successful delete.
#[derive(Debug, Deserialize)]
pub struct DeletedOrder {
    #[serde(default)]
    pub id: Option<i64>,
}
