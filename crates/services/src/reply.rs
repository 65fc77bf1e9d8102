use serde_json::{json, Value};

/// Successful outcome of an operation: the status to answer with and the
/// JSON body, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Option<Value>,
}

impl Reply {
    pub fn with_status(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    pub fn ok(body: Value) -> Self {
        Self::with_status(200, body)
    }

    pub fn created(body: Value) -> Self {
        Self::with_status(201, body)
    }

    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }

    /// What listings answer when the upstream could not provide data.
    pub fn empty_list() -> Self {
        Self::ok(json!([]))
    }
}
