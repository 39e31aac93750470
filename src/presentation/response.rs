use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::retrieval::RetrievalResult;

pub const NOT_FOUND_DETAIL: &str = "No documents found";
pub const NOT_FOUND_CODE: &str = "NOT_FOUND";
pub const INTERNAL_ERROR_DETAIL: &str =
    "Internal server error occurred while fetching the latest document";
pub const INTERNAL_ERROR_CODE: &str = "INTERNAL_ERROR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Ok,
    NotFound,
    InternalError,
}

impl ResponseStatus {
    /// HTTP status code for this outcome.
    pub fn code(self) -> u16 {
        match self {
            ResponseStatus::Ok => 200,
            ResponseStatus::NotFound => 404,
            ResponseStatus::InternalError => 500,
        }
    }

    pub fn is_success(self) -> bool {
        self == ResponseStatus::Ok
    }
}

/// Success body. Exactly these three fields, whatever else the stored
/// document carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestDocumentBody {
    pub id: String,
    pub payload: Map<String, Value>,
    pub publish_received_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
    pub error_code: Option<String>,
}

impl ErrorBody {
    fn new(detail: &str, error_code: &str) -> Self {
        Self {
            detail: detail.to_string(),
            error_code: Some(error_code.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Document(LatestDocumentBody),
    Error(ErrorBody),
}

/// A rendered response, ready for any transport to write out.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub status: ResponseStatus,
    pub body: ResponseBody,
}

pub fn render(result: RetrievalResult) -> Rendered {
    match result {
        RetrievalResult::Found(latest) => Rendered {
            status: ResponseStatus::Ok,
            body: ResponseBody::Document(LatestDocumentBody {
                id: latest.id,
                payload: latest.payload.into_object(),
                publish_received_at: latest.publish_received_at,
            }),
        },
        RetrievalResult::Empty => Rendered {
            status: ResponseStatus::NotFound,
            body: ResponseBody::Error(ErrorBody::new(NOT_FOUND_DETAIL, NOT_FOUND_CODE)),
        },
        RetrievalResult::Unavailable(_) => Rendered {
            status: ResponseStatus::InternalError,
            body: ResponseBody::Error(ErrorBody::new(INTERNAL_ERROR_DETAIL, INTERNAL_ERROR_CODE)),
        },
    }
}
