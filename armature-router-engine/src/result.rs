// Render results

use crate::error::SsrError;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Outcome of one render. [`status`](RenderResult::status) is how callers
/// tell expected outcomes (200/302/404) from failures.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderResult {
    /// 200 with markup and the serialized state snapshot.
    Ok {
        markup: String,
        serialized_state: String,
    },
    /// 302 to `path`.
    Redirect { path: String },
    /// 404 from route resolution.
    NotFound { message: String },
    /// Any failure caught by the engine.
    Error {
        status: u16,
        message: String,
        path: Option<String>,
        original_error: SsrError,
    },
}

impl RenderResult {
    pub(crate) fn from_error(error: SsrError) -> Self {
        RenderResult::Error {
            status: error.status_code(),
            message: error.to_string(),
            path: error.path().map(str::to_string),
            original_error: error,
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            RenderResult::Ok { .. } => 200,
            RenderResult::Redirect { .. } => 302,
            RenderResult::NotFound { .. } => 404,
            RenderResult::Error { status, .. } => *status,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, RenderResult::Ok { .. })
    }

    pub fn markup(&self) -> Option<&str> {
        match self {
            RenderResult::Ok { markup, .. } => Some(markup),
            _ => None,
        }
    }

    pub fn serialized_state(&self) -> Option<&str> {
        match self {
            RenderResult::Ok {
                serialized_state, ..
            } => Some(serialized_state),
            _ => None,
        }
    }

    /// Redirect target, from either a redirect rule or an error carrying a path.
    pub fn path(&self) -> Option<&str> {
        match self {
            RenderResult::Redirect { path } => Some(path),
            RenderResult::Error { path, .. } => path.as_deref(),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            RenderResult::NotFound { message } | RenderResult::Error { message, .. } => {
                Some(message)
            }
            _ => None,
        }
    }

    pub fn original_error(&self) -> Option<&SsrError> {
        match self {
            RenderResult::Error { original_error, .. } => Some(original_error),
            _ => None,
        }
    }
}

impl Serialize for RenderResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RenderResult::Ok {
                markup,
                serialized_state,
            } => {
                let mut s = serializer.serialize_struct("RenderResult", 3)?;
                s.serialize_field("status", &self.status())?;
                s.serialize_field("markup", markup)?;
                s.serialize_field("serializedState", serialized_state)?;
                s.end()
            }
            RenderResult::Redirect { path } => {
                let mut s = serializer.serialize_struct("RenderResult", 2)?;
                s.serialize_field("status", &self.status())?;
                s.serialize_field("path", path)?;
                s.end()
            }
            RenderResult::NotFound { message } => {
                let mut s = serializer.serialize_struct("RenderResult", 2)?;
                s.serialize_field("status", &self.status())?;
                s.serialize_field("message", message)?;
                s.end()
            }
            RenderResult::Error {
                status,
                message,
                path,
                original_error,
            } => {
                let mut s = serializer.serialize_struct("RenderResult", 4)?;
                s.serialize_field("status", status)?;
                s.serialize_field("message", message)?;
                if let Some(path) = path {
                    s.serialize_field("path", path)?;
                } else {
                    s.skip_field("path")?;
                }
                s.serialize_field("originalError", &original_error.to_string())?;
                s.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_codes() {
        let ok = RenderResult::Ok {
            markup: "<div></div>".to_string(),
            serialized_state: "x".to_string(),
        };
        assert_eq!(ok.status(), 200);
        assert!(ok.is_ok());
        assert_eq!(
            RenderResult::Redirect {
                path: "/a".to_string()
            }
            .status(),
            302
        );
        assert_eq!(
            RenderResult::NotFound {
                message: "gone".to_string()
            }
            .status(),
            404
        );
    }

    #[test]
    fn test_from_error_honours_carried_fields() {
        let result = RenderResult::from_error(SsrError::redirect("/x", "login first"));
        assert_eq!(result.status(), 302);
        assert_eq!(result.path(), Some("/x"));
        assert_eq!(result.message(), Some("login first"));
        assert_eq!(
            result.original_error(),
            Some(&SsrError::redirect("/x", "login first"))
        );

        let result = RenderResult::from_error(SsrError::StoreCreation("db down".to_string()));
        assert_eq!(result.status(), 500);
        assert_eq!(result.path(), None);
    }

    #[test]
    fn test_serialize_ok() {
        let result = RenderResult::Ok {
            markup: "<p></p>".to_string(),
            serialized_state: "window.__PRELOADED_STATE__ = 1;".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "status": 200,
                "markup": "<p></p>",
                "serializedState": "window.__PRELOADED_STATE__ = 1;"
            })
        );
    }

    #[test]
    fn test_serialize_error_without_path() {
        let result = RenderResult::from_error(SsrError::Render("bad".to_string()));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"status": 500, "message": "bad", "originalError": "bad"})
        );
    }
}
