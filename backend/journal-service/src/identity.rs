//! Acting-user resolution.
//!
//! Authentication happens upstream; the gateway forwards the resolved user id
//! in the `x-user-id` header.

use crate::error::JournalError;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Owner of the entries a request operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerId(pub Uuid);

impl OwnerId {
    fn extract(req: &HttpRequest) -> Result<Self, JournalError> {
        let header_value = req
            .headers()
            .get(USER_ID_HEADER)
            .ok_or_else(|| JournalError::Unauthorized("Missing x-user-id header".into()))?;

        let value = header_value
            .to_str()
            .map_err(|_| JournalError::Unauthorized("Invalid x-user-id header".into()))?;

        Uuid::parse_str(value.trim())
            .map(OwnerId)
            .map_err(|_| JournalError::Unauthorized("Invalid x-user-id header value".into()))
    }
}

impl FromRequest for OwnerId {
    type Error = JournalError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::extract(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_valid_header() {
        let id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, id.to_string()))
            .to_http_request();
        assert_eq!(OwnerId::extract(&req).unwrap(), OwnerId(id));
    }

    #[test]
    fn test_missing_header() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            OwnerId::extract(&req),
            Err(JournalError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_malformed_header() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "user-42"))
            .to_http_request();
        assert!(OwnerId::extract(&req).is_err());
    }
}
