//! The spray lookup: a pure function of the configured token, the request
//! and the store contents.

use crate::backend::{
    http::{HttpResponse, StatusCode},
    request::{Request, SprayRequest},
    store::{spray_key, Store},
};

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("User ID is required")]
    MissingUserId,

    #[error("Invalid user ID format")]
    InvalidUserId,

    #[error("Spray data not found")]
    NotFound,

    #[error("Pixel frames not found")]
    FramesNotFound,

    #[error("Pixel string not found")]
    PixelsNotFound,

    #[error("Server error")]
    Server(#[from] anyhow::Error),
}

impl LookupError {
    pub fn status(&self) -> StatusCode {
        match self {
            LookupError::Unauthorized => StatusCode::Unauthorized,
            LookupError::MissingUserId | LookupError::InvalidUserId => StatusCode::BadRequest,
            LookupError::NotFound | LookupError::FramesNotFound | LookupError::PixelsNotFound => {
                StatusCode::NotFound
            }
            LookupError::Server(_) => StatusCode::InternalServerError,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum SprayPayload {
    Pixels(String),
    Frames(Vec<String>),
}

/// Strip a platform qualifier: `76561198000000000@steam` -> `76561198000000000`.
pub fn extract_id(user_id: &str) -> &str {
    match user_id.split_once('@') {
        Some((id, _)) => id,
        None => user_id,
    }
}

/// Compare without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

pub fn lookup_spray(
    api_token: &str,
    request: &SprayRequest,
    store: &Store,
) -> Result<SprayPayload, LookupError> {
    match request.authorization {
        Some(token) if constant_time_eq(token.as_bytes(), api_token.as_bytes()) => {}
        _ => return Err(LookupError::Unauthorized),
    }

    let user_id = request
        .user_id
        .as_deref()
        .ok_or(LookupError::MissingUserId)?;
    let id = extract_id(user_id);
    if id.is_empty() {
        return Err(LookupError::InvalidUserId);
    }

    log::debug!("looking up spray for {} (extracted {})", user_id, id);

    let record = store
        .get_record(&spray_key(id))?
        .ok_or(LookupError::NotFound)?;

    if record.is_gif == Some(true) {
        match record.pixel_frames {
            Some(frames) if !frames.is_empty() => {
                log::debug!("found {} frames for {}", frames.len(), id);
                Ok(SprayPayload::Frames(frames))
            }
            _ => Err(LookupError::FramesNotFound),
        }
    } else {
        match record.pixel_string {
            Some(pixels) if !pixels.is_empty() => Ok(SprayPayload::Pixels(pixels)),
            _ => Err(LookupError::PixelsNotFound),
        }
    }
}

pub fn handle_request(api_token: &str, request: &Request, store: &Store) -> HttpResponse {
    match request {
        Request::NotFound => HttpResponse::text(StatusCode::NotFound, "Not found"),
        Request::MethodNotAllowed => {
            HttpResponse::text(StatusCode::MethodNotAllowed, "Method not allowed")
        }
        Request::Spray(spray_request) => match lookup_spray(api_token, spray_request, store) {
            Ok(SprayPayload::Pixels(pixels)) => HttpResponse::text(StatusCode::Ok, pixels),
            Ok(SprayPayload::Frames(frames)) => match serde_json::to_string(&frames) {
                Ok(body) => HttpResponse::json(body),
                Err(e) => {
                    log::error!("failed to encode frames: {}", e);
                    HttpResponse::text(StatusCode::InternalServerError, "Server error")
                }
            },
            Err(e) => {
                match &e {
                    LookupError::Server(cause) => log::error!("spray lookup failed: {:#}", cause),
                    LookupError::Unauthorized => log::warn!("rejected spray request: bad token"),
                    _ => log::info!("spray lookup: {}", e),
                }
                HttpResponse::text(e.status(), e.to_string())
            }
        },
    }
}
