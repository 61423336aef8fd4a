use crate::{
    error::{Error, ErrorKind},
    router::util::BadRequest,
    util::log_err,
};
use failure::Compat;
use serde_derive::Serialize;
use warp::{
    filters::body::BodyDeserializeError,
    http::StatusCode,
    reply::{json, with_status},
    Rejection, Reply,
};

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

/// The HTTP status and stable error code each kind of error is reported with.
pub fn status_of(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::AlreadyExists => (StatusCode::CONFLICT, "PR_EXISTS"),
        ErrorKind::TeamAlreadyExists => (StatusCode::CONFLICT, "TEAM_EXISTS"),
        ErrorKind::NoTeam => (StatusCode::CONFLICT, "NO_TEAM"),
        ErrorKind::NoCandidate => (StatusCode::CONFLICT, "NO_CANDIDATE"),
        ErrorKind::ReviewerNotAssigned => (StatusCode::CONFLICT, "NOT_ASSIGNED"),
        ErrorKind::AlreadyMerged => (StatusCode::CONFLICT, "PR_MERGED"),
        ErrorKind::EmptyTeam => (StatusCode::BAD_REQUEST, "EMPTY_TEAM"),
        ErrorKind::MemberNotFound => (StatusCode::NOT_FOUND, "MEMBER_NOT_FOUND"),
        ErrorKind::Inconsistent | ErrorKind::Store => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL")
        }
    }
}

/// Turns the rejections we know about into JSON error responses. Any other 400 (such as a missing
/// or malformed query string) gets a generic `BAD_REQUEST`; everything else (unknown routes, wrong
/// methods) is left for warp to handle.
pub fn recover(rejection: Rejection) -> Result<impl Reply, Rejection> {
    let (status, code, message) = if let Some(err) = rejection.find_cause::<Compat<Error>>() {
        let err = err.get_ref();
        let (status, code) = status_of(err.kind());
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log_err(err);
            (status, code, "internal error".to_owned())
        } else {
            (status, code, err.kind().to_string())
        }
    } else if let Some(err) = rejection.find_cause::<BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, "BAD_REQUEST", err.to_string())
    } else if let Some(err) = rejection.find_cause::<BadRequest>() {
        (StatusCode::BAD_REQUEST, "BAD_REQUEST", err.to_string())
    } else if rejection.status() == StatusCode::BAD_REQUEST {
        let message = match rejection.cause() {
            Some(cause) => cause.to_string(),
            None => "malformed request".to_owned(),
        };
        (StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    } else {
        return Err(rejection);
    };

    let body = ErrorResponse {
        error: ErrorBody { code, message },
    };
    Ok(with_status(json(&body), status))
}
