mod health_check;
mod home;
mod newsletter;
mod subscriptions;

pub use health_check::*;
pub use home::*;
pub use newsletter::*;
pub use subscriptions::*;

/// Body of every JSON response: `{"message": "..."}`.
#[derive(serde::Serialize)]
pub struct ResponseMessage<'a> {
    pub message: &'a str,
}

/// Turns `JsonConfig` deserialization failures (malformed JSON, wrong field types) into the same
/// `{message}` shape as every other response.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::warn!(error.message = %err, "Rejecting a malformed JSON payload");
    let response = actix_web::HttpResponse::BadRequest().json(ResponseMessage {
        message: "Что-то пошло не так...",
    });
    actix_web::error::InternalError::from_response(err, response).into()
}
