use crate::broadcast::{self, BroadcastError};
use crate::domain::NewsletterIssue;
use crate::email_client::EmailClient;
use crate::routes::ResponseMessage;
use crate::utils::error_chain_fmt;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use sqlx::PgPool;

#[derive(serde::Deserialize)]
pub struct NewsletterRequest {
    category: Option<String>,
    subject: Option<String>,
    content: Option<String>,
}

#[derive(thiserror::Error)]
pub enum PublishError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    Broadcast(#[from] BroadcastError),
}

impl std::fmt::Debug for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for PublishError {
    fn status_code(&self) -> StatusCode {
        match self {
            PublishError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PublishError::Broadcast(BroadcastError::NoSubscribers(_)) => StatusCode::NOT_FOUND,
            PublishError::Broadcast(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            PublishError::ValidationError(_) => "Неполные данные для рассылки",
            PublishError::Broadcast(BroadcastError::NoSubscribers(_)) => {
                "Нет подписчиков для этой категории"
            }
            PublishError::Broadcast(_) => "Ошибка при отправке рассылки",
        };
        HttpResponse::build(self.status_code()).json(ResponseMessage { message })
    }
}

impl TryFrom<NewsletterRequest> for NewsletterIssue {
    type Error = PublishError;

    fn try_from(request: NewsletterRequest) -> Result<Self, Self::Error> {
        match (request.category, request.subject, request.content) {
            (Some(category), Some(subject), Some(content)) => {
                NewsletterIssue::parse(category, subject, content)
                    .map_err(PublishError::ValidationError)
            }
            _ => Err(PublishError::ValidationError(
                "The category, the subject or the content is missing.".into(),
            )),
        }
    }
}

/// Anyone who can reach this endpoint can broadcast; it is meant to sit behind the operator's own
/// network boundary.
#[tracing::instrument(
    name = "Publish a newsletter issue",
    skip(request, pool, email_client),
    fields(category = ?request.category)
)]
pub async fn publish_newsletter(
    request: web::Json<NewsletterRequest>,
    pool: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
) -> Result<HttpResponse, PublishError> {
    let issue: NewsletterIssue = request.into_inner().try_into()?;
    let recipients = broadcast::broadcast(&pool, &email_client, &issue).await?;
    tracing::info!(recipients, "The newsletter issue was handed over to the email API");
    Ok(HttpResponse::Ok().json(ResponseMessage {
        message: "Рассылка отправлена!",
    }))
}
