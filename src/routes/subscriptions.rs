use crate::domain::{CategoryName, NewSubscription, SubscriberEmail};
use crate::routes::ResponseMessage;
use crate::subscription_store::{self, StoreError};
use crate::utils::error_chain_fmt;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use sqlx::PgPool;

/// Both fields are optional so that a missing field is reported with our own message rather than
/// a generic deserialization error.
#[derive(serde::Deserialize)]
pub struct SubscribeRequest {
    email: Option<String>,
    category: Option<String>,
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("The email or the category is missing.")]
    MissingFields,
    #[error("{0}")]
    InvalidEmail(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl SubscribeError {
    fn user_message(&self) -> &'static str {
        match self {
            SubscribeError::MissingFields => "Не передан email или категория",
            SubscribeError::InvalidEmail(_) => "Некорректный email",
            SubscribeError::Store(StoreError::CategoryNotFound(_)) => "Категория не найдена",
            SubscribeError::Store(StoreError::Database(_)) => "Внутренняя ошибка сервера",
        }
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::MissingFields
            | SubscribeError::InvalidEmail(_)
            | SubscribeError::Store(StoreError::CategoryNotFound(_)) => StatusCode::BAD_REQUEST,
            SubscribeError::Store(StoreError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ResponseMessage {
            message: self.user_message(),
        })
    }
}

impl TryFrom<SubscribeRequest> for NewSubscription {
    type Error = SubscribeError;

    fn try_from(request: SubscribeRequest) -> Result<Self, Self::Error> {
        let (email, category) = match (request.email, request.category) {
            (Some(email), Some(category)) => (email, category),
            _ => return Err(SubscribeError::MissingFields),
        };
        if email.trim().is_empty() {
            return Err(SubscribeError::MissingFields);
        }
        let category = CategoryName::parse(category).map_err(|_| SubscribeError::MissingFields)?;
        let email = SubscriberEmail::parse(email).map_err(SubscribeError::InvalidEmail)?;
        Ok(Self { email, category })
    }
}

#[tracing::instrument(
    name = "Adding a new subscription",
    skip(request, pool),
    fields(
        subscriber_email = ?request.email,
        category = ?request.category
    )
)]
pub async fn subscribe(
    request: web::Json<SubscribeRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, SubscribeError> {
    let new_subscription: NewSubscription = request.into_inner().try_into()?;
    subscription_store::subscribe(&pool, &new_subscription).await?;
    Ok(HttpResponse::Ok().json(ResponseMessage {
        message: "Подписка успешно оформлена!",
    }))
}
