use crate::domain::{CategoryName, NewsletterIssue};
use crate::email_client::EmailClient;
use crate::subscription_store;
use crate::utils::error_chain_fmt;
use sqlx::PgPool;

#[derive(thiserror::Error)]
pub enum BroadcastError {
    #[error("Category `{0}` has no subscribers.")]
    NoSubscribers(CategoryName),
    #[error("Failed to fetch the subscribers of the category.")]
    StoreFailure(#[source] sqlx::Error),
    #[error("The email API did not accept the newsletter issue.")]
    TransportFailure(#[source] reqwest::Error),
}

impl std::fmt::Debug for BroadcastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Sends `issue` to every subscriber of its category as one message, returning how many recipients
/// it was addressed to.
///
/// There is no retry and no per-recipient bookkeeping: either the email API accepts the whole
/// message or the broadcast fails.
#[tracing::instrument(
    name = "Broadcast a newsletter issue",
    skip(pool, email_client, issue),
    fields(category = %issue.category, recipients = tracing::field::Empty)
)]
pub async fn broadcast(
    pool: &PgPool,
    email_client: &EmailClient,
    issue: &NewsletterIssue,
) -> Result<usize, BroadcastError> {
    let recipients = subscription_store::list_subscriber_emails(pool, &issue.category)
        .await
        .map_err(BroadcastError::StoreFailure)?;
    if recipients.is_empty() {
        return Err(BroadcastError::NoSubscribers(issue.category.clone()));
    }
    tracing::Span::current().record("recipients", recipients.len());

    email_client
        .send_email(&recipients, &issue.subject, &issue.content)
        .await
        .map_err(BroadcastError::TransportFailure)?;

    Ok(recipients.len())
}
