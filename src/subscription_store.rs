//! Persistence of users, categories and the subscription edges between them.
//!
//! Idempotence and concurrency safety come from the unique constraints on `users.email` and on
//! `(subscriptions.user_id, subscriptions.category_id)`, combined with `ON CONFLICT DO NOTHING`
//! inserts. There is no application-level locking.
use crate::domain::{CategoryName, NewSubscription, SubscriberEmail};
use crate::utils::error_chain_fmt;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("There is no category named `{0}`.")]
    CategoryNotFound(CategoryName),
    #[error("Failed to query the subscription store.")]
    Database(#[from] sqlx::Error),
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Records that `new_subscription.email` wants to receive the broadcasts of
/// `new_subscription.category`.
///
/// Returns `true` if a new subscription was created and `false` if the pair was already subscribed.
/// Everything happens in a single transaction: an unknown category leaves the store untouched.
#[tracing::instrument(
    name = "Saving a new subscription",
    skip(pool, new_subscription),
    fields(
        subscriber_email = %new_subscription.email,
        category = %new_subscription.category
    )
)]
pub async fn subscribe(
    pool: &PgPool,
    new_subscription: &NewSubscription,
) -> Result<bool, StoreError> {
    let mut transaction = pool.begin().await?;

    let category_id = get_category_id(&mut transaction, &new_subscription.category)
        .await?
        .ok_or_else(|| StoreError::CategoryNotFound(new_subscription.category.clone()))?;
    let user_id = get_or_create_user(&mut transaction, &new_subscription.email).await?;
    let created = insert_subscription(&mut transaction, user_id, category_id).await?;

    transaction.commit().await?;
    if !created {
        tracing::info!("The subscriber was already subscribed to this category");
    }
    Ok(created)
}

/// The emails of every user subscribed to `category`, ordered alphabetically.
///
/// An empty list is a valid answer: either nobody subscribed yet or the category does not exist.
#[tracing::instrument(name = "Get the subscribers of a category", skip(pool))]
pub async fn list_subscriber_emails(
    pool: &PgPool,
    category: &CategoryName,
) -> Result<Vec<SubscriberEmail>, sqlx::Error> {
    let emails = sqlx::query_scalar::<_, String>(
        r#"
        SELECT u.email
        FROM users u
        JOIN subscriptions s ON u.user_id = s.user_id
        JOIN categories c ON s.category_id = c.category_id
        WHERE c.name = $1
        ORDER BY u.email
        "#,
    )
    .bind(category.as_ref())
    .fetch_all(pool)
    .await?
    .into_iter()
    .filter_map(|email| match SubscriberEmail::parse(email) {
        Ok(email) => Some(email),
        Err(error) => {
            tracing::warn!(
                error.message = %error,
                "Skipping a subscriber. Their stored contact details are invalid"
            );
            None
        }
    })
    .collect();

    Ok(emails)
}

/// The seeded categories, ordered by name.
#[tracing::instrument(name = "Get all categories", skip(pool))]
pub async fn list_categories(pool: &PgPool) -> Result<Vec<CategoryName>, sqlx::Error> {
    let categories = sqlx::query_scalar::<_, String>("SELECT name FROM categories ORDER BY name")
        .fetch_all(pool)
        .await?
        .into_iter()
        .filter_map(|name| CategoryName::parse(name).ok())
        .collect();

    Ok(categories)
}

async fn get_category_id(
    transaction: &mut Transaction<'_, Postgres>,
    category: &CategoryName,
) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT category_id FROM categories WHERE name = $1")
        .bind(category.as_ref())
        .fetch_optional(transaction)
        .await
}

/// Get-or-create keyed on the unique email. A concurrent request that wins the race makes our
/// insert a no-op; the follow-up read then sees its committed row.
async fn get_or_create_user(
    transaction: &mut Transaction<'_, Postgres>,
    email: &SubscriberEmail,
) -> Result<Uuid, sqlx::Error> {
    let inserted = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO users (user_id, email)
        VALUES ($1, $2)
        ON CONFLICT (email) DO NOTHING
        RETURNING user_id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email.as_ref())
    .fetch_optional(&mut *transaction)
    .await?;

    match inserted {
        Some(user_id) => Ok(user_id),
        None => {
            sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM users WHERE email = $1")
                .bind(email.as_ref())
                .fetch_one(transaction)
                .await
        }
    }
}

async fn insert_subscription(
    transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    category_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO subscriptions (user_id, category_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, category_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(category_id)
    .execute(transaction)
    .await?;

    Ok(result.rows_affected() == 1)
}
