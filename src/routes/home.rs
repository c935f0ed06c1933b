use crate::subscription_store;
use crate::utils::e500;
use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};
use anyhow::Context as _;
use sqlx::PgPool;
use tera::{Context, Tera};

/// The landing page, with the subscription form and the categories one can pick from.
#[tracing::instrument(name = "Render the landing page", skip(pool, templates))]
pub async fn home(
    pool: web::Data<PgPool>,
    templates: web::Data<Tera>,
) -> Result<HttpResponse, actix_web::Error> {
    let categories: Vec<String> = subscription_store::list_categories(&pool)
        .await
        .context("Failed to load the categories for the landing page.")
        .map_err(e500)?
        .into_iter()
        .map(|category| category.to_string())
        .collect();

    let mut template_context = Context::new();
    template_context.insert("categories", &categories);
    let html_body = templates
        .render("main.html", &template_context)
        .context("Error rendering main html")
        .map_err(e500)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(html_body))
}
