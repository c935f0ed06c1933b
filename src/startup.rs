use crate::configuration::{DatabaseSettings, Settings};
use crate::email_client::EmailClient;
use crate::routes;
use actix_web::{dev::Server, web, App, HttpServer};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::io::ErrorKind;
use std::net::TcpListener;
use tera::Tera;
use tracing_actix_web::TracingLogger;

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(configuration.with_db())
}

pub struct Application {
    port: u16,
    server: Server,
    db_pool: PgPool,
}

impl Application {
    /// Builds every collaborator the handlers need and binds the listener. Nothing is shared
    /// through globals: the pool, the email client and the templates are injected as `web::Data`.
    pub async fn build(configuration: Settings) -> Result<Self, std::io::Error> {
        let connection_pool = get_connection_pool(&configuration.database);

        let sender_email = configuration
            .email_client
            .sender()
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidInput, e))?;
        let timeout = configuration.email_client.timeout();
        let email_client = EmailClient::new(
            configuration.email_client.base_url,
            sender_email,
            configuration.email_client.authorization_token,
            timeout,
        )
        .map_err(|e| std::io::Error::new(ErrorKind::Other, e))?;

        let templates = Tera::new("templates/**/*.html")
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?;

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)?;
        //Retrieve the port assigned to us by the OS
        let port = listener.local_addr()?.port();
        let server = run(listener, connection_pool.clone(), email_client, templates)?;

        Ok(Self {
            port,
            server,
            db_pool: connection_pool,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Only returns when the server is stopped (e.g. on SIGINT/SIGTERM). The connection pool is
    /// closed on the way out.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        let outcome = self.server.await;
        self.db_pool.close().await;
        tracing::info!("Server stopped, database connections closed");
        outcome
    }
}

pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    email_client: EmailClient,
    templates: Tera,
) -> Result<Server, std::io::Error> {
    // Wrap the shared collaborators in `Arc`-backed application state
    let db_pool = web::Data::new(db_pool);
    let email_client = web::Data::new(email_client);
    let templates = web::Data::new(templates);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(routes::json_error_handler))
            .route("/", web::get().to(routes::home))
            .route("/health_check", web::get().to(routes::health_check))
            .route("/subscribe", web::post().to(routes::subscribe))
            .route("/send-newsletter", web::post().to(routes::publish_newsletter))
            .app_data(db_pool.clone())
            .app_data(email_client.clone())
            .app_data(templates.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
