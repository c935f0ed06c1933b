use crate::helpers::spawn_app;
use serde_json::json;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

fn newsletter_request_body(category: &str) -> serde_json::Value {
    json!({
        "category": category,
        "subject": "Hi",
        "content": "Body",
    })
}

#[tokio::test]
async fn newsletters_are_sent_to_every_subscriber_in_one_request() {
    // Arrange
    let app = spawn_app().await;
    app.subscribe("b@x.com", "sports").await;
    app.subscribe("a@x.com", "sports").await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.post_newsletter(&newsletter_request_body("sports")).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let payload: serde_json::Value = response.json().await.unwrap();
    assert_eq!(payload, json!({"message": "Рассылка отправлена!"}));

    let email_request = &app.email_server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&email_request.body).unwrap();
    let mut recipients: Vec<&str> = body["To"].as_str().unwrap().split(',').collect();
    recipients.sort_unstable();
    assert_eq!(recipients, vec!["a@x.com", "b@x.com"]);
    assert_eq!(body["Subject"], "Hi");
    assert_eq!(body["TextBody"], "Body");
}

#[tokio::test]
async fn newsletters_only_reach_subscribers_of_the_requested_category() {
    // Arrange
    let app = spawn_app().await;
    app.subscribe("a@x.com", "sports").await;
    app.subscribe("c@x.com", "news").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.post_newsletter(&newsletter_request_body("sports")).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let email_request = &app.email_server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&email_request.body).unwrap();
    assert_eq!(body["To"], "a@x.com");
}

#[tokio::test]
async fn a_category_without_subscribers_returns_404_and_sends_nothing() {
    // Arrange
    let app = spawn_app().await;
    app.subscribe("a@x.com", "news").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        // We assert that no request is fired at the email API!
        .expect(0)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.post_newsletter(&newsletter_request_body("sports")).await;

    // Assert
    assert_eq!(response.status().as_u16(), 404);
    let payload: serde_json::Value = response.json().await.unwrap();
    assert_eq!(payload["message"], "Нет подписчиков для этой категории");
    // Mock verifies on Drop that we haven't sent the newsletter email
}

#[tokio::test]
async fn an_unknown_category_is_reported_as_having_no_subscribers() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.post_newsletter(&newsletter_request_body("knitting")).await;

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn newsletters_returns_400_for_invalid_data() {
    // Arrange
    let app = spawn_app().await;
    let test_cases = vec![
        (json!({"subject": "Hi", "content": "Body"}), "missing category"),
        (json!({"category": "sports", "content": "Body"}), "missing subject"),
        (json!({"category": "sports", "subject": "Hi"}), "missing content"),
        (
            json!({"category": "sports", "subject": "", "content": "Body"}),
            "empty subject",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        // Act
        let response = app.post_newsletter(&invalid_body).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            error_message
        );
        let payload: serde_json::Value = response.json().await.unwrap();
        assert_eq!(payload["message"], "Неполные данные для рассылки");
    }
}

#[tokio::test]
async fn a_rejected_send_returns_500_without_leaking_details() {
    // Arrange
    let app = spawn_app().await;
    app.subscribe("a@x.com", "sports").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.post_newsletter(&newsletter_request_body("sports")).await;

    // Assert
    assert_eq!(response.status().as_u16(), 500);
    let payload: serde_json::Value = response.json().await.unwrap();
    assert_eq!(payload, json!({"message": "Ошибка при отправке рассылки"}));
}
