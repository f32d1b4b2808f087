use crate::helpers::spawn_app;
use claim::assert_some;
use diesel::prelude::*;
use newsletter_signup::models::Signup;
use newsletter_signup::schema::signup;

#[tokio::test]
async fn confirming_with_an_unknown_token_returns_a_404_and_adds_nobody() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = reqwest::get(&format!("{}/confirm/not-a-real-token", app.address))
        .await
        .unwrap();

    // assert
    assert_eq!(response.status().as_u16(), 404);
    assert!(app.mail_api.members_added.lock().unwrap().is_empty());
}

#[tokio::test]
async fn clicking_the_confirmation_link_finishes_the_signup() {
    // arrange
    let app = spawn_app().await;
    let body = "email=ursula_le_guin%40gmail.com";
    app.post_signup(body.into()).await;
    let confirmation_link = app.confirmation_link();

    // act
    let response = reqwest::get(confirmation_link).await.unwrap();

    // assert
    assert_eq!(response.status().as_u16(), 200);

    let saved = signup::table
        .first::<Signup>(&app.db_connection)
        .expect("Result set was empty.");
    assert_some!(saved.completed_at);

    let members = app.mail_api.members_added.lock().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].email, "ursula_le_guin@gmail.com");
    assert_eq!(members[0].list_address, "dispatch@list.example.com");
}

#[tokio::test]
async fn finishing_a_signup_twice_is_idempotent() {
    // arrange
    let app = spawn_app().await;
    let body = "email=ursula_le_guin%40gmail.com";
    app.post_signup(body.into()).await;
    let confirmation_link = app.confirmation_link();

    // act
    let first = reqwest::get(confirmation_link.clone()).await.unwrap();
    let second = reqwest::get(confirmation_link).await.unwrap();

    // assert: both succeed, and the member add happened once per call
    assert_eq!(first.status().as_u16(), 200);
    assert_eq!(second.status().as_u16(), 200);
    assert_eq!(app.mail_api.members_added.lock().unwrap().len(), 2);
}

// The full double-opt-in walk: start, get rate limited, finish, finish again.
#[tokio::test]
async fn the_whole_signup_flow_holds_together() {
    // arrange
    let app = spawn_app().await;
    let body = "email=foo%40example.com";

    // act + assert: first submission creates the signup
    let response = app.post_signup(body.into()).await;
    assert_eq!(response.status().as_u16(), 200);
    let saved = signup::table
        .first::<Signup>(&app.db_connection)
        .expect("Result set was empty.");
    assert_eq!(saved.num_attempts, 1);

    // an immediate resubmission is rate limited
    let response = app.post_signup(body.into()).await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(app.mail_api.messages_sent.lock().unwrap().len(), 1);
    let saved = signup::table
        .first::<Signup>(&app.db_connection)
        .expect("Result set was empty.");
    assert_eq!(saved.num_attempts, 1);

    // finishing through the emailed link works, twice
    let confirmation_link = app.confirmation_link();
    let first = reqwest::get(confirmation_link.clone()).await.unwrap();
    let second = reqwest::get(confirmation_link).await.unwrap();
    assert_eq!(first.status().as_u16(), 200);
    assert_eq!(second.status().as_u16(), 200);

    let members = app.mail_api.members_added.lock().unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].email, "foo@example.com");
}
