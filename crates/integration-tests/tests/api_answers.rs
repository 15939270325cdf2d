//! Answers end to end: posting with notification fan-in, the vote toggle,
//! acceptance authorization and the delete that patches the parent.

use axum::http::{Method, StatusCode};
use domains::models::Role;
use integration_tests::TestApp;

#[tokio::test]
async fn posting_an_answer_links_it_and_notifies_the_author() {
    let app = TestApp::new();
    let (asker, asker_token) = app.login("asker", Role::User);
    let (helper, helper_token) = app.login("helper", Role::User);

    let question_id = app
        .seed_question(&asker_token, "What is the Question: notification edition")
        .await;
    let answer_id = app.seed_answer(&helper_token, question_id).await;

    // The parent lists the answer in creation order.
    let (_, detail) = app
        .request(
            Method::GET,
            &format!("/api/questions/{question_id}"),
            None,
            None,
        )
        .await;
    assert_eq!(
        detail["answerIds"],
        serde_json::json!([answer_id.to_string()])
    );
    assert_eq!(detail["answers"][0]["id"], answer_id.to_string());

    // The question author got exactly one durable notification.
    let (status, feed) = app
        .request(Method::GET, "/api/notifications", Some(&asker_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let feed = feed.as_array().unwrap().clone();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["recipientId"], asker.user_id.to_string());
    assert_eq!(feed[0]["senderId"], helper.user_id.to_string());
    assert_eq!(feed[0]["kind"], "NEW_ANSWER");
    assert_eq!(feed[0]["link"], format!("/questions/{question_id}"));
    assert_eq!(feed[0]["isRead"], false);
    assert_eq!(
        feed[0]["message"],
        "helper answered your question: \"What is the Question: notifica...\""
    );
}

#[tokio::test]
async fn answering_your_own_question_stays_silent() {
    let app = TestApp::new();
    let (_, token) = app.login("soliloquist", Role::User);

    let question_id = app.seed_question(&token, "Talking to myself again here").await;
    app.seed_answer(&token, question_id).await;

    let (_, feed) = app
        .request(Method::GET, "/api/notifications", Some(&token), None)
        .await;
    assert_eq!(feed.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn answers_need_an_existing_question_and_enough_content() {
    let app = TestApp::new();
    let (_, token) = app.login("helper", Role::User);

    let (status, body) = app
        .request(
            Method::POST,
            &format!("/api/answers/question/{}", uuid::Uuid::new_v4()),
            Some(&token),
            Some(serde_json::json!({ "content": "Long enough content here." })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");

    let (_, asker_token) = app.login("asker", Role::User);
    let question_id = app.seed_question(&asker_token, "A question needing answers").await;
    let (status, body) = app
        .request(
            Method::POST,
            &format!("/api/answers/question/{question_id}"),
            Some(&token),
            Some(serde_json::json!({ "content": "short" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_input");
}

#[tokio::test]
async fn the_vote_toggle_over_http() {
    let app = TestApp::new();
    let (_, asker_token) = app.login("asker", Role::User);
    let (_, helper_token) = app.login("helper", Role::User);
    let (_, voter_token) = app.login("voter", Role::User);

    let question_id = app.seed_question(&asker_token, "Votes will land on this one").await;
    let answer_id = app.seed_answer(&helper_token, question_id).await;
    let vote_path = format!("/api/answers/{answer_id}/vote");

    // 0 → 1
    let (status, body) = app
        .request(
            Method::POST,
            &vote_path,
            Some(&voter_token),
            Some(serde_json::json!({ "voteType": "upvote" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["upvoterIds"].as_array().unwrap().len(), 1);

    // 1 → 0, toggle off
    let (_, body) = app
        .request(
            Method::POST,
            &vote_path,
            Some(&voter_token),
            Some(serde_json::json!({ "voteType": "upvote" })),
        )
        .await;
    assert_eq!(body["upvoterIds"].as_array().unwrap().len(), 0);
    assert_eq!(body["downvoterIds"].as_array().unwrap().len(), 0);

    // upvote then switch to downvote: only the downvote remains
    let (_, _) = app
        .request(
            Method::POST,
            &vote_path,
            Some(&voter_token),
            Some(serde_json::json!({ "voteType": "upvote" })),
        )
        .await;
    let (_, body) = app
        .request(
            Method::POST,
            &vote_path,
            Some(&voter_token),
            Some(serde_json::json!({ "voteType": "downvote" })),
        )
        .await;
    assert_eq!(body["upvoterIds"].as_array().unwrap().len(), 0);
    assert_eq!(body["downvoterIds"].as_array().unwrap().len(), 1);

    // anything else is invalid input
    let (status, body) = app
        .request(
            Method::POST,
            &vote_path,
            Some(&voter_token),
            Some(serde_json::json!({ "voteType": "sideways" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_input");
}

#[tokio::test]
async fn acceptance_is_the_authors_call_alone() {
    let app = TestApp::new();
    let (_, author_token) = app.login("author", Role::User);
    let (_, helper_token) = app.login("helper", Role::User);
    let (_, bystander_token) = app.login("bystander", Role::User);

    let question_id = app.seed_question(&author_token, "Which answer gets the check?").await;
    let answer_id = app.seed_answer(&helper_token, question_id).await;

    let accept_path = format!("/api/answers/question/{question_id}/accept/{answer_id}");

    let (status, body) = app
        .request(Method::POST, &accept_path, Some(&bystander_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "forbidden");

    let (status, body) = app
        .request(Method::POST, &accept_path, Some(&author_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["acceptedAnswerId"], answer_id.to_string());
}

#[tokio::test]
async fn accepting_replaces_and_rejects_foreign_answers() {
    let app = TestApp::new();
    let (_, author_token) = app.login("author", Role::User);
    let (_, helper_token) = app.login("helper", Role::User);

    let question_id = app.seed_question(&author_token, "Two answers, one checkmark").await;
    let first = app.seed_answer(&helper_token, question_id).await;
    let second = app.seed_answer(&helper_token, question_id).await;

    let other_question = app.seed_question(&author_token, "A different question entirely").await;
    let foreign = app.seed_answer(&helper_token, other_question).await;

    // accept first, then silently replace with second
    app.request(
        Method::POST,
        &format!("/api/answers/question/{question_id}/accept/{first}"),
        Some(&author_token),
        None,
    )
    .await;
    let (status, body) = app
        .request(
            Method::POST,
            &format!("/api/answers/question/{question_id}/accept/{second}"),
            Some(&author_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["acceptedAnswerId"], second.to_string());

    // an answer belonging to another question is a conflict
    let (status, body) = app
        .request(
            Method::POST,
            &format!("/api/answers/question/{question_id}/accept/{foreign}"),
            Some(&author_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "conflict");
}

#[tokio::test]
async fn deleting_an_answer_patches_the_parent() {
    let app = TestApp::new();
    let (_, author_token) = app.login("author", Role::User);
    let (_, helper_token) = app.login("helper", Role::User);
    let (_, stranger_token) = app.login("stranger", Role::User);

    let question_id = app.seed_question(&author_token, "An answer will vanish here").await;
    let answer_id = app.seed_answer(&helper_token, question_id).await;

    app.request(
        Method::POST,
        &format!("/api/answers/question/{question_id}/accept/{answer_id}"),
        Some(&author_token),
        None,
    )
    .await;

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/answers/{answer_id}"),
            Some(&stranger_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .request(
            Method::DELETE,
            &format!("/api/answers/{answer_id}"),
            Some(&helper_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    // The id left the parent's list and the acceptance was cleared.
    let (_, detail) = app
        .request(
            Method::GET,
            &format!("/api/questions/{question_id}"),
            None,
            None,
        )
        .await;
    assert_eq!(detail["answerIds"], serde_json::json!([]));
    assert_eq!(detail["acceptedAnswerId"], serde_json::Value::Null);
    assert_eq!(detail["answers"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn answers_come_back_by_score_with_creation_order_ties() {
    let app = TestApp::new();
    let (_, asker_token) = app.login("asker", Role::User);
    let (_, helper_token) = app.login("helper", Role::User);
    let (_, voter_token) = app.login("voter", Role::User);

    let question_id = app.seed_question(&asker_token, "Ordering question for answers").await;
    let first = app.seed_answer(&helper_token, question_id).await;
    let second = app.seed_answer(&helper_token, question_id).await;
    let third = app.seed_answer(&helper_token, question_id).await;

    // Only the third answer gets a vote; first and second tie at zero.
    app.request(
        Method::POST,
        &format!("/api/answers/{third}/vote"),
        Some(&voter_token),
        Some(serde_json::json!({ "voteType": "upvote" })),
    )
    .await;

    let (_, detail) = app
        .request(
            Method::GET,
            &format!("/api/questions/{question_id}"),
            None,
            None,
        )
        .await;
    let ordered: Vec<String> = detail["answers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        ordered,
        vec![third.to_string(), first.to_string(), second.to_string()]
    );
}
