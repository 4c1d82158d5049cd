//! Regression coverage for this module.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use crate::domain::ports::{MockHouseholdRecordRepository, RecordRepositoryError};
use crate::inbound::http::test_utils::{
    NEIGHBOUR_PASSWORD, NEIGHBOUR_USERNAME, TestWorld, session_cookie, test_app,
};
use crate::outbound::memory::{
    DEMO_ADMIN_PASSWORD, DEMO_ADMIN_USERNAME, DEMO_MEMBER_PASSWORD, DEMO_MEMBER_USERNAME,
};

#[fixture]
fn world() -> TestWorld {
    TestWorld::new()
}

fn login(username: &str, password: &str) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "username": username, "password": password }))
}

fn create(cookie: &Cookie<'static>, body: Value) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/api/v1/records")
        .cookie(cookie.clone())
        .set_json(body)
}

fn get(cookie: &Cookie<'static>, uri: &str) -> actix_test::TestRequest {
    actix_test::TestRequest::get().uri(uri).cookie(cookie.clone())
}

#[rstest]
#[actix_web::test]
async fn members_only_see_their_own_household(world: TestWorld) {
    let app = actix_test::init_service(test_app(world.state())).await;
    let member = session_cookie(
        &actix_test::call_service(
            &app,
            login(DEMO_MEMBER_USERNAME, DEMO_MEMBER_PASSWORD).to_request(),
        )
        .await,
    );
    let neighbour = session_cookie(
        &actix_test::call_service(
            &app,
            login(NEIGHBOUR_USERNAME, NEIGHBOUR_PASSWORD).to_request(),
        )
        .await,
    );

    let own = actix_test::call_service(
        &app,
        create(&member, json!({ "title": "Groceries" })).to_request(),
    )
    .await;
    assert_eq!(own.status(), StatusCode::CREATED);
    let own: Value = actix_test::read_body_json(own).await;
    assert_eq!(
        own["householdId"],
        json!(world.seed.household_id.to_string())
    );

    let theirs = actix_test::call_service(
        &app,
        create(&neighbour, json!({ "title": "Bins" })).to_request(),
    )
    .await;
    assert_eq!(theirs.status(), StatusCode::CREATED);
    let theirs: Value = actix_test::read_body_json(theirs).await;
    let their_id = theirs["id"].as_str().expect("record id").to_owned();

    let listed = actix_test::call_service(&app, get(&member, "/api/v1/records").to_request()).await;
    assert_eq!(listed.status(), StatusCode::OK);
    let listed: Value = actix_test::read_body_json(listed).await;
    let titles: Vec<&str> = listed
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|record| record["title"].as_str())
        .collect();
    assert_eq!(titles, ["Groceries"]);

    let foreign = actix_test::call_service(
        &app,
        get(&member, &format!("/api/v1/records/{their_id}")).to_request(),
    )
    .await;
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn members_cannot_write_into_another_household(world: TestWorld) {
    let app = actix_test::init_service(test_app(world.state())).await;
    let member = session_cookie(
        &actix_test::call_service(
            &app,
            login(DEMO_MEMBER_USERNAME, DEMO_MEMBER_PASSWORD).to_request(),
        )
        .await,
    );

    let res = actix_test::call_service(
        &app,
        create(
            &member,
            json!({
                "title": "Sneaky",
                "householdId": world.neighbour_household.to_string(),
            }),
        )
        .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], json!("forbidden"));
}

#[rstest]
#[actix_web::test]
async fn administrators_see_everything_and_must_name_a_target(world: TestWorld) {
    let app = actix_test::init_service(test_app(world.state())).await;
    let admin = session_cookie(
        &actix_test::call_service(
            &app,
            login(DEMO_ADMIN_USERNAME, DEMO_ADMIN_PASSWORD).to_request(),
        )
        .await,
    );

    let untargeted = actix_test::call_service(
        &app,
        create(&admin, json!({ "title": "Audit" })).to_request(),
    )
    .await;
    assert_eq!(untargeted.status(), StatusCode::BAD_REQUEST);
    let untargeted: Value = actix_test::read_body_json(untargeted).await;
    assert_eq!(untargeted["details"]["field"], json!("householdId"));

    for (household, title) in [
        (world.seed.household_id, "Demo audit"),
        (world.neighbour_household, "Jones audit"),
    ] {
        let res = actix_test::call_service(
            &app,
            create(
                &admin,
                json!({ "title": title, "householdId": household.to_string() }),
            )
            .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let listed = actix_test::call_service(&app, get(&admin, "/api/v1/records").to_request()).await;
    let listed: Value = actix_test::read_body_json(listed).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(2));
}

#[rstest]
#[case("")]
#[case("   ")]
#[actix_web::test]
async fn blank_titles_are_rejected(world: TestWorld, #[case] title: &str) {
    let app = actix_test::init_service(test_app(world.state())).await;
    let member = session_cookie(
        &actix_test::call_service(
            &app,
            login(DEMO_MEMBER_USERNAME, DEMO_MEMBER_PASSWORD).to_request(),
        )
        .await,
    );

    let res = actix_test::call_service(
        &app,
        create(&member, json!({ "title": title })).to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn records_require_a_session(world: TestWorld) {
    let app = actix_test::init_service(test_app(world.state())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/records")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn deactivating_a_household_revokes_live_sessions(world: TestWorld) {
    let app = actix_test::init_service(test_app(world.state())).await;
    let member = session_cookie(
        &actix_test::call_service(
            &app,
            login(DEMO_MEMBER_USERNAME, DEMO_MEMBER_PASSWORD).to_request(),
        )
        .await,
    );

    world
        .store
        .deactivate_household(&world.seed.household_id)
        .expect("deactivated");
    let res = actix_test::call_service(&app, get(&member, "/api/v1/records").to_request()).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn repository_failures_are_redacted(world: TestWorld) {
    let mut records = MockHouseholdRecordRepository::new();
    records
        .expect_list()
        .times(1)
        .returning(|_| Err(RecordRepositoryError::query("disk full on shard 3")));
    let mut state = world.state();
    state.records = Arc::new(records);
    let app = actix_test::init_service(test_app(state)).await;
    let member = session_cookie(
        &actix_test::call_service(
            &app,
            login(DEMO_MEMBER_USERNAME, DEMO_MEMBER_PASSWORD).to_request(),
        )
        .await,
    );

    let res = actix_test::call_service(&app, get(&member, "/api/v1/records").to_request()).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], json!("Internal server error"));
}
