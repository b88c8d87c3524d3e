//! Tests for the reservation HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web, App};
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};

use crate::domain::ports::ReservationPayload;
use crate::domain::{
    BoatId, Error, ReservationId, ReservationKind, ReservationStatus, UserId,
};
use crate::inbound::http::test_utils::{login_as, stub_state, test_login, test_session_middleware, StubPorts};

use super::*;

const MEMBER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn payload_fixture(status: ReservationStatus) -> ReservationPayload {
    ReservationPayload {
        id: ReservationId::random(),
        user_id: UserId::random(),
        boat_id: BoatId::random(),
        date: NaiveDate::from_ymd_opt(2026, 8, 15).expect("valid date"),
        kind: ReservationKind::Standard,
        status,
        notes: "engine checked".to_owned(),
        created_at: Utc
            .with_ymd_and_hms(2026, 8, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

fn test_app(
    ports: StubPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(stub_state(ports)))
        .wrap(test_session_middleware())
        .service(test_login)
        .service(
            web::scope("/api/v1")
                .service(create_reservation)
                .service(confirm_reservation)
                .service(delete_reservation),
        )
}

fn create_body() -> Value {
    json!({
        "boatId": "11111111-1111-4111-8111-111111111111",
        "date": "2026-08-15",
        "kind": "standard",
        "notes": "engine checked"
    })
}

#[actix_web::test]
async fn create_returns_created_with_camel_case_payload() {
    let app = actix_test::init_service(test_app(StubPorts {
        create_reservation: Some(Ok(payload_fixture(ReservationStatus::Unconfirmed))),
        ..StubPorts::default()
    }))
    .await;
    let cookie = login_as(&app, MEMBER_ID, "member").await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/reservations")
        .cookie(cookie)
        .set_json(create_body())
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["status"], "unconfirmed");
    assert_eq!(body["kind"], "standard");
    assert_eq!(body["date"], "2026-08-15");
    assert!(body.get("boatId").is_some());
    assert!(body.get("createdAt").is_some());
}

#[actix_web::test]
async fn create_rejects_foreign_kind_before_touching_ports() {
    let app = actix_test::init_service(test_app(StubPorts::default())).await;
    let cookie = login_as(&app, MEMBER_ID, "member").await;

    let mut body = create_body();
    body["kind"] = json!("Weekly");
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/reservations")
        .cookie(cookie)
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "invalid_reservation_kind");
    assert_eq!(body["details"]["field"], "kind");
}

#[actix_web::test]
async fn create_rejects_malformed_dates() {
    let app = actix_test::init_service(test_app(StubPorts::default())).await;
    let cookie = login_as(&app, MEMBER_ID, "member").await;

    let mut body = create_body();
    body["date"] = json!("15/08/2026");
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/reservations")
        .cookie(cookie)
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "invalid_date");
}

#[actix_web::test]
async fn create_requires_a_session() {
    let app = actix_test::init_service(test_app(StubPorts::default())).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/reservations")
        .set_json(create_body())
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_surfaces_insufficient_quota_as_conflict() {
    let app = actix_test::init_service(test_app(StubPorts {
        create_reservation: Some(Err(Error::insufficient_quota(
            "no remaining quota for this reservation kind",
        ))),
        ..StubPorts::default()
    }))
    .await;
    let cookie = login_as(&app, MEMBER_ID, "member").await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/reservations")
        .cookie(cookie)
        .set_json(create_body())
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "insufficient_quota");
}

#[actix_web::test]
async fn confirm_returns_the_confirmed_payload() {
    let app = actix_test::init_service(test_app(StubPorts {
        confirm_reservation: Some(Ok(payload_fixture(ReservationStatus::Confirmed))),
        ..StubPorts::default()
    }))
    .await;
    let cookie = login_as(&app, MEMBER_ID, "member").await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/reservations/22222222-2222-4222-8222-222222222222/confirm")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["status"], "confirmed");
}

#[actix_web::test]
async fn confirm_rejects_malformed_reservation_ids() {
    let app = actix_test::init_service(test_app(StubPorts::default())).await;
    let cookie = login_as(&app, MEMBER_ID, "member").await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/reservations/not-a-uuid/confirm")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn confirm_surfaces_wrong_state_as_conflict() {
    let app = actix_test::init_service(test_app(StubPorts {
        confirm_reservation: Some(Err(Error::not_unconfirmed(
            "reservation is pending, not awaiting confirmation",
        ))),
        ..StubPorts::default()
    }))
    .await;
    let cookie = login_as(&app, MEMBER_ID, "member").await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/reservations/22222222-2222-4222-8222-222222222222/confirm")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "not_unconfirmed");
}

#[actix_web::test]
async fn delete_returns_no_content() {
    let app = actix_test::init_service(test_app(StubPorts {
        delete_reservation: Some(Ok(())),
        ..StubPorts::default()
    }))
    .await;
    let cookie = login_as(&app, MEMBER_ID, "member").await;

    let request = actix_test::TestRequest::delete()
        .uri("/api/v1/reservations/22222222-2222-4222-8222-222222222222")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn delete_names_the_violated_precondition() {
    let app = actix_test::init_service(test_app(StubPorts {
        delete_reservation: Some(Err(Error::cannot_delete_confirmed(
            "confirmed reservations cannot be deleted",
        ))),
        ..StubPorts::default()
    }))
    .await;
    let cookie = login_as(&app, MEMBER_ID, "member").await;

    let request = actix_test::TestRequest::delete()
        .uri("/api/v1/reservations/22222222-2222-4222-8222-222222222222")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "cannot_delete_confirmed");
}
