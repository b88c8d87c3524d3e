//! Admin HTTP handlers.
//!
//! ```text
//! POST /api/v1/admin/sweep   Run the archival sweep on demand
//! ```

use actix_web::{post, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::SweepOutcome;
use crate::domain::Error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Counts of transitions applied by one sweep run.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SweepResponseBody {
    pub archived: usize,
    pub promoted: usize,
    pub skipped: usize,
}

impl From<SweepOutcome> for SweepResponseBody {
    fn from(value: SweepOutcome) -> Self {
        Self {
            archived: value.archived,
            promoted: value.promoted,
            skipped: value.skipped,
        }
    }
}

/// Run the archival sweep immediately instead of waiting for the timer.
#[utoipa::path(
    post,
    path = "/api/v1/admin/sweep",
    responses(
        (status = 200, description = "Sweep completed", body = SweepResponseBody),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "runSweep",
    security(("SessionCookie" = []))
)]
#[post("/admin/sweep")]
pub async fn run_sweep(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SweepResponseBody>> {
    let caller = session.require_caller()?;
    if !caller.role.is_admin() {
        return Err(Error::forbidden("only admins may trigger a sweep"));
    }

    let outcome = state.sweep.run_sweep().await?;

    Ok(web::Json(SweepResponseBody::from(outcome)))
}

#[cfg(test)]
mod tests {
    //! Role gating and outcome serialisation coverage.

    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use serde_json::Value;

    use crate::inbound::http::test_utils::{
        login_as, stub_state, test_login, test_session_middleware, StubPorts,
    };

    use super::*;

    const MEMBER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

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
            .app_data(actix_web::web::Data::new(stub_state(ports)))
            .wrap(test_session_middleware())
            .service(test_login)
            .service(actix_web::web::scope("/api/v1").service(run_sweep))
    }

    #[actix_web::test]
    async fn members_may_not_trigger_a_sweep() {
        let app = actix_test::init_service(test_app(StubPorts::default())).await;
        let cookie = login_as(&app, MEMBER_ID, "member").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/admin/sweep")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn admins_get_the_transition_counts() {
        let app = actix_test::init_service(test_app(StubPorts {
            sweep: Some(Ok(SweepOutcome {
                archived: 3,
                promoted: 1,
                skipped: 0,
            })),
            ..StubPorts::default()
        }))
        .await;
        let cookie = login_as(&app, MEMBER_ID, "admin").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/admin/sweep")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["archived"], 3);
        assert_eq!(body["promoted"], 1);
        assert_eq!(body["skipped"], 0);
    }

    #[actix_web::test]
    async fn sweep_requires_a_session() {
        let app = actix_test::init_service(test_app(StubPorts::default())).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/admin/sweep")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
