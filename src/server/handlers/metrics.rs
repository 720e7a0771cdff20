use std::sync::Arc;

use actix_web::web::{Bytes, Data};
use actix_web::HttpRequest;
use log::info;

use crate::server::context::ServerContext;
use crate::server::response::Response;
use crate::types::metrics::{DashboardMetrics, PatchMetricsRequest};
use crate::types::permission::ActionKey;

pub async fn get_metrics(req: HttpRequest, sc: Data<Arc<ServerContext>>) -> Response {
    authn_request!(&sc, req);

    match sc.db.with_transaction(|tx| tx.get_metrics()) {
        Ok(metrics) => Response::json(metrics.unwrap_or_else(DashboardMetrics::initial)),
        Err(e) => db_error!("get dashboard metrics", e),
    }
}

pub async fn patch_metrics(
    req: HttpRequest,
    body: Bytes,
    sc: Data<Arc<ServerContext>>,
) -> Response {
    let user = authn_request!(&sc, req);
    authorize!(&sc, user, ActionKey::EditMetrics);

    let patch: PatchMetricsRequest = parse_json!(body);
    if let Err(e) = patch.validate() {
        return Response::bad_request(format!("{e:#}"));
    }

    let result = sc.db.with_transaction(|tx| {
        let mut metrics = tx.get_metrics()?.unwrap_or_else(DashboardMetrics::initial);
        patch.apply(&mut metrics);
        tx.save_metrics(metrics)
    });
    match result {
        Ok(metrics) => {
            info!("'{}' updated dashboard metrics", user.email);
            Response::json(metrics)
        }
        Err(e) => db_error!("save dashboard metrics", e),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use serde_json::json;

    use crate::server::authz::config::{ActionOverride, AuthzConfig};
    use crate::server::authz::policy::GrantKind;
    use crate::server::context::ServerContext;
    use crate::server::handlers::tests::{
        as_user, grant, mock_context, seed_users, send, MEMBER, SECRETARY, TREASURER,
    };

    fn patch(user: &str) -> TestRequest {
        as_user(TestRequest::post().uri("/api/dashboard/metrics"), user)
            .set_json(json!({"total_members": " 21 "}))
    }

    #[actix_web::test]
    async fn test_metrics_fixed_editors() {
        let sc = mock_context();

        let req = as_user(TestRequest::get().uri("/api/dashboard/metrics"), MEMBER);
        let (_, body) = send(&sc, req).await;
        assert_eq!(body["data"]["total_members"], "17");
        assert_eq!(body["data"]["upcoming_events"], "3");
        assert_eq!(body["data"]["active_projects"], "5");

        // A store rule does not matter while the grant is fixed
        grant(&sc, "edit_metrics", &["member"]);
        let (status, _) = send(&sc, patch(MEMBER)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&sc, patch(SECRETARY)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total_members"], "21");
        assert_eq!(body["data"]["upcoming_events"], "3");

        let req = as_user(TestRequest::post().uri("/api/dashboard/metrics"), SECRETARY)
            .set_json(json!({}));
        let (status, _) = send(&sc, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_metrics_from_store() {
        let mut actions = BTreeMap::new();
        actions.insert(
            String::from("edit_metrics"),
            ActionOverride {
                grant: Some(GrantKind::Store),
                ..Default::default()
            },
        );
        let sc = ServerContext::new_test_with(&AuthzConfig { actions });
        seed_users(&sc);
        let sc = Arc::new(sc);

        let (status, _) = send(&sc, patch(SECRETARY)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        grant(&sc, "edit_metrics", &["treasurer"]);
        let (status, _) = send(&sc, patch(TREASURER)).await;
        assert_eq!(status, StatusCode::OK);
    }
}
