use std::sync::Arc;

use actix_web::web::{Bytes, Data};
use actix_web::HttpRequest;
use log::{info, warn};

use crate::server::context::ServerContext;
use crate::server::response::Response;
use crate::types::permission::{ActionKey, PermissionRule, UpsertRuleRequest};

pub async fn list_rules(req: HttpRequest, sc: Data<Arc<ServerContext>>) -> Response {
    authn_request!(&sc, req);

    match sc.db.with_transaction(|tx| tx.list_permissions()) {
        Ok(rules) => Response::json(rules),
        Err(e) => db_error!("list permission rules", e),
    }
}

/// Replaces the allowed roles of one action. Only the bypass roles of
/// `manage_permissions` get here, and that action itself is never writable.
pub async fn upsert_rule(
    req: HttpRequest,
    body: Bytes,
    sc: Data<Arc<ServerContext>>,
) -> Response {
    let user = authn_request!(&sc, req);
    authorize!(&sc, user, ActionKey::ManagePermissions);

    let upsert: UpsertRuleRequest = parse_json!(body);
    let action: ActionKey = match upsert.action_key.parse() {
        Ok(action) => action,
        Err(e) => return Response::bad_request(format!("{e}")),
    };
    if action == ActionKey::ManagePermissions {
        return Response::bad_request("manage_permissions cannot be granted");
    }

    match sc.authz.policy(action) {
        Ok(policy) if !policy.is_configurable() => {
            warn!("Rule for '{action}' is stored but not used, its grant is fixed by config")
        }
        Ok(_) => {}
        Err(e) => return Response::bad_request(format!("{e:#}")),
    }

    let rule = PermissionRule::new(action.as_str(), &upsert.allowed_roles);
    match sc.db.with_transaction(|tx| tx.upsert_permission(rule)) {
        Ok(rule) => {
            info!(
                "'{}' set roles of '{action}' to {:?}",
                user.email, rule.allowed_roles
            );
            Response::json(rule)
        }
        Err(e) => db_error!("upsert permission rule", e),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use serde_json::json;

    use crate::server::handlers::tests::{
        as_user, grant, mock_context, send, ADMIN, CHAIR, MEMBER, VICE,
    };

    fn upsert(user: &str, key: &str, roles: &[&str]) -> TestRequest {
        as_user(TestRequest::post().uri("/api/permissions"), user)
            .set_json(json!({"action_key": key, "allowed_roles": roles}))
    }

    fn stored_roles(sc: &crate::server::context::ServerContext, key: &str) -> Option<Vec<String>> {
        sc.db
            .with_transaction(|tx| tx.get_permission(key))
            .unwrap()
            .map(|rule| rule.allowed_roles.into_iter().collect())
    }

    #[actix_web::test]
    async fn test_list_rules() {
        let sc = mock_context();
        grant(&sc, "delete_events", &["vice chair"]);
        grant(&sc, "create_event", &["secretary", "member"]);

        let req = as_user(TestRequest::get().uri("/api/permissions"), MEMBER);
        let (status, body) = send(&sc, req).await;
        assert_eq!(status, StatusCode::OK);
        let rules = body["data"].as_array().unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0]["action_key"], "create_event");
        assert_eq!(rules[0]["allowed_roles"], json!(["member", "secretary"]));
    }

    #[actix_web::test]
    async fn test_upsert_rule() {
        let sc = mock_context();

        let (status, body) = send(&sc, upsert(CHAIR, "delete_events", &[" Vice Chair "])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["allowed_roles"], json!(["vice chair"]));

        // Full replace, not a merge
        let (status, _) = send(&sc, upsert(ADMIN, "delete_events", &["secretary"])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            stored_roles(&sc, "delete_events"),
            Some(vec![String::from("secretary")])
        );
    }

    #[actix_web::test]
    async fn test_upsert_not_delegatable() {
        let sc = mock_context();
        grant(&sc, "manage_permissions", &["vice chair", "member"]);
        grant(&sc, "create_event", &["member"]);

        for user in [VICE, MEMBER] {
            let (status, body) = send(&sc, upsert(user, "create_event", &["vice chair"])).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(body["message"], "Access denied");
        }
        assert_eq!(
            stored_roles(&sc, "create_event"),
            Some(vec![String::from("member")])
        );
    }

    #[actix_web::test]
    async fn test_upsert_invalid() {
        let sc = mock_context();

        let (status, _) = send(&sc, upsert(CHAIR, "launch_rockets", &["chair"])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(stored_roles(&sc, "launch_rockets"), None);

        let (status, _) = send(&sc, upsert(CHAIR, "manage_permissions", &["member"])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(stored_roles(&sc, "manage_permissions"), None);

        let req = as_user(TestRequest::post().uri("/api/permissions"), CHAIR)
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json");
        let (status, _) = send(&sc, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // Denied callers are rejected before the body is read
        let (status, _) = send(&sc, upsert(MEMBER, "launch_rockets", &[])).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
