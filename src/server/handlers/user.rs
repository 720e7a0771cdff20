use std::sync::Arc;

use actix_web::web::Data;
use actix_web::HttpRequest;
use log::error;

use crate::server::context::ServerContext;
use crate::server::response::{self, Response};
use crate::time::current_timestamp;
use crate::types::permission::ActionKey;
use crate::types::user::{CaniResponse, WhoamiResponse};

pub async fn whoami(req: HttpRequest, sc: Data<Arc<ServerContext>>) -> Response {
    let user = authn_request!(&sc, req);
    Response::json(WhoamiResponse {
        name: user.name,
        email: user.email,
        role: user.role,
    })
}

/// Lets the UI hide controls the actor cannot use. Endpoints still decide on
/// their own.
pub async fn cani(req: HttpRequest, sc: Data<Arc<ServerContext>>) -> Response {
    let user = authn_request!(&sc, req);

    let action = req.match_info().get("action").unwrap_or_default();
    let action: ActionKey = match action.parse() {
        Ok(action) => action,
        Err(e) => return Response::bad_request(format!("{e}")),
    };

    match sc.authz.is_allowed(&user.role, action) {
        Ok(allow) => Response::json(CaniResponse { allow }),
        Err(e) => {
            error!("Access decision for cani '{action}' failed: {e:#}");
            Response::error(response::DATABASE_ERROR)
        }
    }
}

pub async fn heartbeat(req: HttpRequest, sc: Data<Arc<ServerContext>>) -> Response {
    let user = authn_request!(&sc, req);

    let now = current_timestamp();
    match sc
        .db
        .with_transaction(|tx| tx.update_user_last_seen(&user.email, now))
    {
        Ok(()) => Response::ok(),
        Err(e) => db_error!("record heartbeat", e),
    }
}
