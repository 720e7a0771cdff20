use std::sync::Arc;

use actix_web::web::Data;
use actix_web::HttpRequest;
use chrono::Local;
use log::error;

use crate::server::context::ServerContext;
use crate::server::response::Response;
use crate::types::healthz::HealthzResponse;

/// Unauthenticated. Reports server time so clients can check clock drift.
pub async fn get_healthz(req: HttpRequest, sc: Data<Arc<ServerContext>>) -> Response {
    let database = match sc.db.with_transaction(|tx| tx.get_metrics()) {
        Ok(_) => true,
        Err(e) => {
            error!("Health check read failed: {e:#}");
            false
        }
    };

    let local = Local::now();
    Response::json(HealthzResponse {
        now: local.timestamp() as u64,
        time_zone: format!("{}", local.offset()),
        client_ip: req.connection_info().peer_addr().map(|a| a.to_string()),
        version: Some(env!("ORGDASH_VERSION").to_string()),
        database,
    })
}
