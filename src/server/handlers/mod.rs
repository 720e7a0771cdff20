use actix_web::web::{self, Bytes};
use actix_web::HttpRequest;
use log::{debug, error, warn};
use serde::de::DeserializeOwned;

use crate::types::permission::ActionKey;

use super::authn::{AuthnResponse, AuthnUserInfo};
use super::context::ServerContext;
use super::response::{self, Response};

/// Resolves the session actor or returns 401.
macro_rules! authn_request {
    ($sc:expr, $req:expr) => {
        match $crate::server::handlers::authn_request_raw($sc, &$req) {
            Ok(user) => user,
            Err(resp) => return resp,
        }
    };
}

/// Returns 403 unless the actor may perform the action. Must run before the
/// body is looked at and before anything is written.
macro_rules! authorize {
    ($sc:expr, $user:expr, $action:expr) => {
        if let Err(resp) = $crate::server::handlers::authorize_raw($sc, &$user, $action) {
            return resp;
        }
    };
}

macro_rules! parse_json {
    ($body:expr) => {
        match $crate::server::handlers::parse_json_raw(&$body) {
            Ok(data) => data,
            Err(resp) => return resp,
        }
    };
}

macro_rules! parse_id {
    ($req:expr) => {
        match $crate::server::handlers::parse_id_raw(&$req) {
            Ok(id) => id,
            Err(resp) => return resp,
        }
    };
}

/// Logs a storage failure and maps it to a 500.
macro_rules! db_error {
    ($what:expr, $err:expr) => {{
        log::error!("Failed to {}: {:#}", $what, $err);
        return $crate::server::response::Response::error($crate::server::response::DATABASE_ERROR);
    }};
}

mod announcements;
mod budget;
mod events;
mod files;
mod folders;
mod healthz;
mod login;
mod members;
mod metrics;
mod permissions;
mod user;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/healthz", web::get().to(healthz::get_healthz))
        .route("/login", web::post().to(login::login))
        .route("/logout", web::post().to(login::logout))
        .service(
            web::scope("/api")
                .route("/user", web::get().to(user::whoami))
                .route("/cani/{action}", web::get().to(user::cani))
                .route("/heartbeat", web::post().to(user::heartbeat))
                .route("/permissions", web::get().to(permissions::list_rules))
                .route("/permissions", web::post().to(permissions::upsert_rule))
                .route("/events", web::get().to(events::list_events))
                .route("/events", web::post().to(events::create_event))
                .route("/events/{id}", web::delete().to(events::delete_event))
                .route("/members", web::get().to(members::list_members))
                .route("/members", web::post().to(members::add_member))
                .route("/dashboard/metrics", web::get().to(metrics::get_metrics))
                .route("/dashboard/metrics", web::post().to(metrics::patch_metrics))
                .route("/budget", web::get().to(budget::get_budget))
                .route("/budget", web::post().to(budget::set_total))
                .route("/budget/allocate", web::post().to(budget::allocate))
                .route("/budget/forum", web::post().to(budget::create_forum))
                .route("/budget/forum", web::put().to(budget::rename_forum))
                .route("/folders", web::get().to(folders::list_folders))
                .route("/folders", web::post().to(folders::create_folder))
                .route("/folders/{id}", web::get().to(folders::get_folder))
                .route("/folders/{id}", web::put().to(folders::update_folder))
                .route("/folders/{id}", web::delete().to(folders::delete_folder))
                .route("/files", web::get().to(files::list_files))
                .route("/files", web::post().to(files::register_file))
                .route("/files/{id}", web::put().to(files::move_file))
                .route("/files/{id}", web::delete().to(files::delete_file))
                .route("/announcements", web::get().to(announcements::list_announcements))
                .route("/announcements", web::post().to(announcements::post_announcement))
                .route(
                    "/announcements/{id}",
                    web::delete().to(announcements::delete_announcement),
                ),
        );
}

pub fn authn_request_raw(
    sc: &ServerContext,
    req: &HttpRequest,
) -> Result<AuthnUserInfo, Response> {
    debug!("- {} {}, peer: {:?}", req.method(), req.path(), req.peer_addr());
    match sc.authn.authenticate_request(req) {
        Ok(AuthnResponse::Ok(user)) => Ok(user),
        Ok(AuthnResponse::Continue) => Err(Response::unauthenticated("Missing session")),
        Ok(AuthnResponse::Unauthenticated) => {
            Err(Response::unauthenticated("Invalid or expired session"))
        }
        Err(e) => {
            error!("Authentication failed: {e:#}");
            Err(Response::error(response::AUTHN_ERROR))
        }
    }
}

pub fn authorize_raw(
    sc: &ServerContext,
    user: &AuthnUserInfo,
    action: ActionKey,
) -> Result<(), Response> {
    match sc.authz.is_allowed(&user.role, action) {
        Ok(true) => Ok(()),
        Ok(false) => {
            warn!("Denied '{action}' for '{}' (role '{}')", user.email, user.role);
            Err(Response::forbidden())
        }
        Err(e) => {
            error!("Access decision for '{action}' failed: {e:#}");
            Err(Response::error(response::DATABASE_ERROR))
        }
    }
}

pub fn parse_json_raw<T: DeserializeOwned>(body: &Bytes) -> Result<T, Response> {
    if body.is_empty() {
        return Err(Response::bad_request("JSON body is required"));
    }
    serde_json::from_slice(body).map_err(|e| Response::bad_request(format!("invalid JSON: {e}")))
}

pub fn parse_id_raw(req: &HttpRequest) -> Result<u64, Response> {
    let id = req.match_info().get("id").unwrap_or_default();
    match id.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Response::bad_request(format!("invalid id '{id}'"))),
    }
}
