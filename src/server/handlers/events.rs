use std::sync::Arc;

use actix_web::web::{Bytes, Data};
use actix_web::HttpRequest;
use log::info;

use crate::server::context::ServerContext;
use crate::server::response::Response;
use crate::types::event::CreateEventRequest;
use crate::types::permission::ActionKey;

pub async fn list_events(req: HttpRequest, sc: Data<Arc<ServerContext>>) -> Response {
    authn_request!(&sc, req);

    match sc.db.with_transaction(|tx| tx.list_events()) {
        Ok(events) => Response::json(events),
        Err(e) => db_error!("list events", e),
    }
}

pub async fn create_event(
    req: HttpRequest,
    body: Bytes,
    sc: Data<Arc<ServerContext>>,
) -> Response {
    let user = authn_request!(&sc, req);
    authorize!(&sc, user, ActionKey::CreateEvent);

    let create: CreateEventRequest = parse_json!(body);
    let event = match create.into_event() {
        Ok(event) => event,
        Err(e) => return Response::bad_request(format!("{e:#}")),
    };

    match sc.db.with_transaction(|tx| tx.create_event(event)) {
        Ok(event) => {
            info!("'{}' created event {} '{}'", user.email, event.id, event.title);
            Response::json(event)
        }
        Err(e) => db_error!("create event", e),
    }
}

pub async fn delete_event(req: HttpRequest, sc: Data<Arc<ServerContext>>) -> Response {
    let user = authn_request!(&sc, req);
    authorize!(&sc, user, ActionKey::DeleteEvents);
    let id = parse_id!(req);

    match sc.db.with_transaction(|tx| tx.delete_event(id)) {
        Ok(true) => {
            info!("'{}' deleted event {id}", user.email);
            Response::ok()
        }
        Ok(false) => Response::not_found(),
        Err(e) => db_error!("delete event", e),
    }
}
