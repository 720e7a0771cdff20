use std::sync::Arc;

use actix_web::web::{Bytes, Data};
use actix_web::HttpRequest;
use log::info;

use crate::server::context::ServerContext;
use crate::server::response::Response;
use crate::types::announcement::PostAnnouncementRequest;
use crate::types::permission::ActionKey;

pub async fn list_announcements(req: HttpRequest, sc: Data<Arc<ServerContext>>) -> Response {
    authn_request!(&sc, req);

    match sc.db.with_transaction(|tx| tx.list_announcements()) {
        Ok(items) => Response::json(items),
        Err(e) => db_error!("list announcements", e),
    }
}

pub async fn post_announcement(
    req: HttpRequest,
    body: Bytes,
    sc: Data<Arc<ServerContext>>,
) -> Response {
    let user = authn_request!(&sc, req);
    authorize!(&sc, user, ActionKey::PostAnnouncements);

    let post: PostAnnouncementRequest = parse_json!(body);
    let item = match post.into_announcement(&user.name) {
        Ok(item) => item,
        Err(e) => return Response::bad_request(format!("{e:#}")),
    };

    match sc.db.with_transaction(|tx| tx.create_announcement(item)) {
        Ok(item) => {
            info!("'{}' posted announcement {}", user.email, item.id);
            Response::json(item)
        }
        Err(e) => db_error!("post announcement", e),
    }
}

pub async fn delete_announcement(req: HttpRequest, sc: Data<Arc<ServerContext>>) -> Response {
    let user = authn_request!(&sc, req);
    authorize!(&sc, user, ActionKey::DeleteAnnouncements);
    let id = parse_id!(req);

    match sc.db.with_transaction(|tx| tx.delete_announcement(id)) {
        Ok(true) => {
            info!("'{}' deleted announcement {id}", user.email);
            Response::ok()
        }
        Ok(false) => Response::not_found(),
        Err(e) => db_error!("delete announcement", e),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use serde_json::json;

    use crate::server::handlers::tests::{as_user, mock_context, send, CHAIR, MEMBER};

    #[actix_web::test]
    async fn test_announcements() {
        let sc = mock_context();

        let req = as_user(TestRequest::post().uri("/api/announcements"), MEMBER)
            .set_json(json!({"title": "Dues", "content": "Due Friday", "user_role": "chair"}));
        let (status, body) = send(&sc, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["author"], "Max");
        assert_eq!(body["data"]["priority"], "normal");
        let first = body["data"]["id"].as_u64().unwrap();

        let req = as_user(TestRequest::post().uri("/api/announcements"), CHAIR)
            .set_json(json!({"title": "Vote", "content": "Tonight", "priority": "urgent"}));
        let (status, _) = send(&sc, req).await;
        assert_eq!(status, StatusCode::OK);

        let req = as_user(TestRequest::post().uri("/api/announcements"), CHAIR)
            .set_json(json!({"title": "Vote", "content": "Tonight", "priority": "meh"}));
        let (status, _) = send(&sc, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let req = as_user(TestRequest::get().uri("/api/announcements"), MEMBER);
        let (_, body) = send(&sc, req).await;
        let items = body["data"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["title"], "Vote");

        let req = as_user(
            TestRequest::delete().uri(&format!("/api/announcements/{first}")),
            MEMBER,
        );
        let (status, _) = send(&sc, req).await;
        assert_eq!(status, StatusCode::OK);
    }
}
