use std::sync::Arc;

use actix_web::web::{Bytes, Data};
use actix_web::HttpRequest;
use log::info;

use crate::server::context::ServerContext;
use crate::server::response::Response;
use crate::types::folder::{CreateFolderRequest, Folder, UpdateFolderRequest, DEFAULT_FOLDER_COLOR};
use crate::types::permission::ActionKey;

pub async fn list_folders(req: HttpRequest, sc: Data<Arc<ServerContext>>) -> Response {
    authn_request!(&sc, req);

    match sc.db.with_transaction(|tx| tx.list_folders()) {
        Ok(folders) => Response::json(folders),
        Err(e) => db_error!("list folders", e),
    }
}

pub async fn get_folder(req: HttpRequest, sc: Data<Arc<ServerContext>>) -> Response {
    authn_request!(&sc, req);
    let id = parse_id!(req);

    match sc.db.with_transaction(|tx| tx.get_folder(id)) {
        Ok(Some(folder)) => Response::json(folder),
        Ok(None) => Response::not_found(),
        Err(e) => db_error!("get folder", e),
    }
}

pub async fn create_folder(
    req: HttpRequest,
    body: Bytes,
    sc: Data<Arc<ServerContext>>,
) -> Response {
    let user = authn_request!(&sc, req);
    authorize!(&sc, user, ActionKey::ManageFolders);

    let mut create: CreateFolderRequest = parse_json!(body);
    if let Err(e) = create.validate() {
        return Response::bad_request(format!("{e:#}"));
    }

    let folder = Folder {
        id: 0,
        name: create.name,
        color: create
            .color
            .unwrap_or_else(|| String::from(DEFAULT_FOLDER_COLOR)),
        parent_id: create.parent_id,
        created_by: user.name.clone(),
        create_time: 0,
    };
    let result = sc.db.with_transaction(|tx| {
        if let Some(parent_id) = folder.parent_id {
            if tx.get_folder(parent_id)?.is_none() {
                return Ok(None);
            }
        }
        tx.create_folder(folder).map(Some)
    });
    match result {
        Ok(Some(folder)) => {
            info!("'{}' created folder {} '{}'", user.email, folder.id, folder.name);
            Response::json(folder)
        }
        Ok(None) => Response::bad_request("parent folder does not exist"),
        Err(e) => db_error!("create folder", e),
    }
}

pub async fn update_folder(
    req: HttpRequest,
    body: Bytes,
    sc: Data<Arc<ServerContext>>,
) -> Response {
    let user = authn_request!(&sc, req);
    authorize!(&sc, user, ActionKey::ManageFolders);
    let id = parse_id!(req);

    let mut update: UpdateFolderRequest = parse_json!(body);
    if let Err(e) = update.validate() {
        return Response::bad_request(format!("{e:#}"));
    }

    let result = sc.db.with_transaction(|tx| {
        let mut folder = match tx.get_folder(id)? {
            Some(folder) => folder,
            None => return Ok(None),
        };
        update.apply(&mut folder);
        tx.update_folder(&folder)?;
        Ok(Some(folder))
    });
    match result {
        Ok(Some(folder)) => Response::json(folder),
        Ok(None) => Response::not_found(),
        Err(e) => db_error!("update folder", e),
    }
}

pub async fn delete_folder(req: HttpRequest, sc: Data<Arc<ServerContext>>) -> Response {
    let user = authn_request!(&sc, req);
    authorize!(&sc, user, ActionKey::ManageFolders);
    let id = parse_id!(req);

    match sc.db.with_transaction(|tx| tx.delete_folder(id)) {
        Ok(true) => {
            info!("'{}' deleted folder {id}", user.email);
            Response::ok()
        }
        Ok(false) => Response::not_found(),
        Err(e) => db_error!("delete folder", e),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use serde_json::json;

    use crate::server::handlers::tests::{as_user, mock_context, send, MEMBER, SECRETARY};

    #[actix_web::test]
    async fn test_folder_lifecycle() {
        let sc = mock_context();

        let req = as_user(TestRequest::post().uri("/api/folders"), MEMBER)
            .set_json(json!({"name": "Minutes"}));
        let (status, body) = send(&sc, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["color"], "#3B82F6");
        assert_eq!(body["data"]["created_by"], "Max");
        let parent = body["data"]["id"].as_u64().unwrap();

        let req = as_user(TestRequest::post().uri("/api/folders"), MEMBER)
            .set_json(json!({"name": "2026", "color": "#a1b2c3", "parent_id": parent}));
        let (status, body) = send(&sc, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["color"], "#A1B2C3");
        let child = body["data"]["id"].as_u64().unwrap();

        let req = as_user(TestRequest::post().uri("/api/folders"), MEMBER)
            .set_json(json!({"name": "Orphan", "parent_id": 999}));
        let (status, _) = send(&sc, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let req = as_user(TestRequest::put().uri(&format!("/api/folders/{child}")), SECRETARY)
            .set_json(json!({"name": "Year 2026"}));
        let (status, body) = send(&sc, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Year 2026");

        let req = as_user(TestRequest::delete().uri(&format!("/api/folders/{parent}")), MEMBER);
        let (status, _) = send(&sc, req).await;
        assert_eq!(status, StatusCode::OK);

        let req = as_user(TestRequest::get().uri(&format!("/api/folders/{child}")), MEMBER);
        let (status, body) = send(&sc, req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["parent_id"].is_null());

        let req = as_user(TestRequest::get().uri(&format!("/api/folders/{parent}")), MEMBER);
        let (status, _) = send(&sc, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
