use std::sync::Arc;

use actix_web::web::{Bytes, Data};
use actix_web::HttpRequest;
use log::info;

use crate::server::context::ServerContext;
use crate::server::response::Response;
use crate::types::file::{MoveFileRequest, RegisterFileRequest};
use crate::types::permission::ActionKey;

enum FileWrite<T> {
    Done(T),
    NotFound,
    NoFolder,
}

pub async fn list_files(req: HttpRequest, sc: Data<Arc<ServerContext>>) -> Response {
    authn_request!(&sc, req);

    match sc.db.with_transaction(|tx| tx.list_files()) {
        Ok(files) => Response::json(files),
        Err(e) => db_error!("list files", e),
    }
}

/// Records metadata of a file already placed in storage.
pub async fn register_file(
    req: HttpRequest,
    body: Bytes,
    sc: Data<Arc<ServerContext>>,
) -> Response {
    let user = authn_request!(&sc, req);
    authorize!(&sc, user, ActionKey::ManageFiles);

    let register: RegisterFileRequest = parse_json!(body);
    let file = match register.into_file(&user.name) {
        Ok(file) => file,
        Err(e) => return Response::bad_request(format!("{e:#}")),
    };

    let result = sc.db.with_transaction(|tx| {
        if let Some(folder_id) = file.folder_id {
            if tx.get_folder(folder_id)?.is_none() {
                return Ok(FileWrite::NoFolder);
            }
        }
        Ok(FileWrite::Done(tx.create_file(file)?))
    });
    match result {
        Ok(FileWrite::Done(file)) => {
            info!("'{}' registered file {} '{}'", user.email, file.id, file.original_name);
            Response::json(file)
        }
        Ok(FileWrite::NotFound) => Response::not_found(),
        Ok(FileWrite::NoFolder) => Response::bad_request("folder does not exist"),
        Err(e) => db_error!("register file", e),
    }
}

pub async fn move_file(req: HttpRequest, body: Bytes, sc: Data<Arc<ServerContext>>) -> Response {
    let user = authn_request!(&sc, req);
    authorize!(&sc, user, ActionKey::ManageFiles);
    let id = parse_id!(req);

    let mv: MoveFileRequest = parse_json!(body);

    let result = sc.db.with_transaction(|tx| {
        if let Some(folder_id) = mv.folder_id {
            if tx.get_folder(folder_id)?.is_none() {
                return Ok(FileWrite::NoFolder);
            }
        }
        if !tx.move_file(id, mv.folder_id)? {
            return Ok(FileWrite::NotFound);
        }
        match tx.get_file(id)? {
            Some(file) => Ok(FileWrite::Done(file)),
            None => Ok(FileWrite::NotFound),
        }
    });
    match result {
        Ok(FileWrite::Done(file)) => Response::json(file),
        Ok(FileWrite::NotFound) => Response::not_found(),
        Ok(FileWrite::NoFolder) => Response::bad_request("folder does not exist"),
        Err(e) => db_error!("move file", e),
    }
}

pub async fn delete_file(req: HttpRequest, sc: Data<Arc<ServerContext>>) -> Response {
    let user = authn_request!(&sc, req);
    authorize!(&sc, user, ActionKey::ManageFiles);
    let id = parse_id!(req);

    match sc.db.with_transaction(|tx| tx.delete_file(id)) {
        Ok(true) => {
            info!("'{}' deleted file {id}", user.email);
            Response::ok()
        }
        Ok(false) => Response::not_found(),
        Err(e) => db_error!("delete file", e),
    }
}
