use std::sync::Arc;

use actix_web::web::{Bytes, Data};
use actix_web::HttpRequest;
use log::info;

use crate::server::context::ServerContext;
use crate::server::response::Response;
use crate::types::budget::{
    AllocateRequest, BudgetOverview, CreateForumRequest, RenameForumRequest, SetTotalRequest,
};
use crate::types::permission::ActionKey;

/// Outcome of a forum write that can fail on the caller's input.
enum ForumWrite<T> {
    Done(T),
    NotFound,
    NameTaken,
}

pub async fn get_budget(req: HttpRequest, sc: Data<Arc<ServerContext>>) -> Response {
    authn_request!(&sc, req);

    let result = sc.db.with_transaction(|tx| {
        let settings = tx.get_budget_settings()?;
        let allocations = tx.list_forum_budgets()?;
        Ok(BudgetOverview::build(settings, allocations))
    });
    match result {
        Ok(overview) => Response::json(overview),
        Err(e) => db_error!("get budget overview", e),
    }
}

/// `updated_by` is the session actor's name. Role and name fields in the body
/// are never consulted.
pub async fn set_total(req: HttpRequest, body: Bytes, sc: Data<Arc<ServerContext>>) -> Response {
    let user = authn_request!(&sc, req);
    authorize!(&sc, user, ActionKey::EditBudget);

    let set: SetTotalRequest = parse_json!(body);
    if let Err(e) = set.validate() {
        return Response::bad_request(format!("{e:#}"));
    }

    match sc
        .db
        .with_transaction(|tx| tx.save_budget_settings(set.total_amount, &user.name))
    {
        Ok(settings) => {
            info!("'{}' set total budget to {}", user.email, settings.total_amount);
            Response::json(settings)
        }
        Err(e) => db_error!("save budget settings", e),
    }
}

pub async fn allocate(req: HttpRequest, body: Bytes, sc: Data<Arc<ServerContext>>) -> Response {
    let user = authn_request!(&sc, req);
    authorize!(&sc, user, ActionKey::AllocateBudget);

    let alloc: AllocateRequest = parse_json!(body);
    if let Err(e) = alloc.validate() {
        return Response::bad_request(format!("{e:#}"));
    }

    let result = sc.db.with_transaction(|tx| {
        if !tx.update_forum_allocation(alloc.forum_id, alloc.amount)? {
            return Ok(None);
        }
        tx.get_forum_budget(alloc.forum_id)
    });
    match result {
        Ok(Some(forum)) => {
            info!(
                "'{}' allocated {} to forum '{}'",
                user.email, forum.allocated_amount, forum.forum_name
            );
            Response::json(forum)
        }
        Ok(None) => Response::not_found(),
        Err(e) => db_error!("update forum allocation", e),
    }
}

pub async fn create_forum(
    req: HttpRequest,
    body: Bytes,
    sc: Data<Arc<ServerContext>>,
) -> Response {
    let user = authn_request!(&sc, req);
    authorize!(&sc, user, ActionKey::ManageForums);

    let mut create: CreateForumRequest = parse_json!(body);
    if let Err(e) = create.validate() {
        return Response::bad_request(format!("{e:#}"));
    }

    let result = sc.db.with_transaction(|tx| {
        if tx.is_forum_name_exists(&create.name)? {
            return Ok(None);
        }
        tx.create_forum_budget(&create.name).map(Some)
    });
    match result {
        Ok(Some(forum)) => {
            info!("'{}' created forum '{}'", user.email, forum.forum_name);
            Response::json(forum)
        }
        Ok(None) => Response::bad_request(format!("forum '{}' already exists", create.name)),
        Err(e) => db_error!("create forum", e),
    }
}

pub async fn rename_forum(
    req: HttpRequest,
    body: Bytes,
    sc: Data<Arc<ServerContext>>,
) -> Response {
    let user = authn_request!(&sc, req);
    authorize!(&sc, user, ActionKey::ManageForums);

    let mut rename: RenameForumRequest = parse_json!(body);
    if let Err(e) = rename.validate() {
        return Response::bad_request(format!("{e:#}"));
    }

    let result = sc.db.with_transaction(|tx| {
        let forum = match tx.get_forum_budget(rename.id)? {
            Some(forum) => forum,
            None => return Ok(ForumWrite::NotFound),
        };
        if forum.forum_name == rename.name {
            return Ok(ForumWrite::Done(forum));
        }
        if tx.is_forum_name_exists(&rename.name)? {
            return Ok(ForumWrite::NameTaken);
        }
        tx.rename_forum_budget(rename.id, &rename.name)?;
        match tx.get_forum_budget(rename.id)? {
            Some(forum) => Ok(ForumWrite::Done(forum)),
            None => Ok(ForumWrite::NotFound),
        }
    });
    match result {
        Ok(ForumWrite::Done(forum)) => {
            info!("'{}' renamed forum {} to '{}'", user.email, forum.id, forum.forum_name);
            Response::json(forum)
        }
        Ok(ForumWrite::NotFound) => Response::not_found(),
        Ok(ForumWrite::NameTaken) => {
            Response::bad_request(format!("forum '{}' already exists", rename.name))
        }
        Err(e) => db_error!("rename forum", e),
    }
}
