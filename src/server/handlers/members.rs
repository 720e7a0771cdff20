use std::collections::BTreeSet;
use std::sync::Arc;

use actix_web::web::{Bytes, Data};
use actix_web::HttpRequest;
use log::{error, info, warn};

use crate::server::context::ServerContext;
use crate::server::db::UserRecord;
use crate::server::response::{self, Response};
use crate::time::{current_timestamp, today};
use crate::types::member::{presence_status, AddMemberRequest, Member, STATUS_OFFLINE};
use crate::types::permission::ActionKey;
use crate::types::user::{normalize_role, Credential};

/// Everyone on the roster except the caller, with presence from heartbeats.
pub async fn list_members(req: HttpRequest, sc: Data<Arc<ServerContext>>) -> Response {
    let user = authn_request!(&sc, req);

    let records = match sc.db.with_transaction(|tx| tx.list_members()) {
        Ok(records) => records,
        Err(e) => db_error!("list members", e),
    };

    let now = current_timestamp();
    let members: Vec<Member> = records
        .into_iter()
        .filter(|record| record.member.email != user.email)
        .map(|record| {
            let mut member = record.member;
            member.status = presence_status(record.last_seen, now).to_string();
            member
        })
        .collect();
    Response::json(members)
}

/// Creates the login account and the roster entry in one transaction.
pub async fn add_member(
    req: HttpRequest,
    body: Bytes,
    sc: Data<Arc<ServerContext>>,
) -> Response {
    let user = authn_request!(&sc, req);
    authorize!(&sc, user, ActionKey::AddMembers);

    let mut add: AddMemberRequest = parse_json!(body);
    if let Err(e) = add.validate() {
        return Response::bad_request(format!("{e:#}"));
    }
    if let Err(resp) = check_role_escalation(&sc, &user.role, &add.role) {
        warn!(
            "'{}' (role '{}') tried to add an account with role '{}'",
            user.email, user.role, add.role
        );
        return resp;
    }

    let result = sc.db.with_transaction(|tx| {
        if tx.is_user_exists(&add.email)? {
            return Ok(None);
        }

        let cred = Credential::generate(&add.password);
        tx.create_user(&UserRecord {
            email: add.email.clone(),
            name: add.name.clone(),
            role: add.role.clone(),
            hash: cred.hash,
            salt: cred.salt,
            last_seen: 0,
            create_time: current_timestamp(),
        })?;

        let member = tx.create_member(Member {
            id: 0,
            name: add.name.clone(),
            email: add.email.clone(),
            phone: add.phone.clone(),
            status: String::from(STATUS_OFFLINE),
            joined_date: today(),
            create_time: 0,
        })?;
        Ok(Some(member))
    });

    match result {
        Ok(Some(member)) => {
            info!(
                "'{}' added member '{}' with role '{}'",
                user.email, member.email, add.role
            );
            Response::json(member)
        }
        Ok(None) => Response::bad_request(format!("email '{}' is already registered", add.email)),
        Err(e) => db_error!("add member", e),
    }
}

/// Superuser roles can only be handed out by a superuser. Otherwise a delegated
/// `add_members` grant could mint an account that edits permissions.
fn check_role_escalation(sc: &ServerContext, actor_role: &str, new_role: &str) -> Result<(), Response> {
    let mut superusers = BTreeSet::new();
    for action in [ActionKey::ManagePermissions, ActionKey::AddMembers] {
        match sc.authz.policy(action) {
            Ok(policy) => superusers.extend(policy.bypass.iter().cloned()),
            Err(e) => {
                error!("Get policy for '{action}' failed: {e:#}");
                return Err(Response::error(response::AUTHZ_ERROR));
            }
        }
    }

    if superusers.contains(new_role) && !superusers.contains(&normalize_role(actor_role)) {
        return Err(Response::forbidden());
    }
    Ok(())
}
