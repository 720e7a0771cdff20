use std::sync::Arc;

use actix_web::cookie::{Cookie, SameSite};
use actix_web::web::{Bytes, Data};
use log::{error, info, warn};

use crate::server::context::{CookieSettings, ServerContext};
use crate::server::response::{self, Response};
use crate::types::user::{normalize_role, Credential, LoginRequest};

pub async fn login(body: Bytes, sc: Data<Arc<ServerContext>>) -> Response {
    let req: LoginRequest = parse_json!(body);
    let email = req.email.trim().to_lowercase();
    if email.is_empty() {
        return Response::bad_request("email is required");
    }
    if req.password.is_empty() {
        return Response::bad_request("password is required");
    }

    let record = match sc.db.with_transaction(|tx| tx.get_user(&email)) {
        Ok(Some(record)) => record,
        Ok(None) => {
            info!("Login for unknown account '{email}'");
            return Response::unauthenticated("Invalid email or password");
        }
        Err(e) => db_error!("get user record for login", e),
    };

    let cred = Credential {
        hash: record.hash,
        salt: record.salt,
    };
    if !cred.verify(&req.password) {
        warn!("Wrong password for '{email}'");
        return Response::unauthenticated("Invalid email or password");
    }
    if normalize_role(&record.role).is_empty() {
        warn!("Account '{email}' has no role, login rejected");
        return Response::unauthenticated("Account has no role");
    }

    let token = match sc.token_generator.generate_token(email) {
        Ok(token) => token,
        Err(e) => {
            error!("Failed to generate token: {e:#}");
            return Response::error(response::TOKEN_ERROR);
        }
    };
    info!("User '{}' logged in", token.user);

    let cookie = session_cookie(&sc.cookie, token.token.clone());
    Response::json(token).with_cookie(cookie)
}

pub async fn logout(sc: Data<Arc<ServerContext>>) -> Response {
    let mut cookie = session_cookie(&sc.cookie, String::new());
    cookie.make_removal();
    Response::ok().with_cookie(cookie)
}

fn session_cookie(settings: &CookieSettings, value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(settings.name.clone(), value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(settings.secure);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

#[cfg(test)]
mod tests {
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::test::{call_service, init_service, TestRequest};
    use actix_web::web::Data;
    use actix_web::App;
    use serde_json::json;

    use crate::server::handlers::configure;
    use crate::server::handlers::tests::{mock_context, send, VICE};

    #[actix_web::test]
    async fn test_login() {
        let sc = mock_context();

        let req = TestRequest::post()
            .uri("/login")
            .set_json(json!({"email": " Vice@Org.Test ", "password": "pw"}));
        let (status, body) = send(&sc, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["user"], VICE);
        assert_eq!(body["data"]["token"], format!("simple-token-{VICE}"));

        for payload in [
            json!({"email": VICE, "password": "nope"}),
            json!({"email": "ghost@org.test", "password": "pw"}),
        ] {
            let req = TestRequest::post().uri("/login").set_json(payload);
            let (status, _) = send(&sc, req).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }

        let req = TestRequest::post()
            .uri("/login")
            .set_json(json!({"email": "", "password": "pw"}));
        let (status, _) = send(&sc, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_session_cookie() {
        let sc = mock_context();
        let app = init_service(
            App::new()
                .app_data(Data::new(sc.clone()))
                .configure(configure),
        )
        .await;

        let req = TestRequest::post()
            .uri("/login")
            .set_json(json!({"email": VICE, "password": "pw"}))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == "orgdash_session")
            .unwrap()
            .into_owned();
        assert_eq!(cookie.http_only(), Some(true));

        // The cookie alone identifies the browser session
        let req = TestRequest::get()
            .uri("/api/user")
            .cookie(Cookie::new("orgdash_session", cookie.value().to_string()))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = TestRequest::post().uri("/logout").to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let removal = resp
            .response()
            .cookies()
            .find(|c| c.name() == "orgdash_session")
            .unwrap()
            .into_owned();
        assert_eq!(removal.value(), "");
    }
}
