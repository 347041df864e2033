//! App Router

use salvo::{
    Router,
    cors::{Cors, CorsHandler},
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
};

use crate::{api_keys, auth, companies, healthcheck, settings};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(
            Router::with_path("api")
                .push(Router::with_path("register").post(auth::register::handler))
                .push(Router::with_path("login").post(auth::login::handler))
                .push(
                    Router::with_path("auth/github")
                        .get(auth::github::begin)
                        .push(Router::with_path("callback").get(auth::github::callback)),
                )
                .push(Router::with_path("api-keys/validate").post(api_keys::validate::handler))
                .push(authenticated_router()),
        )
}

fn authenticated_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(Router::with_path("dashboard").get(companies::dashboard::handler))
        .push(Router::with_path("api-keys").get(api_keys::show::handler))
        .push(Router::with_path("generate-api-key").post(api_keys::generate::handler))
        .push(
            Router::with_path("settings")
                .push(Router::with_path("password").put(settings::password::handler))
                .push(Router::with_path("profile").put(settings::profile::handler)),
        )
        .push(
            Router::with_path("companies")
                .get(companies::index::handler)
                .push(
                    Router::with_path("{id}/toggle-status")
                        .patch(companies::toggle_status::handler),
                ),
        )
}

/// Browser access for the client app only.
pub(crate) fn cors(client_origin: &str) -> CorsHandler {
    Cors::new()
        .allow_origin(client_origin)
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers(vec![AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
        .into_handler()
}
