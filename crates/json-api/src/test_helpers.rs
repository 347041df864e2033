//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use keyhold_app::{
    auth::{MockAuthService, SessionGrant},
    context::AppContext,
    domain::companies::records::{CompanyRecord, CompanyUuid},
};
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_COMPANY_UUID: CompanyUuid = CompanyUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_CLIENT_URL: &str = "http://client.example.com";

#[salvo::handler]
pub(crate) async fn inject_company(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_company_uuid(TEST_COMPANY_UUID);
    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn make_company(uuid: CompanyUuid) -> CompanyRecord {
    CompanyRecord {
        uuid,
        name: "Acme".to_string(),
        email: "ops@acme.test".to_string(),
        password_hash: Some("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string()),
        api_key: "ak_0123456789abcdef".to_string(),
        active: true,
        github_id: None,
        created_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_grant(uuid: CompanyUuid) -> SessionGrant {
    SessionGrant {
        company: make_company(uuid),
        token: "session.jwt.token".to_string(),
    }
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    State::from_app_context(
        AppContext {
            auth: Arc::new(auth),
        },
        TEST_CLIENT_URL,
    )
}

/// Route behind an already authenticated company.
pub(crate) fn auth_service(auth: MockAuthService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_auth(auth)))
            .hoop(inject_company)
            .push(route),
    )
}

/// Route with no authenticated company.
pub(crate) fn public_service(auth: MockAuthService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_auth(auth)))
            .push(route),
    )
}
