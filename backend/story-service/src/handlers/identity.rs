/// Identity handlers - DigiLocker OAuth2 verification endpoints
///
/// The callback mirrors the browser-facing flow: success and failure both
/// redirect back into the app rather than returning JSON.
use crate::error::{AppError, Result};
use crate::services::DigiLockerProvider;
use crate::store::UserStore;
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const CALLBACK_SUCCESS_LOCATION: &str = "/?verified=true";
const CALLBACK_FAILURE_LOCATION: &str = "/?error=digilocker_verification_failed";

#[derive(Deserialize)]
pub struct StartVerificationRequest {
    pub username: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartVerificationResponse {
    pub redirect_url: String,
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// Begin a verification attempt: issue the CSRF state and hand back the
/// provider authorization URL
pub async fn start_digilocker_verification(
    provider: web::Data<DigiLockerProvider>,
    req: web::Json<StartVerificationRequest>,
) -> Result<HttpResponse> {
    if req.username.trim().is_empty() {
        return Err(AppError::BadRequest("Username is required".into()));
    }

    let state = provider.issue_state(&req.username);
    let redirect_url = provider.authorization_url(&state);

    Ok(HttpResponse::Ok().json(StartVerificationResponse { redirect_url }))
}

/// Provider callback: verify state, exchange the code, mark the user
/// verified, and bounce back into the app
pub async fn digilocker_callback(
    provider: web::Data<DigiLockerProvider>,
    users: web::Data<Arc<UserStore>>,
    query: web::Query<CallbackQuery>,
) -> HttpResponse {
    let (code, state) = match (query.code.as_deref(), query.state.as_deref()) {
        (Some(code), Some(state)) => (code, state),
        _ => {
            tracing::warn!("DigiLocker callback missing code or state");
            return failure_redirect();
        }
    };

    let username = match provider.verify_state(state) {
        Ok(username) => username,
        Err(err) => {
            tracing::warn!(error = %err, "DigiLocker callback state rejected");
            return failure_redirect();
        }
    };

    match provider.exchange_code(code).await {
        Ok(identity) => {
            users.mark_verified(&username);
            tracing::info!(
                username,
                digilocker_id = %identity.digilocker_id,
                "DigiLocker verification completed"
            );
            HttpResponse::Found()
                .append_header((header::LOCATION, CALLBACK_SUCCESS_LOCATION))
                .finish()
        }
        Err(err) => {
            tracing::error!(error = %err, username, "DigiLocker verification failed");
            failure_redirect()
        }
    }
}

fn failure_redirect() -> HttpResponse {
    HttpResponse::Found()
        .append_header((header::LOCATION, CALLBACK_FAILURE_LOCATION))
        .finish()
}
