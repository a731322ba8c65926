use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    web, HttpRequest, HttpResponse, Responder,
};
use tracing::instrument;

use crate::{
    entities::{
        envelope::ApiResponse,
        user::{LoginRequest, RegisterRequest, UpdateProfileRequest},
    },
    errors::AppError,
    middlewares::auth::extract_token,
    settings::AppConfig,
    use_cases::extractors::AuthClaims,
    utils::get_client_ip::get_client_ip,
    AppState,
};

fn auth_cookie(config: &AppConfig, value: String, max_age: CookieDuration) -> Cookie<'static> {
    Cookie::build(config.auth_cookie_name.clone(), value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.is_production())
        .max_age(max_age)
        .finish()
}

#[instrument(skip(state, user))]
pub async fn register(
    state: web::Data<AppState>,
    user: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let user = state.auth_handler.register(user.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(user).with_message("Account created")))
}

#[instrument(skip(req, state, credentials))]
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    credentials: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let client_ip = get_client_ip(&req, state.config.trust_x_forwarded_for);
    let response = state.auth_handler.login(credentials.into_inner(), &client_ip).await?;

    let lifetime = CookieDuration::seconds(state.auth_handler.jwt.expiration().num_seconds());
    let cookie = auth_cookie(&state.config, response.token.clone(), lifetime);

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::ok(response).with_message("Logged in")))
}

#[instrument(skip(claims, state), fields(sub = %claims.0.sub))]
pub async fn me(claims: AuthClaims, state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let user = state.auth_handler.me(&claims.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}

#[instrument(skip(claims, state, data), fields(sub = %claims.0.sub))]
pub async fn update_profile(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, AppError> {
    let user = state.auth_handler.update_profile(&claims.0, data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user).with_message("Profile updated")))
}

#[instrument(skip(req, state))]
pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let token = extract_token(&req, &state.config.auth_cookie_name);
    state.auth_handler.logout(token.as_deref()).await?;

    let cleared = auth_cookie(&state.config, String::new(), CookieDuration::ZERO);
    Ok(HttpResponse::Ok()
        .cookie(cleared)
        .json(ApiResponse::message("Logged out successfully")))
}
