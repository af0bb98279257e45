//! Sign in, sign out and registration pages.

use async_trait::async_trait;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde_json::json;

use crate::auth::{issue_session_token, SESSION_COOKIE};
use crate::config::SecurityConfig;
use crate::database::models::{user::PasswordError, User};
use crate::error::AppError;
use crate::types::Role;
use crate::views::{redirect_if_signed_in, FlashMessage, View, ViewRequest, ViewResponse, ViewResult};

const LOGIN_TEMPLATE: &str = "pages/login.html";
const REGISTER_TEMPLATE: &str = "pages/register.html";

fn session_cookie(security: &SecurityConfig, token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(security.secure_cookies)
        .same_site(SameSite::Lax)
        .build()
}

pub struct Login;

#[async_trait]
impl View for Login {
    const NAME: &'static str = "Login";
    const ROUTE: Option<&'static str> = Some("/login");

    async fn get(&self, req: ViewRequest) -> ViewResult {
        if let Some(redirect) = redirect_if_signed_in(req.user.as_ref()) {
            return Ok(redirect);
        }
        Ok(ViewResponse::render(LOGIN_TEMPLATE, json!({})))
    }

    async fn post(&self, req: ViewRequest) -> ViewResult {
        let form = req.form();
        let username = form.get_or_empty("username");
        let password = form.get_or_empty("password");

        let user = match User::get_by_username(req.state.db.users.as_ref(), username).await? {
            Some(user) if user.check_password(password) => user,
            _ => {
                tracing::info!("Failed sign in for {:?}", username);
                return Ok(ViewResponse::render(LOGIN_TEMPLATE, json!({}))
                    .flash(FlashMessage::danger("Incorrect username or password")));
            }
        };

        let Some(user_id) = user.id else {
            return Err(AppError::Internal(anyhow::anyhow!("stored user {} has no id", user.username)));
        };
        let token = issue_session_token(&req.state.config.security, user_id)?;
        tracing::info!(user_id, "Signed in {}", user.username);

        Ok(ViewResponse::redirect("/")
            .add_cookie(session_cookie(&req.state.config.security, token))
            .flash(FlashMessage::success("Successfully logged in")))
    }
}

pub struct Logout;

#[async_trait]
impl View for Logout {
    const NAME: &'static str = "Logout";
    const ROUTE: Option<&'static str> = Some("/logout");

    async fn get(&self, _req: ViewRequest) -> ViewResult {
        Ok(ViewResponse::redirect("/")
            .remove_cookie(SESSION_COOKIE)
            .flash(FlashMessage::success("You have been logged out")))
    }
}

pub struct Register;

#[async_trait]
impl View for Register {
    const NAME: &'static str = "Register";
    const ROUTE: Option<&'static str> = Some("/register");

    async fn get(&self, req: ViewRequest) -> ViewResult {
        if let Some(redirect) = redirect_if_signed_in(req.user.as_ref()) {
            return Ok(redirect);
        }
        Ok(ViewResponse::render(REGISTER_TEMPLATE, json!({})))
    }

    async fn post(&self, req: ViewRequest) -> ViewResult {
        let form = req.form();
        let username = form.get_or_empty("username");
        let password = form.get_or_empty("password");
        let email = form.get_or_empty("email").to_lowercase();

        let users = req.state.db.users.as_ref();
        let mut errors = vec![];

        let username_taken = User::get_by_username(users, username).await?.is_some();
        if username_taken {
            errors.push(FlashMessage::danger("That username is taken"));
        }

        let email_taken = User::get_by_email(users, &email).await?.is_some();
        if email_taken {
            errors.push(FlashMessage::danger("That email is taken"));
        }

        if !User::validate_password(password) {
            errors.push(FlashMessage::danger(PasswordError::TooShort.to_string()));
        }

        if !errors.is_empty() {
            let context = json!({
                "oldusername": username,
                "oldemail": email,
                "username_taken": username_taken,
                "email_taken": email_taken,
            });
            return Ok(ViewResponse::render(REGISTER_TEMPLATE, context).flashes(errors));
        }

        let user = User::new(&email, username, password, Role::User).map_err(|e| AppError::Internal(e.into()))?;
        let user = users.save(user).await?;
        tracing::info!(user_id = user.id, "Registered {}", user.username);

        Ok(ViewResponse::redirect("/").flash(FlashMessage::success("Successfully registered, you may now log in")))
    }
}
