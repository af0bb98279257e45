use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::database::models::User;
use crate::error::AppError;
use crate::state::AppState;
use crate::views::flash::{self, FlashMessage};

pub const NOT_FOUND_TEMPLATE: &str = "pages/404.html";

#[derive(Debug)]
enum Body {
    Render { template: String, context: Map<String, Value> },
    Redirect(String),
    File { path: PathBuf, content_type: &'static str },
    NotFound,
    MethodNotAllowed,
}

#[derive(Debug)]
enum CookieChange {
    Add(Cookie<'static>),
    Remove(&'static str),
}

/// What a page view answers. Flash messages and cookie changes ride along
/// and are applied when the response is finished.
#[derive(Debug)]
pub struct ViewResponse {
    body: Body,
    status: StatusCode,
    flashes: Vec<FlashMessage>,
    cookies: Vec<CookieChange>,
}

impl ViewResponse {
    fn new(body: Body, status: StatusCode) -> Self {
        Self { body, status, flashes: vec![], cookies: vec![] }
    }

    /// A non-object context is placed under `data`
    pub fn render(template: impl Into<String>, context: Value) -> Self {
        let context = match context {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        Self::new(Body::Render { template: template.into(), context }, StatusCode::OK)
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Self::new(Body::Redirect(location.into()), StatusCode::SEE_OTHER)
    }

    pub fn file(path: impl Into<PathBuf>, content_type: &'static str) -> Self {
        Self::new(Body::File { path: path.into(), content_type }, StatusCode::OK)
    }

    pub fn not_found() -> Self {
        Self::new(Body::NotFound, StatusCode::NOT_FOUND)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(Body::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED)
    }

    pub fn flash(mut self, message: FlashMessage) -> Self {
        self.flashes.push(message);
        self
    }

    pub fn flashes(mut self, messages: impl IntoIterator<Item = FlashMessage>) -> Self {
        self.flashes.extend(messages);
        self
    }

    pub fn add_cookie(mut self, cookie: Cookie<'static>) -> Self {
        self.cookies.push(CookieChange::Add(cookie));
        self
    }

    pub fn remove_cookie(mut self, name: &'static str) -> Self {
        self.cookies.push(CookieChange::Remove(name));
        self
    }

    /// Applies cookies and flashes, then renders or redirects.
    ///
    /// Rendered pages consume every pending message; redirects and files
    /// carry them forward in the flash cookie.
    pub(crate) async fn finish(self, ctx: ResponseContext) -> Result<Response, AppError> {
        let ViewResponse { body, status, flashes, cookies } = self;
        let ResponseContext { state, user, mut jar, mut messages } = ctx;

        for change in cookies {
            jar = match change {
                CookieChange::Add(cookie) => jar.add(cookie),
                CookieChange::Remove(name) => jar.remove(Cookie::build(name).path("/")),
            };
        }
        messages.extend(flashes);

        match body {
            Body::Render { template, context } => {
                let page = render_page(&state, &template, context, user.as_ref(), &messages)?;
                Ok((status, flash::clear(jar), page).into_response())
            }
            Body::NotFound => {
                let page = render_page(&state, NOT_FOUND_TEMPLATE, Map::new(), user.as_ref(), &messages)?;
                Ok((StatusCode::NOT_FOUND, flash::clear(jar), page).into_response())
            }
            Body::Redirect(location) => Ok((flash::store(jar, &messages), Redirect::to(&location)).into_response()),
            Body::File { path, content_type } => match tokio::fs::read(&path).await {
                Ok(bytes) => Ok((
                    status,
                    flash::store(jar, &messages),
                    [(header::CONTENT_TYPE, content_type)],
                    bytes,
                )
                    .into_response()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::warn!("File {} is missing", path.display());
                    let page = render_page(&state, NOT_FOUND_TEMPLATE, Map::new(), user.as_ref(), &messages)?;
                    Ok((StatusCode::NOT_FOUND, flash::clear(jar), page).into_response())
                }
                Err(e) => Err(AppError::Internal(e.into())),
            },
            Body::MethodNotAllowed => Ok((StatusCode::METHOD_NOT_ALLOWED, flash::store(jar, &messages)).into_response()),
        }
    }
}

/// Request-side state needed to finish a `ViewResponse`
pub(crate) struct ResponseContext {
    pub state: AppState,
    pub user: Option<User>,
    pub jar: CookieJar,
    pub messages: Vec<FlashMessage>,
}

#[derive(Serialize)]
struct PageGlobals<'a> {
    user: Option<&'a User>,
    messages: &'a [FlashMessage],
}

struct Page {
    content_type: &'static str,
    body: String,
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

fn render_page(
    state: &AppState,
    template: &str,
    mut context: Map<String, Value>,
    user: Option<&User>,
    messages: &[FlashMessage],
) -> Result<Page, AppError> {
    if let Value::Object(globals) = serde_json::to_value(PageGlobals { user, messages })? {
        context.extend(globals);
    }

    let rendered = state.renderer.render(template, &context)?;
    Ok(Page { content_type: rendered.content_type, body: rendered.body })
}
