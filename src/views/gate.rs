use axum::{
    async_trait,
    body::{Body, Bytes},
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, Method},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use std::collections::HashMap;
use std::convert::Infallible;
use url::form_urlencoded;

use crate::database::models::User;
use crate::error::{ApiError, AppError};
use crate::middleware::CurrentUser;
use crate::state::AppState;
use crate::views::access::Access;
use crate::views::api::{frame, ApiView};
use crate::views::flash;
use crate::views::request::ViewRequest;
use crate::views::response::{ResponseContext, ViewResponse};
use crate::views::View;

/// Request pieces collected before the gate runs. The query string and the
/// body are left untouched until the caller has been admitted.
pub(crate) struct Incoming {
    state: AppState,
    user: Option<User>,
    params: HashMap<String, String>,
    jar: CookieJar,
    parts: Parts,
    body: Body,
}

#[async_trait]
impl FromRequest<AppState> for Incoming {
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();

        let user = parts.extensions.get::<CurrentUser>().cloned().unwrap_or_default().0;
        // Routes without captures have no path parameters
        let params = Path::<HashMap<String, String>>::from_request_parts(&mut parts, state)
            .await
            .map(|Path(params)| params)
            .unwrap_or_default();
        let jar = CookieJar::from_headers(&parts.headers);

        Ok(Self { state: state.clone(), user, params, jar, parts, body })
    }
}

impl Incoming {
    /// Context for answering without looking at the request any further
    fn into_context(self) -> ResponseContext {
        let messages = flash::pending(&self.jar);
        ResponseContext { state: self.state, user: self.user, jar: self.jar, messages }
    }

    /// Reads the query and the body. An oversized or unreadable body is
    /// answered with the extractor's own rejection.
    async fn split(self) -> Result<(Method, Option<String>, ViewRequest, ResponseContext), Response> {
        let Incoming { state, user, params, jar, parts, body } = self;
        let method = parts.method.clone();
        let key = params.get("key").cloned();
        let query = parts
            .uri
            .query()
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        let body = Bytes::from_request(Request::from_parts(parts, body), &state)
            .await
            .map_err(IntoResponse::into_response)?;

        let messages = flash::pending(&jar);
        let ctx = ResponseContext { state: state.clone(), user: user.clone(), jar, messages };
        let req = ViewRequest { state, user, params, query, body };
        Ok((method, key, req, ctx))
    }
}

fn admitted(name: &'static str, access: &Access, user: Option<&User>) -> bool {
    let allowed = access.is_allowed(user);
    if !allowed {
        tracing::debug!(
            view = name,
            user = user.and_then(|u| u.id),
            "Access denied, answering not found"
        );
    }
    allowed
}

async fn finish(result: Result<ViewResponse, AppError>, ctx: ResponseContext) -> Response {
    match result {
        Ok(response) => response.finish(ctx).await.unwrap_or_else(IntoResponse::into_response),
        Err(e) => e.into_response(),
    }
}

/// Access check, then the page handler for the request verb.
///
/// Denied callers get the not-found page and the handler never runs.
pub(crate) async fn dispatch_view<V: View>(view: &V, incoming: Incoming) -> Response {
    if !admitted(V::NAME, &V::ACCESS, incoming.user.as_ref()) {
        return finish(Ok(ViewResponse::not_found()), incoming.into_context()).await;
    }

    let (method, _, req, ctx) = match incoming.split().await {
        Ok(split) => split,
        Err(rejection) => return rejection,
    };

    let result = match method {
        Method::GET => view.get(req).await,
        Method::POST => view.post(req).await,
        _ => Ok(ViewResponse::method_not_allowed()),
    };
    finish(result, ctx).await
}

/// Access check, then the API operation for the verb and route shape
pub(crate) async fn dispatch_api<A: ApiView>(api: &A, incoming: Incoming) -> Response {
    if !admitted(A::NAME, &A::ACCESS, incoming.user.as_ref()) {
        return finish(Ok(ViewResponse::not_found()), incoming.into_context()).await;
    }

    let (method, key, req, _) = match incoming.split().await {
        Ok(split) => split,
        Err(rejection) => return rejection,
    };

    let result = match (method, key) {
        (Method::GET, None) => api.list(req).await,
        (Method::POST, None) => api.create(req).await,
        (Method::GET, Some(key)) => api.read(req, key).await,
        (Method::PATCH, Some(key)) => api.update(req, key).await,
        (Method::DELETE, Some(key)) => api.delete(req, key).await,
        _ => Err(ApiError::not_allowed().into()),
    };
    frame(result).unwrap_or_else(IntoResponse::into_response)
}
