//! Page and API view plumbing: access policies, the request gate, the route
//! registry, response framing and the pieces pages share (forms, flash
//! messages, rendering).

pub mod access;
pub mod api;
pub mod envelope;
pub mod flash;
pub mod form;
mod gate;
pub mod registry;
pub mod render;
pub mod request;
pub mod response;

use async_trait::async_trait;

use crate::error::AppError;

pub use access::Access;
pub use api::{frame, ApiOutcome, ApiResult, ApiView};
pub use envelope::Envelope;
pub use flash::FlashMessage;
pub use form::{redirect_if_signed_in, FormData};
pub use registry::{RouteEntry, ViewRegistry};
pub use render::{JsonRenderer, RenderError, Renderer};
pub use request::ViewRequest;
pub use response::ViewResponse;

pub type ViewResult = Result<ViewResponse, AppError>;

/// A routable page.
///
/// Verbs a view does not implement answer 405. The access check runs before
/// either handler and cannot be overridden here.
#[async_trait]
pub trait View: Send + Sync + 'static {
    const NAME: &'static str;
    /// `None` marks a view that is never mounted
    const ROUTE: Option<&'static str>;
    const ACCESS: Access = Access::PUBLIC;

    async fn get(&self, _req: ViewRequest) -> ViewResult {
        Ok(ViewResponse::method_not_allowed())
    }

    async fn post(&self, _req: ViewRequest) -> ViewResult {
        Ok(ViewResponse::method_not_allowed())
    }
}
