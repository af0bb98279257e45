use axum::{
    routing::{any, MethodRouter},
    Router,
};
use serde::Serialize;
use std::any::TypeId;
use std::collections::HashSet;
use std::sync::Arc;

use crate::state::AppState;
use crate::views::access::Access;
use crate::views::api::ApiView;
use crate::views::gate::{self, Incoming};
use crate::views::View;

/// One mounted route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub path: String,
    pub name: &'static str,
    pub access: Access,
}

/// Route table built once at startup from explicit `register` calls.
///
/// Each view type is mounted at most once no matter how often it is
/// registered, and routes keep their registration order.
#[derive(Default)]
pub struct ViewRegistry {
    seen: HashSet<TypeId>,
    entries: Vec<RouteEntry>,
    routes: Vec<(String, MethodRouter<AppState>)>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Views without a route are accepted and skipped
    pub fn register<V: View>(&mut self, view: V) -> &mut Self {
        if !self.seen.insert(TypeId::of::<V>()) {
            return self;
        }
        let Some(route) = V::ROUTE else {
            return self;
        };

        let view = Arc::new(view);
        let handler = move |incoming: Incoming| {
            let view = Arc::clone(&view);
            async move { gate::dispatch_view(&*view, incoming).await }
        };

        self.mount(route.to_string(), V::NAME, V::ACCESS, any(handler));
        self
    }

    /// Mounts the group route and the `/:key` item route
    pub fn register_api<A: ApiView>(&mut self, api: A) -> &mut Self {
        if !self.seen.insert(TypeId::of::<A>()) {
            return self;
        }
        let Some(route) = A::ROUTE else {
            return self;
        };

        let api = Arc::new(api);
        let handler = move |incoming: Incoming| {
            let api = Arc::clone(&api);
            async move { gate::dispatch_api(&*api, incoming).await }
        };

        self.mount(route.to_string(), A::NAME, A::ACCESS, any(handler.clone()));
        self.mount(format!("{}/:key", route.trim_end_matches('/')), A::NAME, A::ACCESS, any(handler));
        self
    }

    fn mount(&mut self, path: String, name: &'static str, access: Access, router: MethodRouter<AppState>) {
        tracing::debug!(path = %path, view = name, "Registering route");
        self.entries.push(RouteEntry { path: path.clone(), name, access });
        self.routes.push((path, router));
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn into_router(self) -> Router<AppState> {
        self.routes
            .into_iter()
            .fold(Router::new(), |router, (path, method_router)| router.route(&path, method_router))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use async_trait::async_trait;

    struct Plain;
    impl View for Plain {
        const NAME: &'static str = "Plain";
        const ROUTE: Option<&'static str> = Some("/plain");
    }

    struct Hidden;
    impl View for Hidden {
        const NAME: &'static str = "Hidden";
        const ROUTE: Option<&'static str> = None;
    }

    struct Things;
    #[async_trait]
    impl ApiView for Things {
        const NAME: &'static str = "Things";
        const ROUTE: Option<&'static str> = Some("/api/things");
        const ACCESS: Access = Access::role(Role::Editor);
    }

    #[test]
    fn registering_twice_mounts_once() {
        let mut registry = ViewRegistry::new();
        registry.register(Plain).register(Plain).register_api(Things).register_api(Things);

        let paths: Vec<_> = registry.entries().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/plain", "/api/things", "/api/things/:key"]);
    }

    #[test]
    fn views_without_a_route_are_skipped() {
        let mut registry = ViewRegistry::new();
        registry.register(Hidden);
        assert!(registry.entries().is_empty());
    }

    #[test]
    fn entries_carry_access() {
        let mut registry = ViewRegistry::new();
        registry.register_api(Things);
        assert!(registry
            .entries()
            .iter()
            .all(|e| e.access.minimum_role == Some(Role::Editor) && e.name == "Things"));
    }
}
