use axum::http::{HeaderMap, Method as AxumMethod};
use axum::{extract::Request, middleware::Next, response::{IntoResponse, Response}};
use std::collections::HashMap;
use std::str::FromStr;

use crate::errors::DssError;
use crate::role::Role;

/// Header set by the fronting auth layer with the caller's resolved role.
pub const ROLE_HEADER: &str = "x-dss-role";

/// Static role policy mapping per route path (prefix match) and method.
/// This intentionally keeps policy simple and explicit.
pub struct RolePolicyTable {
    /// map of (method, path_prefix) -> required role
    routes: HashMap<(MethodKey, &'static str), Role>,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKey {
    Get,
    Post,
}

impl RolePolicyTable {
    pub fn defaults() -> Self {
        let mut routes: HashMap<(MethodKey, &'static str), Role> = HashMap::new();

        // Open to anonymous visitors
        routes.insert((MethodKey::Post, "/api/project/add"), Role::Guest);
        routes.insert((MethodKey::Post, "/api/recommend"), Role::Guest);

        // Expert scoring workflow
        routes.insert((MethodKey::Get, "/api/project/mine/"), Role::Expert);
        routes.insert((MethodKey::Get, "/api/project/get/"), Role::Expert);
        routes.insert((MethodKey::Post, "/api/project/score"), Role::Expert);

        // Admin project management
        routes.insert((MethodKey::Get, "/api/project/list"), Role::Admin);
        routes.insert((MethodKey::Post, "/api/project/accept/"), Role::Admin);
        routes.insert((MethodKey::Post, "/api/project/history/"), Role::Admin);
        routes.insert((MethodKey::Post, "/api/project/unhistory/"), Role::Admin);
        routes.insert((MethodKey::Post, "/api/project/delete/"), Role::Admin);

        Self { routes }
    }

    fn required_for(&self, method: MethodKey, path: &str) -> Option<Role> {
        // Longest-prefix match
        self.routes
            .iter()
            .filter(|((m, pfx), _)| *m == method && path.starts_with(*pfx))
            .max_by_key(|((_, pfx), _)| pfx.len())
            .map(|(_, role)| *role)
    }
}

fn to_method_key(method: &AxumMethod) -> Option<MethodKey> {
    if method == AxumMethod::GET {
        Some(MethodKey::Get)
    } else if method == AxumMethod::POST {
        Some(MethodKey::Post)
    } else {
        None
    }
}

/// Role carried by the request; a missing header means an anonymous Guest.
pub fn request_role(headers: &HeaderMap) -> Result<Role, DssError> {
    match headers.get(ROLE_HEADER) {
        None => Ok(Role::Guest),
        Some(value) => {
            let text = value
                .to_str()
                .map_err(|_| DssError::invalid_input(ROLE_HEADER, "header is not valid UTF-8"))?;
            Role::from_str(text)
                .map_err(|_| DssError::invalid_input(ROLE_HEADER, format!("unknown role '{text}'")))
        }
    }
}

/// Enforce the policy table; returns the caller's role on success.
pub fn enforce_request_role(
    headers: &HeaderMap,
    method: &AxumMethod,
    path: &str,
    policy: &RolePolicyTable,
) -> Result<Role, DssError> {
    let method_key =
        to_method_key(method).ok_or_else(|| DssError::invalid_input("method", "method not allowed"))?;

    let role = request_role(headers)?;

    // Health probes and unknown paths stay open; the router 404s unknowns.
    let Some(required) = policy.required_for(method_key, path) else {
        return Ok(role);
    };

    if role >= required {
        Ok(role)
    } else {
        Err(DssError::insufficient_role(required, role))
    }
}

/// Axum middleware that enforces the default role policy for incoming
/// requests.
pub async fn role_guard(req: Request, next: Next) -> Response {
    let policy = RolePolicyTable::defaults();
    match enforce_request_role(req.headers(), req.method(), req.uri().path(), &policy) {
        Ok(_role) => next.run(req).await,
        Err(e) => e.into_response(),
    }
}
