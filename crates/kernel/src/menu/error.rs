//! Route resolution errors.
//!
//! Raised by the route table while registering or generating URLs. During
//! navigation build these are logged and degrade to a placeholder link.

use thiserror::Error;

/// Errors from route registration and URL generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// No route is registered under this name.
    #[error("route '{route}' is not defined")]
    UnknownRoute { route: String },

    /// The route pattern has a `:param` segment with no value supplied.
    #[error("route '{route}' requires parameter '{param}'")]
    MissingParam { route: String, param: String },

    /// Two routes were registered under the same name.
    #[error("route '{route}' is already defined")]
    DuplicateRoute { route: String },

    /// A page or lookup used an empty route name.
    #[error("route name must be a non-empty string")]
    EmptyRouteName,
}

impl RouteError {
    pub fn unknown(route: impl Into<String>) -> Self {
        Self::UnknownRoute {
            route: route.into(),
        }
    }

    pub fn missing_param(route: impl Into<String>, param: impl Into<String>) -> Self {
        Self::MissingParam {
            route: route.into(),
            param: param.into(),
        }
    }
}
