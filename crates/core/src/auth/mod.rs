//! Auth module - bearer-token validation against the token collection.

mod auth_errors;
mod auth_model;
mod auth_service;
mod auth_traits;

// Re-export the public interface
pub use auth_errors::AuthError;
pub use auth_model::AuthenticatedUser;
pub use auth_service::TokenAuthService;
pub use auth_traits::TokenAuthServiceTrait;

#[cfg(test)]
mod auth_service_tests;
