/// Authentication utilities for Mealbook
///
/// # Modules
///
/// - `password`: Argon2id password hashing and strength validation
/// - `jwt`: JWT access/refresh token creation and validation
/// - `middleware`: Request auth context injected by the API layer

pub mod jwt;
pub mod middleware;
pub mod password;
