// src/auth/mod.rs
// User accounts: signup, login, password hashing, tokens

pub mod jwt;
pub mod models;
pub mod password;
pub mod service;

pub use jwt::{Claims, create_token, verify_token};
pub use models::{AuthResponse, LoginRequest, SignupRequest, User};
pub use service::{AuthError, AuthService};
