//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`recaptcha`] -- optional reCAPTCHA verification for register and login.

pub mod jwt;
pub mod password;
pub mod recaptcha;
