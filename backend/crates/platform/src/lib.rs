//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC, hex)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Bearer access tokens (HS256 JWT)
//! - Environment configuration helpers
//! - Retry with exponential backoff

pub mod config;
pub mod crypto;
pub mod jwt;
pub mod password;
pub mod retry;
