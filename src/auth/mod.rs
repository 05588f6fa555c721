// Authentication: credential checks, sessions and token issuance

pub mod audit_logger;
pub mod credentials;
pub mod password;
pub mod session;
pub mod token_issuer;
