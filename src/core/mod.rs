// Core building blocks shared by every layer

pub mod constants;
pub mod crypto;
pub mod errors;
pub mod models;
