//! Data Transfer Objects for Web API.

pub mod extract;
pub mod response;

pub use extract::ContactJson;
pub use response::*;
