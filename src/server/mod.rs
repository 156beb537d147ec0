mod admin;
pub mod client_ip;
mod contact;
mod content;
pub mod dto;
pub mod response;
mod router;
pub mod validation;

pub use router::{AppState, create_router};
