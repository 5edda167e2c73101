pub mod handlers;
pub mod provider;
pub mod text;
