//! Email templates, each owned by the account that created it.

pub mod handlers;
mod service;

pub use service::TemplateService;
