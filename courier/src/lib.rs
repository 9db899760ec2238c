//! Rust library to compose, render and dispatch templated emails.
//!
//! The main purpose of this library is to help you to send emails
//! built from templates without caring about how templates are
//! resolved, how partial failures are reported or how the message
//! reaches the SMTP server.
//!
//! This goal is achieved by exposing an [`EmailService`] which hands
//! out fluent builders. A builder accumulates recipients, content and
//! template parameters, then runs the pipeline through one of its
//! terminals:
//!
//! - [`PreviewEmailBuilder::go`] loads and renders the templates,
//! - [`SendEmailBuilder::now`] also delivers the email,
//! - [`SendEmailBuilder::later`] also submits the delivery to a
//! bounded pool of workers.
//!
//! Every terminal returns a result object instead of failing: template
//! failures are isolated per fragment (subject, text, html, display
//! names…) and delivery failures are recorded as well. Only I/O faults
//! of the template source and programming errors end up in
//! [`Error`].
//!
//! ```rust,ignore
//! let config = EmailConfig {
//!     template_dir: "./templates".into(),
//!     ..Default::default()
//! };
//!
//! let service = EmailService::from_config(&config).await?;
//!
//! let result = service
//!     .send("welcome", &["fr_CA"])
//!     .from("noreply@localhost")
//!     .to(("bob@localhost", "Bob"))
//!     .param("name", "Bob")
//!     .now()
//!     .await?;
//!
//! assert!(result.was_successful());
//! ```
//!
//! See more examples in the /tests folder.

pub mod builder;
pub mod config;
pub mod dispatch;
pub mod email;
mod error;
pub mod result;
pub mod service;
pub mod template;
pub mod thread_pool;
pub mod transport;

#[doc(inline)]
pub use self::{
    builder::{EmailBuilder, PreviewEmailBuilder, SendEmailBuilder, TemplateRef},
    config::{EmailConfig, PoolConfig, SenderConfig},
    dispatch::{DeliveryPool, Dispatcher, SendHandle},
    email::{Address, Attachment, Email},
    error::{AnyBoxedError, AnyError, AnyResult, Error, Result},
    result::{PreviewResult, SendResult, TemplateErrors, ValidateResult},
    service::EmailService,
    template::{RawTemplates, TemplateParams},
};
