//! # Service
//!
//! Module dedicated to the email service, the entry point of the
//! library. The [`EmailService`] owns the template loader and the
//! dispatcher, and hands out [builders](crate::builder) sharing one
//! composition pipeline: templates are loaded (or parsed when given
//! raw) then rendered into the email.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    builder::{PreviewEmailBuilder, SendEmailBuilder, TemplateRef},
    config::{EmailConfig, SenderConfig},
    dispatch::{DeliveryContextBuilder, Dispatcher},
    template::{self, source::FileSystemTemplateSource, RawTemplates, TemplateLoader, TemplateParams},
    thread_pool::ThreadPoolBuilder,
    transport::{Transport, UndefinedTransport},
    Email, PreviewResult, Result, TemplateErrors, ValidateResult,
};

/// The email service.
#[derive(Clone)]
pub struct EmailService {
    loader: TemplateLoader,
    dispatcher: Dispatcher,
    default_locales: Vec<String>,
}

impl EmailService {
    pub fn new(loader: TemplateLoader, dispatcher: Dispatcher) -> Self {
        Self {
            loader,
            dispatcher,
            default_locales: Vec::new(),
        }
    }

    /// Sets the locales used when a template is requested without
    /// any.
    pub fn with_default_locales(mut self, locales: impl IntoIterator<Item = impl ToString>) -> Self {
        self.default_locales = locales.into_iter().map(|l| l.to_string()).collect();
        self
    }

    /// Builds a service from the given configuration.
    ///
    /// Templates are read from the configured directory and parsed
    /// with the tera engine. The delivery pool is started straight
    /// away.
    #[cfg(feature = "tera")]
    pub async fn from_config(config: &EmailConfig) -> Result<Self> {
        let source = FileSystemTemplateSource::new(&config.template_dir)
            .with_some_extension(config.template_extension.as_ref());
        let loader = TemplateLoader::new(source, template::TeraEngine::new());

        let transport: Arc<dyn Transport> = match &config.sender {
            SenderConfig::None => Arc::new(UndefinedTransport),
            #[cfg(feature = "smtp")]
            SenderConfig::Smtp(config) => {
                Arc::new(crate::transport::SmtpTransport::new(config.clone()))
            }
            #[cfg(feature = "sendmail")]
            SenderConfig::Sendmail(config) => {
                Arc::new(crate::transport::SendmailTransport::new(config.clone()))
            }
        };

        let pool = ThreadPoolBuilder::new(DeliveryContextBuilder::new(transport.clone()))
            .with_some_size(config.pool.size)
            .with_some_queue_size(config.pool.queue_size)
            .build()
            .await?;

        info!(dir = %config.template_dir.display(), "email service ready");

        let dispatcher = Dispatcher::new(transport).with_pool(Arc::new(pool));

        Ok(Self::new(loader, dispatcher).with_default_locales(&config.default_locales))
    }

    pub fn loader(&self) -> &TemplateLoader {
        &self.loader
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn default_locales(&self) -> &[String] {
        &self.default_locales
    }

    /// Previews the template of the given id in the first matching
    /// locale.
    pub fn preview(&self, id: impl ToString, locales: &[&str]) -> PreviewEmailBuilder<'_> {
        PreviewEmailBuilder::new(self, self.template_ref(id, locales))
    }

    /// Previews the given raw templates.
    pub fn preview_raw(&self, raw: RawTemplates) -> PreviewEmailBuilder<'_> {
        PreviewEmailBuilder::new(self, TemplateRef::Raw(raw))
    }

    /// Sends the template of the given id in the first matching
    /// locale.
    pub fn send(&self, id: impl ToString, locales: &[&str]) -> SendEmailBuilder<'_> {
        SendEmailBuilder::new(self, self.template_ref(id, locales))
    }

    /// Sends the given raw templates.
    pub fn send_raw(&self, raw: RawTemplates) -> SendEmailBuilder<'_> {
        SendEmailBuilder::new(self, TemplateRef::Raw(raw))
    }

    /// Parses and renders the given raw templates against an empty
    /// email.
    ///
    /// Nothing is ever delivered.
    pub fn validate(&self, raw: &RawTemplates, params: &TemplateParams) -> ValidateResult {
        let mut errors = TemplateErrors::default();
        let mut email = Email::new();

        let templates = self.loader.parse(raw, &mut errors.parse);
        errors.render = template::render(&templates, &mut email, params);

        debug!(valid = errors.is_empty(), "templates validated");

        ValidateResult { email, errors }
    }

    /// Stops accepting deferred deliveries and waits for the queued
    /// ones to complete.
    pub async fn shutdown(&self) {
        if let Some(pool) = self.dispatcher.pool() {
            pool.drain().await;
        }
    }

    /// Loads or parses the given templates then renders them into
    /// the given email.
    pub(crate) fn compose(
        &self,
        template: &TemplateRef,
        mut email: Email,
        params: &TemplateParams,
    ) -> Result<PreviewResult> {
        let mut errors = TemplateErrors::default();

        let templates = match template {
            TemplateRef::Id { id, locales } => self.loader.load(id, locales, &mut errors.parse)?,
            TemplateRef::Raw(raw) => self.loader.parse(raw, &mut errors.parse),
        };

        errors.render = template::render(&templates, &mut email, params);

        Ok(PreviewResult::new(email, errors))
    }

    fn template_ref(&self, id: impl ToString, locales: &[&str]) -> TemplateRef {
        let locales = if locales.is_empty() {
            self.default_locales.clone()
        } else {
            locales.iter().map(|l| l.to_string()).collect()
        };

        TemplateRef::Id {
            id: id.to_string(),
            locales,
        }
    }
}
