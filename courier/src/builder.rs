//! # Builder
//!
//! Module dedicated to email builders. An [`EmailBuilder`] gathers
//! everything one logical email needs (recipients, sender, explicit
//! content, attachments, headers and template parameters) then runs
//! the template pipeline through one of its terminals:
//!
//! - [`PreviewEmailBuilder::go`] returns the rendered email,
//! - [`SendEmailBuilder::now`] renders then delivers on the current
//! task,
//! - [`SendEmailBuilder::later`] renders then defers the delivery to
//! the pool.
//!
//! Setters come in two shapes which are never conflated: singular
//! setters like [`EmailBuilder::to`] append one item, `with_*`
//! setters like [`EmailBuilder::with_to`] replace the whole list.

use std::marker::PhantomData;

use tracing::{debug, warn};

use crate::{
    template::{RawTemplates, TemplateParams},
    Address, Attachment, Email, EmailService, PreviewResult, Result, SendResult,
};

/// The preview mode marker of [`EmailBuilder`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Preview;

/// The delivery mode marker of [`EmailBuilder`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Delivery;

/// Builder of emails that are rendered but never delivered.
pub type PreviewEmailBuilder<'a> = EmailBuilder<'a, Preview>;

/// Builder of emails that are rendered then delivered.
pub type SendEmailBuilder<'a> = EmailBuilder<'a, Delivery>;

/// The templates an email is rendered from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TemplateRef {
    /// Templates loaded from the service source, by identifier, in
    /// the first matching locale.
    Id { id: String, locales: Vec<String> },

    /// Templates given as raw sources.
    Raw(RawTemplates),
}

/// The email builder.
///
/// Created by the [`EmailService`], consumed by one of its
/// terminals. The mode `M` decides which terminals are available.
pub struct EmailBuilder<'a, M> {
    service: &'a EmailService,
    template: TemplateRef,
    email: Email,
    params: TemplateParams,
    mode: PhantomData<M>,
}

impl<'a, M> EmailBuilder<'a, M> {
    pub(crate) fn new(service: &'a EmailService, template: TemplateRef) -> Self {
        Self {
            service,
            template,
            email: Email::new(),
            params: TemplateParams::new(),
            mode: PhantomData,
        }
    }

    /// Appends a `To` recipient.
    pub fn to(mut self, addr: impl Into<Address>) -> Self {
        self.email.to.push(addr.into());
        self
    }

    /// Replaces the `To` recipients.
    pub fn with_to(mut self, addrs: impl IntoIterator<Item = impl Into<Address>>) -> Self {
        self.email.to = addrs.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a `Cc` recipient.
    pub fn cc(mut self, addr: impl Into<Address>) -> Self {
        self.email.cc.push(addr.into());
        self
    }

    /// Replaces the `Cc` recipients.
    pub fn with_cc(mut self, addrs: impl IntoIterator<Item = impl Into<Address>>) -> Self {
        self.email.cc = addrs.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a `Bcc` recipient.
    pub fn bcc(mut self, addr: impl Into<Address>) -> Self {
        self.email.bcc.push(addr.into());
        self
    }

    /// Replaces the `Bcc` recipients.
    pub fn with_bcc(mut self, addrs: impl IntoIterator<Item = impl Into<Address>>) -> Self {
        self.email.bcc = addrs.into_iter().map(Into::into).collect();
        self
    }

    pub fn from(mut self, addr: impl Into<Address>) -> Self {
        self.email.from = Some(addr.into());
        self
    }

    pub fn reply_to(mut self, addr: impl Into<Address>) -> Self {
        self.email.reply_to = Some(addr.into());
        self
    }

    /// Sets the subject explicitly.
    ///
    /// An explicit subject wins over the subject template, which is
    /// then not rendered at all.
    pub fn subject(mut self, subject: impl ToString) -> Self {
        self.email.subject = Some(subject.to_string());
        self
    }

    /// Sets the plain text body explicitly.
    pub fn text(mut self, text: impl ToString) -> Self {
        self.email.text = Some(text.to_string());
        self
    }

    /// Sets the HTML body explicitly.
    pub fn html(mut self, html: impl ToString) -> Self {
        self.email.html = Some(html.to_string());
        self
    }

    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.email.attachments.push(attachment);
        self
    }

    pub fn with_attachments(mut self, attachments: impl IntoIterator<Item = Attachment>) -> Self {
        self.email.attachments = attachments.into_iter().collect();
        self
    }

    /// Sets a custom header, replacing any previous value of the
    /// same header.
    pub fn header(mut self, name: impl ToString, value: impl ToString) -> Self {
        self.email.set_header(name, value);
        self
    }

    /// Sets one template parameter.
    ///
    /// Any JSON value can be given, including objects so templates
    /// can access nested fields.
    pub fn param(mut self, name: impl ToString, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    /// Merges the given parameters into the current ones.
    ///
    /// Unlike other `with_*` setters, existing parameters are kept
    /// unless overridden.
    pub fn with_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: ToString,
        V: Into<serde_json::Value>,
    {
        self.params.extend(
            params
                .into_iter()
                .map(|(key, val)| (key.to_string(), val.into())),
        );
        self
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn params(&self) -> &TemplateParams {
        &self.params
    }

    pub fn template(&self) -> &TemplateRef {
        &self.template
    }

    fn compose(self) -> Result<(&'a EmailService, PreviewResult)> {
        let result = self
            .service
            .compose(&self.template, self.email, &self.params)?;
        Ok((self.service, result))
    }
}

impl<'a> EmailBuilder<'a, Preview> {
    /// Renders the email.
    pub fn go(self) -> Result<PreviewResult> {
        let (_, result) = self.compose()?;
        Ok(result)
    }
}

impl<'a> EmailBuilder<'a, Delivery> {
    /// Renders the email then delivers it on the current task.
    ///
    /// The delivery is skipped if any template failed.
    pub async fn now(self) -> Result<SendResult> {
        let (service, result) = self.compose()?;
        let result = SendResult::from(result);

        if !result.errors.is_empty() {
            warn!(errors = %result.errors, "email not rendered, skipping delivery");
            return Ok(result);
        }

        debug!("delivering email now");
        Ok(service.dispatcher().send_now(result).await)
    }

    /// Renders the email then defers its delivery to the pool.
    ///
    /// The returned result carries a [`SendHandle`](crate::SendHandle)
    /// when the delivery has been accepted. The delivery is skipped if
    /// any template failed.
    pub fn later(self) -> Result<SendResult> {
        let (service, result) = self.compose()?;
        let result = SendResult::from(result);

        if !result.errors.is_empty() {
            warn!(errors = %result.errors, "email not rendered, skipping deferred delivery");
            return Ok(result);
        }

        debug!("deferring email delivery");
        Ok(service.dispatcher().send_later(result))
    }
}
