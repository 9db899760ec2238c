//! # Dispatch
//!
//! Module dedicated to email dispatching. The [`Dispatcher`] takes a
//! rendered [`SendResult`], validates its email then delivers it
//! either straight away on the caller task, or later using the
//! [`DeliveryPool`]. Delivery failures never escape: they are
//! recorded into the result as a transport error.

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::{
    error::error_chain,
    thread_pool::{self, TaskHandle, ThreadPool, ThreadPoolContext, ThreadPoolContextBuilder},
    transport::{self, Transport, WireMessage},
    AnyResult, Email, Result, SendResult, TemplateErrors,
};

/// The thread pool dedicated to deferred deliveries.
pub type DeliveryPool = ThreadPool<DeliveryContext>;

/// The context shared by deliveries of the same pool worker.
pub struct DeliveryContext {
    pub transport: Arc<dyn Transport>,
}

impl ThreadPoolContext for DeliveryContext {}

/// The delivery context builder.
///
/// Every worker of the pool gets its own context, all of them
/// sharing the same transport.
#[derive(Clone)]
pub struct DeliveryContextBuilder {
    transport: Arc<dyn Transport>,
}

impl DeliveryContextBuilder {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ThreadPoolContextBuilder for DeliveryContextBuilder {
    type Context = DeliveryContext;

    async fn build(self) -> AnyResult<Self::Context> {
        debug!("building new delivery context");
        Ok(DeliveryContext {
            transport: self.transport,
        })
    }
}

/// The email dispatcher.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    pool: Option<Arc<DeliveryPool>>,
}

impl Dispatcher {
    /// Creates a dispatcher without pool.
    ///
    /// Deferred sendings fail until a pool is attached with
    /// [`Dispatcher::with_pool`].
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            pool: None,
        }
    }

    pub fn with_pool(mut self, pool: Arc<DeliveryPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn pool(&self) -> Option<&Arc<DeliveryPool>> {
        self.pool.as_ref()
    }

    /// Delivers the email of the given result on the current task.
    pub async fn send_now(&self, mut result: SendResult) -> SendResult {
        let Some(msg) = prepare(&mut result) else {
            return result;
        };

        if let Err(err) = self.transport.deliver(&msg).await {
            let err = error_chain(&err);
            warn!(err, "cannot deliver email");
            result.set_transport_error(err);
        } else {
            info!(recipients = msg.envelope.recipients.len(), "email delivered");
        }

        result
    }

    /// Submits the delivery of the email of the given result to the
    /// pool.
    ///
    /// On acceptance, the returned result carries a [`SendHandle`]
    /// resolving to the final result. A saturated or closed pool is
    /// recorded as a transport error.
    pub fn send_later(&self, mut result: SendResult) -> SendResult {
        let Some(msg) = prepare(&mut result) else {
            return result;
        };

        let Some(pool) = &self.pool else {
            let err = transport::Error::UndefinedPoolError;
            warn!("{err}");
            result.set_transport_error(err);
            return result;
        };

        let email = result.email.clone();
        let errors = result.errors.clone();

        let task = move |ctx: Arc<DeliveryContext>| async move {
            let mut result = SendResult::new(email, errors);

            match ctx.transport.deliver(&msg).await {
                Ok(()) => {
                    info!(recipients = msg.envelope.recipients.len(), "deferred email delivered");
                }
                Err(err) => {
                    let err = error_chain(&err);
                    warn!(err, "cannot deliver deferred email");
                    result.set_transport_error(err);
                }
            }

            result
        };

        match pool.submit(task) {
            Ok(handle) => {
                debug!("email delivery deferred");
                let handle = SendHandle::new(handle, &result);
                result.set_handle(handle);
            }
            Err(err) => {
                let err = error_chain(&err);
                warn!(err, "cannot defer email delivery");
                result.set_transport_error(err);
            }
        }

        result
    }
}

/// Validates the email of the given result and builds its wire
/// message.
///
/// Violations are recorded into the result.
fn prepare(result: &mut SendResult) -> Option<WireMessage> {
    match WireMessage::from_email(&result.email) {
        Ok(msg) => Some(msg),
        Err(err) => {
            let err = error_chain(&err);
            debug!(err, "email not deliverable, skipping delivery");
            result.set_transport_error(err);
            None
        }
    }
}

/// The completion handle of a deferred sending.
pub struct SendHandle {
    task: TaskHandle<SendResult>,

    /// The email and errors used to build a result when the task
    /// never completes.
    email: Email,
    errors: TemplateErrors,
}

impl SendHandle {
    fn new(task: TaskHandle<SendResult>, result: &SendResult) -> Self {
        Self {
            task,
            email: result.email.clone(),
            errors: result.errors.clone(),
        }
    }

    /// Waits for the delivery, without time limit.
    ///
    /// Always resolves to a result: a cancelled or panicked delivery is
    /// recorded as a transport error.
    pub async fn wait(self) -> SendResult {
        let Self {
            task,
            email,
            errors,
        } = self;

        match task.wait().await {
            Ok(result) => result,
            Err(err) => {
                let mut result = SendResult::new(email, errors);
                result.set_transport_error(error_chain(&err));
                result
            }
        }
    }

    /// Waits for the delivery during the given duration.
    ///
    /// Fails with a [`thread_pool::Error::WaitTaskTimeoutError`] on
    /// timeout, in which case the handle can be waited on again.
    pub async fn wait_timeout(&mut self, duration: Duration) -> Result<SendResult> {
        match self.task.wait_timeout(duration).await {
            Ok(result) => Ok(result),
            Err(err @ thread_pool::Error::WaitTaskTimeoutError(_)) => Err(err.into()),
            Err(err @ thread_pool::Error::TaskAlreadyResolvedError) => Err(err.into()),
            Err(err) => {
                let mut result = SendResult::new(self.email.clone(), self.errors.clone());
                result.set_transport_error(error_chain(&err));
                Ok(result)
            }
        }
    }

    /// Cancels the delivery.
    ///
    /// Cancellation is best effort: a delivery already in flight is
    /// not aborted.
    pub fn cancel(&self) {
        self.task.cancel()
    }

    pub fn is_cancelled(&self) -> bool {
        self.task.is_cancelled()
    }
}

impl fmt::Debug for SendHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendHandle")
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}
