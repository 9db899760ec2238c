//! # Thread pool
//!
//! Module dedicated to thread pool management. The [`ThreadPool`] is
//! the main structure of this module: it spawns n workers and
//! transfers tasks to them using a bounded channel. The receiver part
//! is shared accross all workers in a mutex, this way only one worker
//! can wait for a task at a time. When a worker receives a task, it
//! releases the lock and an other worker can wait for the next task.
//! A task is a function that takes a
//! [`ThreadPoolContextBuilder::Context`] and returns a future. The
//! easiest way to build a pool is to use the [`ThreadPoolBuilder`].
//!
//! Tasks are independent from each other: the pool gives no
//! ordering guarantee between them.

mod error;

use std::{
    any::Any,
    panic::AssertUnwindSafe,
    pin::Pin,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex as StdMutex, MutexGuard,
    },
    time::Duration,
};

use async_trait::async_trait;
use futures::{lock::Mutex, stream::FuturesUnordered, Future, FutureExt, StreamExt};
use tokio::{
    sync::{
        mpsc::{self, error::TrySendError},
        oneshot,
    },
    task::JoinHandle,
    time::timeout,
};
use tracing::{debug, trace, warn};

#[doc(inline)]
pub use self::error::{Error, Result};
use crate::AnyResult;

/// The default number of workers of a pool.
pub const DEFAULT_SIZE: usize = 5;

/// The default maximum number of tasks waiting for a worker.
pub const DEFAULT_QUEUE_SIZE: usize = 100;

/// The output of a task, or the message of its panic.
type TaskOutput<T> = std::result::Result<T, String>;

/// The thread pool task.
pub type ThreadPoolTask<C> =
    Box<dyn FnOnce(Arc<C>) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send>;

/// Locks a std mutex, ignoring poisoning.
///
/// Guarded values are only swapped in and out, a panicking holder
/// cannot leave them half-updated.
fn lock<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        String::from("unknown panic")
    }
}

/// The thread pool.
///
/// The pool has an explicit lifecycle:
///
/// - [`ThreadPool::drain`] stops accepting tasks, then waits for
///   workers to execute every queued task.
///
/// - [`ThreadPool::close`] stops accepting tasks and aborts workers
///   straight away. Queued tasks are dropped: their handles resolve
///   with [`Error::TaskCancelledError`].
///
/// Dropping the pool without closing it lets workers finish queued
/// tasks in the background.
pub struct ThreadPool<C: ThreadPoolContext> {
    /// The sending half of the task queue.
    ///
    /// Taken out when the pool is drained or closed, which closes
    /// the queue.
    tasks: StdMutex<Option<mpsc::Sender<ThreadPoolTask<C>>>>,

    /// The list of workers spawned by the pool.
    threads: StdMutex<Vec<JoinHandle<()>>>,

    size: usize,
    queue_size: usize,
}

impl<C> ThreadPool<C>
where
    C: ThreadPoolContext + 'static,
{
    /// Submits the given task to the pool.
    ///
    /// The task is queued and will be executed by the first available
    /// worker. This function never waits: it fails with
    /// [`Error::PoolSaturatedError`] when the queue is full and with
    /// [`Error::PoolClosedError`] when the pool does not accept tasks
    /// anymore.
    pub fn submit<F, T>(&self, task: impl FnOnce(Arc<C>) -> F + Send + 'static) -> Result<TaskHandle<T>>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (output_tx, output_rx) = oneshot::channel();
        let cancelled = Arc::new(AtomicBool::new(false));

        let flag = cancelled.clone();
        let task: ThreadPoolTask<C> = Box::new(move |ctx| {
            Box::pin(async move {
                if flag.load(Ordering::SeqCst) {
                    debug!("task cancelled before execution, skipping it");
                    return;
                }

                // a panicking task must not take its worker down
                let output = AssertUnwindSafe(async move { task(ctx).await })
                    .catch_unwind()
                    .await
                    .map_err(panic_message);

                if let Err(err) = &output {
                    warn!(err, "task panicked");
                }

                // the handle may have been dropped already
                let _ = output_tx.send(output);
            })
        });

        let queue = lock(&self.tasks);
        let Some(tasks) = queue.as_ref() else {
            return Err(Error::PoolClosedError);
        };

        match tasks.try_send(task) {
            Ok(()) => {
                trace!("task submitted to pool");
                Ok(TaskHandle {
                    output: Some(output_rx),
                    cancelled,
                })
            }
            Err(TrySendError::Full(_)) => {
                debug!(queue_size = self.queue_size, "pool saturated, rejecting task");
                Err(Error::PoolSaturatedError(self.queue_size))
            }
            Err(TrySendError::Closed(_)) => Err(Error::PoolClosedError),
        }
    }

    /// Returns the number of workers of the pool.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the maximum number of tasks waiting for a worker.
    pub fn queue_size(&self) -> usize {
        self.queue_size
    }

    /// Returns `true` if the pool does not accept tasks anymore.
    pub fn is_closed(&self) -> bool {
        lock(&self.tasks).is_none()
    }

    /// Stops accepting tasks and waits for queued tasks to be
    /// executed.
    pub async fn drain(&self) {
        debug!("draining pool…");

        // dropping the sender closes the queue, workers stop once it
        // is empty
        drop(lock(&self.tasks).take());

        let threads: Vec<_> = lock(&self.threads).drain(..).collect();

        for (id, thread) in threads.into_iter().enumerate() {
            let id = id + 1;
            match thread.await {
                Ok(()) => trace!(id, "worker stopped"),
                Err(err) => debug!(id, "worker stopped abnormally: {err}"),
            }
        }

        debug!("pool drained");
    }

    /// Stops accepting tasks and aborts workers.
    pub async fn close(&self) {
        debug!("closing pool…");

        drop(lock(&self.tasks).take());

        let threads: Vec<_> = lock(&self.threads).drain(..).collect();

        for thread in &threads {
            thread.abort()
        }

        for (id, thread) in threads.into_iter().enumerate() {
            let id = id + 1;
            match thread.await {
                Ok(()) => debug!(id, "worker aborted"),
                Err(err) => debug!(id, info = err.to_string(), "worker aborted"),
            }
        }

        debug!("pool closed");
    }
}

/// The handle of a task submitted to a [`ThreadPool`].
pub struct TaskHandle<T> {
    output: Option<oneshot::Receiver<TaskOutput<T>>>,
    cancelled: Arc<AtomicBool>,
}

impl<T> TaskHandle<T> {
    /// Waits for the task output, without time limit.
    pub async fn wait(mut self) -> Result<T> {
        let output = self.output.take().ok_or(Error::TaskAlreadyResolvedError)?;
        match output.await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(err)) => Err(Error::TaskPanickedError(err)),
            Err(_) => Err(Error::TaskCancelledError),
        }
    }

    /// Waits for the task output during the given duration.
    ///
    /// On timeout, the task keeps running and the handle can be
    /// waited on again.
    pub async fn wait_timeout(&mut self, duration: Duration) -> Result<T> {
        let output = self.output.as_mut().ok_or(Error::TaskAlreadyResolvedError)?;

        let result = match timeout(duration, output).await {
            Ok(Ok(Ok(output))) => Ok(output),
            Ok(Ok(Err(err))) => Err(Error::TaskPanickedError(err)),
            Ok(Err(_)) => Err(Error::TaskCancelledError),
            Err(_) => return Err(Error::WaitTaskTimeoutError(duration)),
        };

        self.output = None;
        result
    }

    /// Cancels the task.
    ///
    /// Cancellation is best effort: a task that did not start yet is
    /// skipped, a task already running goes on until completion.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst)
    }

    /// Returns `true` if [`TaskHandle::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// The thread pool builder.
///
/// Builder that help you to create a [`ThreadPool`].
#[derive(Clone)]
pub struct ThreadPoolBuilder<B: ThreadPoolContextBuilder> {
    /// The context builder.
    ctx_builder: B,

    /// The size of the pool.
    ///
    /// Represents the number of workers that will be spawn in
    /// parallel. Defaults to [`DEFAULT_SIZE`].
    size: usize,

    /// The size of the task queue.
    ///
    /// Represents the number of tasks that can wait for a worker
    /// before submissions get rejected. Defaults to
    /// [`DEFAULT_QUEUE_SIZE`].
    queue_size: usize,
}

impl<B: ThreadPoolContextBuilder + 'static> ThreadPoolBuilder<B> {
    /// Create a new thread pool builder with a context builder.
    pub fn new(ctx_builder: B) -> Self {
        Self {
            ctx_builder,
            size: DEFAULT_SIZE,
            queue_size: DEFAULT_QUEUE_SIZE,
        }
    }

    /// Change the thread pool size.
    pub fn set_some_size(&mut self, size: Option<usize>) {
        if let Some(size) = size {
            self.size = size.max(1);
        }
    }

    /// Change the thread pool size.
    pub fn set_size(&mut self, size: usize) {
        self.set_some_size(Some(size));
    }

    /// Change the thread pool size using the builder pattern.
    pub fn with_some_size(mut self, size: Option<usize>) -> Self {
        self.set_some_size(size);
        self
    }

    /// Change the thread pool size using the builder pattern.
    pub fn with_size(mut self, size: usize) -> Self {
        self.set_size(size);
        self
    }

    /// Change the task queue size.
    pub fn set_some_queue_size(&mut self, size: Option<usize>) {
        if let Some(size) = size {
            self.queue_size = size.max(1);
        }
    }

    /// Change the task queue size.
    pub fn set_queue_size(&mut self, size: usize) {
        self.set_some_queue_size(Some(size));
    }

    /// Change the task queue size using the builder pattern.
    pub fn with_some_queue_size(mut self, size: Option<usize>) -> Self {
        self.set_some_queue_size(size);
        self
    }

    /// Change the task queue size using the builder pattern.
    pub fn with_queue_size(mut self, size: usize) -> Self {
        self.set_queue_size(size);
        self
    }

    /// Build the final thread pool.
    pub async fn build(self) -> Result<ThreadPool<B::Context>> {
        let (tx, rx) = mpsc::channel::<ThreadPoolTask<B::Context>>(self.queue_size);
        let rx = Arc::new(Mutex::new(rx));

        debug!(size = self.size, queue_size = self.queue_size, "creating pool");

        let ctx_builder = self.ctx_builder;
        let ctxs = FuturesUnordered::from_iter(
            (0..self.size).map(|_| tokio::spawn(ctx_builder.clone().build())),
        )
        .collect::<Vec<_>>()
        .await;

        let mut threads: Vec<JoinHandle<()>> = Vec::with_capacity(self.size);

        for (id, ctx) in ctxs.into_iter().enumerate() {
            let id = id + 1;
            let rx = rx.clone();

            let ctx = match ctx? {
                Ok(ctx) => Arc::new(ctx),
                Err(err) => {
                    for thread in &threads {
                        thread.abort()
                    }
                    return Err(Error::BuildContextError(err, id, self.size));
                }
            };

            threads.push(tokio::spawn(async move {
                loop {
                    trace!(id, "worker looking for a task");

                    // the lock is released as soon as a task is received
                    let task = rx.lock().await.recv().await;

                    match task {
                        None => {
                            debug!(id, "task queue closed, stopping worker");
                            break;
                        }
                        Some(task) => {
                            debug!(id, "worker executing task…");
                            task(ctx.clone()).await;
                            debug!(id, "worker executed task");
                        }
                    }
                }
            }));
        }

        Ok(ThreadPool {
            tasks: StdMutex::new(Some(tx)),
            threads: StdMutex::new(threads),
            size: self.size,
            queue_size: self.queue_size,
        })
    }
}

/// The thread pool context builder.
#[async_trait]
pub trait ThreadPoolContextBuilder: Clone + Send + Sync {
    /// The context built by this trait.
    type Context: ThreadPoolContext;

    /// Build the thread pool context.
    async fn build(self) -> AnyResult<Self::Context>;
}

pub trait ThreadPoolContext: Send + Sync {
    //
}
