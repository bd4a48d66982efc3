use std::{
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use engine_primitives::PayloadId;
use futures_util::StreamExt;
use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, trace, warn};

use crate::{
    metrics::PayloadBuilderServiceMetrics, payload::PayloadBuilderAttributes,
    BuiltPayload, PayloadBuilderError,
};

/// A build job in progress: polled to advance the build, queried for the best
/// payload assembled so far, and resolved once into a final [`BuiltPayload`].
pub trait PayloadJob: Future<Output = Result<(), PayloadBuilderError>> + Send + Sync + Unpin {
    /// The best payload assembled so far; callable repeatedly while the job runs.
    fn best_payload(&self) -> Result<BuiltPayload, PayloadBuilderError>;

    /// The attributes this job was started with.
    fn payload_attributes(&self) -> Result<PayloadBuilderAttributes, PayloadBuilderError>;

    /// Consumes the job, returning its final payload. Called at most once.
    fn resolve(&mut self) -> Result<BuiltPayload, PayloadBuilderError>;
}

/// Starts new [`PayloadJob`]s for incoming attributes. The one piece of backend
/// coupling the builder service needs: everything else is generic over `Job`.
pub trait PayloadJobGenerator {
    type Job: PayloadJob;

    fn new_payload_job(
        &self,
        attributes: PayloadBuilderAttributes,
    ) -> Result<Self::Job, PayloadBuilderError>;
}

enum PayloadServiceCommand {
    BuildNewPayload(PayloadBuilderAttributes, oneshot::Sender<Result<PayloadId, PayloadBuilderError>>),
    BestPayload(PayloadId, oneshot::Sender<Result<BuiltPayload, PayloadBuilderError>>),
    PayloadAttributes(PayloadId, oneshot::Sender<Result<PayloadBuilderAttributes, PayloadBuilderError>>),
    Resolve(PayloadId, oneshot::Sender<Result<BuiltPayload, PayloadBuilderError>>),
}

impl fmt::Debug for PayloadServiceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuildNewPayload(attr, _) => {
                f.debug_tuple("BuildNewPayload").field(&attr.id()).finish()
            }
            Self::BestPayload(id, _) => f.debug_tuple("BestPayload").field(id).finish(),
            Self::PayloadAttributes(id, _) => {
                f.debug_tuple("PayloadAttributes").field(id).finish()
            }
            Self::Resolve(id, _) => f.debug_tuple("Resolve").field(id).finish(),
        }
    }
}

/// Cheaply cloneable handle to a running [`PayloadBuilderService`], used by the
/// dispatcher to start builds and fetch results without owning the service.
#[derive(Clone, Debug)]
pub struct PayloadBuilderHandle {
    to_service: mpsc::UnboundedSender<PayloadServiceCommand>,
}

impl PayloadBuilderHandle {
    pub fn new(to_service: mpsc::UnboundedSender<PayloadServiceCommand>) -> Self {
        Self { to_service }
    }

    /// Starts a new build job for `attributes`, returning its (possibly
    /// newly-derived) `PayloadId` immediately; the build itself proceeds
    /// asynchronously.
    pub async fn new_payload(
        &self,
        attributes: PayloadBuilderAttributes,
    ) -> Result<PayloadId, PayloadBuilderError> {
        let (tx, rx) = oneshot::channel();
        self.to_service
            .send(PayloadServiceCommand::BuildNewPayload(attributes, tx))
            .map_err(|_| PayloadBuilderError::ChannelClosed)?;
        rx.await?
    }

    /// The best payload assembled so far for `id`, without resolving the job.
    pub async fn best_payload(&self, id: PayloadId) -> Result<BuiltPayload, PayloadBuilderError> {
        let (tx, rx) = oneshot::channel();
        self.to_service
            .send(PayloadServiceCommand::BestPayload(id, tx))
            .map_err(|_| PayloadBuilderError::ChannelClosed)?;
        rx.await?
    }

    /// The attributes a running job for `id` was started with.
    pub async fn payload_attributes(
        &self,
        id: PayloadId,
    ) -> Result<PayloadBuilderAttributes, PayloadBuilderError> {
        let (tx, rx) = oneshot::channel();
        self.to_service
            .send(PayloadServiceCommand::PayloadAttributes(id, tx))
            .map_err(|_| PayloadBuilderError::ChannelClosed)?;
        rx.await?
    }

    /// Resolves (consumes) the job for `id`, returning its final payload.
    /// `getPayload*` calls this exactly once per id.
    pub async fn resolve(&self, id: PayloadId) -> Result<BuiltPayload, PayloadBuilderError> {
        let (tx, rx) = oneshot::channel();
        self.to_service
            .send(PayloadServiceCommand::Resolve(id, tx))
            .map_err(|_| PayloadBuilderError::ChannelClosed)?;
        rx.await?
    }
}

/// A thin, semantically-named wrapper over [`PayloadBuilderHandle`] for the
/// dispatcher's `getPayload*` code paths, where "resolve" reads clearer as
/// "fetch from the store".
#[derive(Clone, Debug)]
pub struct PayloadStore {
    inner: PayloadBuilderHandle,
}

impl PayloadStore {
    pub const fn new(inner: PayloadBuilderHandle) -> Self {
        Self { inner }
    }

    pub async fn resolve(&self, id: PayloadId) -> Result<BuiltPayload, PayloadBuilderError> {
        self.inner.resolve(id).await
    }

    pub async fn best_payload(&self, id: PayloadId) -> Result<BuiltPayload, PayloadBuilderError> {
        self.inner.best_payload(id).await
    }

    pub async fn payload_attributes(
        &self,
        id: PayloadId,
    ) -> Result<PayloadBuilderAttributes, PayloadBuilderError> {
        self.inner.payload_attributes(id).await
    }
}

/// Owns the set of in-flight build jobs and drives them to completion, servicing
/// [`PayloadBuilderHandle`] requests as they arrive. Runs as a `Future` on
/// whatever executor the embedder spawns it on; polling drains running jobs
/// first, then incoming commands, each call.
pub struct PayloadBuilderService<Gen: PayloadJobGenerator> {
    generator: Gen,
    payload_jobs: Vec<(Gen::Job, PayloadId)>,
    command_tx: mpsc::UnboundedSender<PayloadServiceCommand>,
    command_rx: UnboundedReceiverStream<PayloadServiceCommand>,
    metrics: PayloadBuilderServiceMetrics,
}

impl<Gen: PayloadJobGenerator> PayloadBuilderService<Gen> {
    pub fn new(generator: Gen) -> (Self, PayloadBuilderHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let handle = PayloadBuilderHandle::new(command_tx.clone());
        let service = Self {
            generator,
            payload_jobs: Vec::new(),
            command_tx,
            command_rx: UnboundedReceiverStream::new(command_rx),
            metrics: PayloadBuilderServiceMetrics::default(),
        };
        (service, handle)
    }

    fn job_by_id(&self, id: PayloadId) -> Option<usize> {
        self.payload_jobs.iter().position(|(_, job_id)| *job_id == id)
    }

    /// Returns a new handle to this service.
    pub fn handle(&self) -> PayloadBuilderHandle {
        PayloadBuilderHandle::new(self.command_tx.clone())
    }
}

impl<Gen: PayloadJobGenerator + Unpin> Future for PayloadBuilderService<Gen> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        // Drain and drive the running jobs, dropping any that finish or error.
        let mut i = 0;
        while i < this.payload_jobs.len() {
            match Pin::new(&mut this.payload_jobs[i].0).poll(cx) {
                Poll::Ready(Ok(())) => {
                    let (_, id) = this.payload_jobs.remove(i);
                    trace!(target: "payload_builder", %id, "payload job finished");
                }
                Poll::Ready(Err(err)) => {
                    let (_, id) = this.payload_jobs.remove(i);
                    this.metrics.failed_jobs.increment(1);
                    warn!(target: "payload_builder", %id, %err, "payload job failed");
                }
                Poll::Pending => i += 1,
            }
        }
        this.metrics.active_jobs.set(this.payload_jobs.len() as f64);

        loop {
            match this.command_rx.poll_next_unpin(cx) {
                Poll::Ready(Some(cmd)) => match cmd {
                    PayloadServiceCommand::BuildNewPayload(attributes, tx) => {
                        let id = attributes.id();
                        let result = this.generator.new_payload_job(attributes).map(|job| {
                            this.payload_jobs.push((job, id));
                            this.metrics.active_jobs.set(this.payload_jobs.len() as f64);
                            id
                        });
                        debug!(target: "payload_builder", %id, "started new payload job");
                        let _ = tx.send(result);
                    }
                    PayloadServiceCommand::BestPayload(id, tx) => {
                        let result = match this.job_by_id(id) {
                            Some(i) => this.payload_jobs[i].0.best_payload(),
                            None => Err(PayloadBuilderError::UnknownPayload),
                        };
                        let _ = tx.send(result);
                    }
                    PayloadServiceCommand::PayloadAttributes(id, tx) => {
                        let result = match this.job_by_id(id) {
                            Some(i) => this.payload_jobs[i].0.payload_attributes(),
                            None => Err(PayloadBuilderError::UnknownPayload),
                        };
                        let _ = tx.send(result);
                    }
                    PayloadServiceCommand::Resolve(id, tx) => {
                        let result = match this.job_by_id(id) {
                            Some(i) => this.payload_jobs[i].0.resolve(),
                            None => Err(PayloadBuilderError::UnknownPayload),
                        };
                        let _ = tx.send(result);
                    }
                },
                Poll::Ready(None) => return Poll::Ready(()),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
