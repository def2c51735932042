use std::future::Future;
use std::time::Duration;

use domain_certification::exception::{CertResult, CertificationException};
use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::oneshot;

type Job = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Serializes all writes of one resource into a single total order.
///
/// Tasks go through an unbounded FIFO channel drained by a single worker
/// that runs each one to completion before taking the next, so two writers
/// can never resolve row positions against a state the other is about to
/// change. One instance exists per resource; writes to different resources
/// are not mutually exclusive.
pub struct WriteLock {
    resource: &'static str,
    timeout: Duration,
    sender: flume::Sender<Job>,
}

impl WriteLock {
    pub fn new(resource: &'static str, timeout: Duration) -> Self {
        let (sender, receiver) = flume::unbounded::<Job>();
        tokio::spawn(drain(receiver));
        Self {
            resource,
            timeout,
            sender,
        }
    }

    /// Queue `task` and wait for its result.
    ///
    /// Waiting stops after the timeout with `WriteTimeout`, but the task is
    /// not cancelled: it keeps its queue slot and runs to completion, its
    /// result dropped with the abandoned receiver. A failing task delivers
    /// its failure to this caller only; the queue moves on to the next task.
    pub async fn run<T, F, Fut>(&self, task: F) -> CertResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = CertResult<T>> + Send + 'static,
    {
        let (done, result) = oneshot::channel();
        let job: Job = Box::new(move || {
            async move {
                let _ = done.send(task().await);
            }
            .boxed()
        });
        self.sender.send_async(job).await.map_err(|_| {
            CertificationException::InternalError {
                source: anyhow::anyhow!("the {} write queue worker is gone", self.resource),
            }
        })?;

        match tokio::time::timeout(self.timeout, result).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(CertificationException::InternalError {
                source: anyhow::anyhow!("the {} write task was dropped before running", self.resource),
            }),
            Err(_) => Err(CertificationException::WriteTimeout {
                resource: self.resource,
                waited_secs: self.timeout.as_secs(),
            }),
        }
    }
}

async fn drain(receiver: flume::Receiver<Job>) {
    while let Ok(job) = receiver.recv_async().await {
        job().await;
    }
}
