//! 后台请求执行
//!
//! UI 线程同步运行，请求放到 tokio 运行时里执行，完成后通过 channel 送回。
//! 同一时间最多一个在途任务。

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::models::{NormalizedResult, VerdictSet};
use crate::normalizer::normalize;
use crate::session::{SubmitError, Submission};
use crate::transport::{TransportError, ValidationClient};

/// 一次请求的最终结果
#[derive(Debug)]
pub struct Completion {
    pub ticket: Uuid,
    pub outcome: Result<NormalizedResult, TransportError>,
}

pub struct RequestWorker {
    runtime: Handle,
    client: Arc<ValidationClient>,
    verdicts: Arc<VerdictSet>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: Option<(Uuid, JoinHandle<()>)>,
}

impl RequestWorker {
    pub fn new(runtime: Handle, client: ValidationClient, verdicts: VerdictSet) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            runtime,
            client: Arc::new(client),
            verdicts: Arc::new(verdicts),
            tx,
            rx,
            in_flight: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|(_, handle)| !handle.is_finished())
    }

    /// 启动请求；已有在途任务时拒绝
    pub fn submit(&mut self, submission: Submission) -> Result<(), SubmitError> {
        if self.is_busy() {
            tracing::warn!(ticket = %submission.ticket, "worker refused submission: request in flight");
            return Err(SubmitError::InFlight);
        }

        let Submission { ticket, text } = submission;
        let client = Arc::clone(&self.client);
        let verdicts = Arc::clone(&self.verdicts);
        let tx = self.tx.clone();

        let handle = self.runtime.spawn(async move {
            let outcome = client
                .validate(&text)
                .await
                .map(|payload| normalize(Some(&payload), &verdicts));
            // 接收端关闭说明程序正在退出
            let _ = tx.send(Completion { ticket, outcome });
        });

        self.in_flight = Some((ticket, handle));
        Ok(())
    }

    /// 中止在途请求
    pub fn cancel(&mut self, ticket: Uuid) {
        if let Some((current, handle)) = self.in_flight.take() {
            if current == ticket {
                handle.abort();
                tracing::debug!(%ticket, "in-flight request aborted");
            } else {
                self.in_flight = Some((current, handle));
            }
        }
    }

    /// 非阻塞地取一个完成结果
    pub fn try_recv(&mut self) -> Option<Completion> {
        let completion = self.rx.try_recv().ok()?;
        if self
            .in_flight
            .as_ref()
            .is_some_and(|(ticket, _)| *ticket == completion.ticket)
        {
            self.in_flight = None;
        }
        Some(completion)
    }
}

impl Drop for RequestWorker {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.in_flight.take() {
            handle.abort();
        }
    }
}
