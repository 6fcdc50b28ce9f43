//! 提交会话状态机
//!
//! Idle → Submitting → {Success, Failed}，每次提交带一个唯一票据，
//! 过期的响应（票据不匹配或已重置）一律丢弃。

use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::models::NormalizedResult;
use crate::transport::TransportError;

/// 一次已获准发出的提交
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub ticket: Uuid,
    pub text: String,
}

/// 提交失败的原因
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("Please enter some text to validate")]
    EmptyInput,
    #[error("a validation request is already in flight")]
    InFlight,
}

/// 展示给用户的失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Validation(SubmitError),
    Transport(TransportError),
}

impl Failure {
    pub fn message(&self) -> String {
        match self {
            Failure::Validation(err) => err.to_string(),
            Failure::Transport(err) => err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Submitting {
        ticket: Uuid,
        started_at: DateTime<Local>,
    },
    Success {
        result: NormalizedResult,
        completed_at: DateTime<Local>,
    },
    Failed(Failure),
}

/// 会话状态
#[derive(Debug, Clone)]
pub struct Session {
    phase: Phase,
    /// 被拒绝的提交，与上一次结果并存
    rejection: Option<Failure>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            rejection: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting { .. })
    }

    pub fn in_flight_ticket(&self) -> Option<Uuid> {
        match self.phase {
            Phase::Submitting { ticket, .. } => Some(ticket),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&NormalizedResult> {
        match &self.phase {
            Phase::Success { result, .. } => Some(result),
            _ => None,
        }
    }

    /// 当前要展示的错误，输入校验错误优先
    pub fn failure(&self) -> Option<&Failure> {
        if self.rejection.is_some() {
            return self.rejection.as_ref();
        }
        match &self.phase {
            Phase::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// 尝试开始一次提交
    ///
    /// 空白输入只记录校验错误，上一次结果保留；已有请求在途时保持原状态并拒绝。
    pub fn begin_submit(&mut self, text: &str) -> Result<Submission, SubmitError> {
        if self.is_submitting() {
            tracing::debug!("submit ignored: request already in flight");
            return Err(SubmitError::InFlight);
        }
        if text.trim().is_empty() {
            self.rejection = Some(Failure::Validation(SubmitError::EmptyInput));
            return Err(SubmitError::EmptyInput);
        }

        let ticket = Uuid::new_v4();
        self.rejection = None;
        self.phase = Phase::Submitting {
            ticket,
            started_at: Local::now(),
        };
        tracing::info!(%ticket, chars = text.chars().count(), "submission started");
        Ok(Submission {
            ticket,
            text: text.to_string(),
        })
    }

    /// 应用请求结果；票据过期时返回 false 且不改变状态
    pub fn complete(
        &mut self,
        ticket: Uuid,
        outcome: Result<NormalizedResult, TransportError>,
    ) -> bool {
        if self.in_flight_ticket() != Some(ticket) {
            tracing::debug!(%ticket, "discarding stale completion");
            return false;
        }

        self.phase = match outcome {
            Ok(result) => {
                tracing::info!(
                    %ticket,
                    has_valid_data = result.has_valid_data(),
                    is_true = result.is_true(),
                    "submission succeeded"
                );
                Phase::Success {
                    result,
                    completed_at: Local::now(),
                }
            }
            Err(err) => {
                tracing::info!(%ticket, error = %err, "submission failed");
                Phase::Failed(Failure::Transport(err))
            }
        };
        true
    }

    /// 回到 Idle，返回被作废的在途票据
    pub fn reset(&mut self) -> Option<Uuid> {
        let cancelled = self.in_flight_ticket();
        if let Some(ticket) = cancelled {
            tracing::info!(%ticket, "in-flight submission cancelled by reset");
        }
        self.phase = Phase::Idle;
        self.rejection = None;
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ResultBody, VerdictSet};
    use crate::normalizer::normalize;
    use crate::transport::NetworkFailure;
    use serde_json::json;

    fn sample_result() -> NormalizedResult {
        normalize(
            Some(&json!({"message": "ok", "data": {"verdict": "real"}})),
            &VerdictSet::default(),
        )
    }

    #[test]
    fn blank_input_is_rejected_without_submitting() {
        let mut session = Session::new();
        assert_eq!(session.begin_submit("   \n\t"), Err(SubmitError::EmptyInput));
        assert_eq!(
            session.failure().map(Failure::message).as_deref(),
            Some("Please enter some text to validate")
        );
        assert!(!session.is_submitting());
    }

    #[test]
    fn second_submit_while_in_flight_is_rejected() {
        let mut session = Session::new();
        let first = session.begin_submit("claim").unwrap();
        assert_eq!(session.begin_submit("another"), Err(SubmitError::InFlight));
        assert_eq!(session.in_flight_ticket(), Some(first.ticket));
    }

    #[test]
    fn success_then_new_submission_clears_result() {
        let mut session = Session::new();
        let sub = session.begin_submit("claim").unwrap();
        assert_eq!(sub.text, "claim");
        assert!(session.complete(sub.ticket, Ok(sample_result())));
        assert!(session.result().unwrap().is_true());

        session.begin_submit("next").unwrap();
        assert!(session.result().is_none());
        assert!(session.failure().is_none());
    }

    #[test]
    fn blank_input_keeps_previous_result() {
        let mut session = Session::new();
        let sub = session.begin_submit("claim").unwrap();
        assert!(session.complete(sub.ticket, Ok(sample_result())));

        assert_eq!(session.begin_submit(""), Err(SubmitError::EmptyInput));
        assert!(session.result().unwrap().is_true());
        assert_eq!(
            session.failure(),
            Some(&Failure::Validation(SubmitError::EmptyInput))
        );

        session.begin_submit("next").unwrap();
        assert!(session.failure().is_none());
        assert!(session.result().is_none());
    }

    #[test]
    fn reset_clears_validation_error() {
        let mut session = Session::new();
        assert!(session.begin_submit(" ").is_err());
        assert_eq!(session.reset(), None);
        assert!(session.failure().is_none());
    }

    #[test]
    fn transport_failure_is_recorded() {
        let mut session = Session::new();
        let sub = session.begin_submit("claim").unwrap();
        let err = TransportError::Network(NetworkFailure::NoResponse);
        assert!(session.complete(sub.ticket, Err(err.clone())));
        assert_eq!(session.failure(), Some(&Failure::Transport(err)));
        // 失败后可以再次提交
        assert!(session.begin_submit("retry").is_ok());
    }

    #[test]
    fn stale_completion_after_reset_is_ignored() {
        let mut session = Session::new();
        let old = session.begin_submit("claim").unwrap();
        assert_eq!(session.reset(), Some(old.ticket));
        assert!(!session.complete(old.ticket, Ok(sample_result())));
        assert_eq!(session.phase(), &Phase::Idle);

        let new = session.begin_submit("claim again").unwrap();
        assert!(!session.complete(old.ticket, Ok(sample_result())));
        assert!(session.is_submitting());
        let empty = NormalizedResult::new(String::new(), ResultBody::Empty);
        assert!(session.complete(new.ticket, Ok(empty.clone())));
        assert_eq!(session.result(), Some(&empty));
    }

    #[test]
    fn completion_in_idle_is_ignored() {
        let mut session = Session::new();
        assert!(!session.complete(Uuid::new_v4(), Ok(sample_result())));
        assert_eq!(session.phase(), &Phase::Idle);
        assert_eq!(session.reset(), None);
    }
}
