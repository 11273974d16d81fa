use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::exam::model::ExamPayload;
use crate::exam::session::{ExamSession, Section};

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Where the exam definition comes from. A local file takes precedence on
/// the CLI so an exam can be rehearsed without a backend.
#[derive(Clone, Debug)]
pub enum ExamSource {
    File(PathBuf),
    Url(String),
}

impl ExamSource {
    /// Fetch and parse the exam definition. Network and malformed-payload
    /// failures both collapse into one "could not load exam" error for the
    /// user; the distinction only matters in the error chain.
    pub fn load(&self) -> Result<ExamPayload> {
        let payload = match self {
            ExamSource::File(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("could not read exam file {}", path.display()))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("malformed exam payload in {}", path.display()))?
            }
            ExamSource::Url(url) => {
                let body = fetch_exam(url)?;
                serde_json::from_str(&body)
                    .with_context(|| format!("malformed exam payload from {url}"))?
            }
        };
        Ok(payload)
    }
}

#[cfg(feature = "network")]
fn fetch_exam(url: &str) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .context("could not build HTTP client")?;
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("could not load exam from {url}"))?;
    if !response.status().is_success() {
        anyhow::bail!("could not load exam from {url}: HTTP {}", response.status());
    }
    response.text().context("could not read exam response body")
}

#[cfg(not(feature = "network"))]
fn fetch_exam(url: &str) -> Result<String> {
    anyhow::bail!("cannot load exam from {url}: built without network support")
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("built without network support")]
    Disabled,
    #[error("submission rejected: HTTP {0}")]
    Status(u16),
    #[cfg(feature = "network")]
    #[error("submission failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// All-or-nothing submission body. One record per question, answered or
/// not, so the backend sees the full picture in a single POST.
#[derive(Clone, Debug, Serialize)]
pub struct SubmissionPayload {
    pub exam_id: String,
    pub student_id: String,
    pub batch: String,
    pub submitted_at: DateTime<Utc>,
    pub answers: Vec<AnswerRecord>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AnswerRecord {
    pub question_id: String,
    pub section: &'static str,
    pub value: Option<String>,
    pub marked_for_review: bool,
}

impl SubmissionPayload {
    pub fn from_session(session: &ExamSession, student_id: &str, now: DateTime<Utc>) -> Self {
        let mut answers = Vec::with_capacity(session.total_questions());
        for section in [Section::Mcq, Section::Coding] {
            for slot in session.slots(section) {
                answers.push(AnswerRecord {
                    question_id: slot.question.id.clone(),
                    section: section.as_str(),
                    value: slot.answer.clone(),
                    marked_for_review: slot.marked_for_review,
                });
            }
        }
        Self {
            exam_id: session.exam_id.clone(),
            student_id: student_id.to_string(),
            batch: session.batch.clone(),
            submitted_at: now,
            answers,
        }
    }
}

/// POST the submission. Any non-2xx response is a full failure with no
/// retry here; the caller keeps all answer state and lets the student retry
/// manually.
#[cfg(feature = "network")]
pub fn submit_exam(url: &str, payload: &SubmissionPayload) -> Result<(), SubmitError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?;
    let response = client.post(url).json(payload).send()?;
    if response.status().is_success() {
        Ok(())
    } else {
        Err(SubmitError::Status(response.status().as_u16()))
    }
}

#[cfg(not(feature = "network"))]
pub fn submit_exam(_url: &str, _payload: &SubmissionPayload) -> Result<(), SubmitError> {
    Err(SubmitError::Disabled)
}
