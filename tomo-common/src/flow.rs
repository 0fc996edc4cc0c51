//! Assessment flow state machine
//!
//! Drives a respondent through `form -> assessment -> results` and the
//! administrator through `form -> adminLogin -> adminDashboard`.
//!
//! [`FlowState::transition`] is pure: it validates the event against the
//! current page and returns the next state together with the side effect
//! to run, if any. [`FlowController`] owns the live state, runs the effect
//! (persisting the submission) and only then commits the new state.
//!
//! ```text
//! form ──start──▶ assessment ──complete──▶ results ──restart──▶ form
//!  │
//!  └──admin──▶ adminLogin ──login ok──▶ adminDashboard
//!                  │  ▲ login failed          │
//!                  │  └───────────────────────┤
//!                  └──back──▶ form ◀──back────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::admin::AdminSession;
use crate::catalog::QuestionCatalog;
use crate::scoring::{self, format_score, AnswerSet};
use crate::store::SubmissionStore;
use crate::submission::Submission;
use crate::time::{Clock, SystemClock};

/// Views of the application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Page {
    #[default]
    Form,
    Assessment,
    Results,
    AdminLogin,
    AdminDashboard,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Form => "form",
            Page::Assessment => "assessment",
            Page::Results => "results",
            Page::AdminLogin => "adminLogin",
            Page::AdminDashboard => "adminDashboard",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User actions that may change the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    Start,
    Complete,
    Restart,
    Admin,
    Login(String),
    Back,
}

impl FlowEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FlowEvent::Start => "start",
            FlowEvent::Complete => "complete",
            FlowEvent::Restart => "restart",
            FlowEvent::Admin => "admin",
            FlowEvent::Login(_) => "login",
            FlowEvent::Back => "back",
        }
    }
}

/// Blocking notices shown to the user; the state never advances on one
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Notice {
    #[error("모든 항목을 입력 또는 선택해주세요.")]
    MissingIdentity,

    #[error("모든 문항에 답변해주세요. ({answered}/{total})")]
    IncompleteAnswers { answered: usize, total: usize },

    #[error("비밀번호가 틀렸습니다.")]
    WrongPassword,

    #[error("선택할 수 없는 {field} 값입니다: {value}")]
    UnknownOption { field: &'static str, value: String },

    #[error("{index}번 문항의 응답 {value}은(는) 허용되지 않습니다.")]
    InvalidAnswer { index: usize, value: u8 },

    #[error("현재 화면({page})에서는 '{action}' 동작을 할 수 없습니다.")]
    NotAvailable { page: Page, action: &'static str },
}

/// Failure of a controller operation
#[derive(Debug, Error)]
pub enum FlowError {
    /// Validation failure, recoverable by correcting input
    #[error(transparent)]
    Rejected(#[from] Notice),

    /// The submission could not be persisted; the state did not advance
    #[error(transparent)]
    Persistence(#[from] crate::Error),
}

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Persist(Submission),
}

/// Result of a successful transition
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: FlowState,
    pub effect: Option<Effect>,
}

/// Collaborators a transition may consult
pub struct FlowContext<'a> {
    pub catalog: &'a QuestionCatalog,
    pub admin: &'a AdminSession,
    pub clock: &'a dyn Clock,
}

/// Current page plus the respondent's in-progress data
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowState {
    pub page: Page,
    pub name: String,
    pub age_group: Option<String>,
    pub job_function: Option<String>,
    pub answers: AnswerSet,
    pub score: Option<f64>,
}

impl FlowState {
    fn on(&self, page: Page) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    fn has_identity(&self) -> bool {
        !self.name.trim().is_empty() && self.age_group.is_some() && self.job_function.is_some()
    }

    /// Compute the transition for `event` without touching `self`
    pub fn transition(&self, event: &FlowEvent, ctx: &FlowContext<'_>) -> Result<Transition, Notice> {
        let moved = |next: FlowState| -> Result<Transition, Notice> {
            Ok(Transition { next, effect: None })
        };

        match (self.page, event) {
            (Page::Form, FlowEvent::Start) => {
                if !self.has_identity() {
                    return Err(Notice::MissingIdentity);
                }
                moved(self.on(Page::Assessment))
            }

            (Page::Assessment, FlowEvent::Complete) => {
                let total = ctx.catalog.len();
                if !self.answers.is_complete(total) {
                    return Err(Notice::IncompleteAnswers {
                        answered: self.answers.answered(),
                        total,
                    });
                }

                let score = scoring::score(&self.answers, ctx.catalog);
                let (id, timestamp) = ctx.clock.stamp();
                let submission = Submission {
                    id,
                    timestamp,
                    name: self.name.clone(),
                    age_group: self.age_group.clone().unwrap_or_default(),
                    job_function: self.job_function.clone().unwrap_or_default(),
                    score,
                };

                let mut next = self.on(Page::Results);
                next.score = Some(score);
                Ok(Transition {
                    next,
                    effect: Some(Effect::Persist(submission)),
                })
            }

            (Page::Results, FlowEvent::Restart) => moved(FlowState::default()),

            (Page::Form, FlowEvent::Admin) => moved(self.on(Page::AdminLogin)),

            (Page::AdminLogin, FlowEvent::Login(password)) => {
                if !ctx.admin.authenticate(password) {
                    return Err(Notice::WrongPassword);
                }
                moved(self.on(Page::AdminDashboard))
            }

            (Page::AdminLogin | Page::AdminDashboard, FlowEvent::Back) => moved(self.on(Page::Form)),

            (page, event) => Err(Notice::NotAvailable {
                page,
                action: event.name(),
            }),
        }
    }
}

/// Outcome of a dispatched event
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub page: Page,
    /// Submission appended by this event, if any
    pub persisted: Option<Submission>,
}

/// What the results page shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsView {
    pub name: String,
    pub score: String,
}

/// Owner of one respondent's flow state
pub struct FlowController {
    state: FlowState,
    catalog: Arc<QuestionCatalog>,
    store: SubmissionStore,
    admin: AdminSession,
    clock: Arc<dyn Clock>,
}

impl FlowController {
    pub fn new(catalog: Arc<QuestionCatalog>, store: SubmissionStore) -> Self {
        Self {
            state: FlowState::default(),
            catalog,
            store,
            admin: AdminSession::new(),
            clock: Arc::new(SystemClock::new()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn page(&self) -> Page {
        self.state.page
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    fn require_page(&self, page: Page, action: &'static str) -> Result<(), Notice> {
        if self.state.page != page {
            return Err(Notice::NotAvailable {
                page: self.state.page,
                action,
            });
        }
        Ok(())
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), Notice> {
        self.require_page(Page::Form, "name")?;
        self.state.name = name.to_string();
        Ok(())
    }

    /// Select an age group; an empty value clears the selection
    pub fn set_age_group(&mut self, value: &str) -> Result<(), Notice> {
        self.require_page(Page::Form, "ageGroup")?;
        self.state.age_group = self.select(value, "ageGroup", |c, v| c.contains_age_group(v))?;
        Ok(())
    }

    /// Select a job function; an empty value clears the selection
    pub fn set_job_function(&mut self, value: &str) -> Result<(), Notice> {
        self.require_page(Page::Form, "jobFunction")?;
        self.state.job_function =
            self.select(value, "jobFunction", |c, v| c.contains_job_function(v))?;
        Ok(())
    }

    /// Update any of the identity fields at once
    ///
    /// `None` leaves a field as it is. Every given option is checked before
    /// anything is assigned, so a rejected update changes nothing.
    pub fn set_identity(
        &mut self,
        name: Option<&str>,
        age_group: Option<&str>,
        job_function: Option<&str>,
    ) -> Result<(), Notice> {
        self.require_page(Page::Form, "identity")?;
        let age_group = age_group
            .map(|v| self.select(v, "ageGroup", |c, v| c.contains_age_group(v)))
            .transpose()?;
        let job_function = job_function
            .map(|v| self.select(v, "jobFunction", |c, v| c.contains_job_function(v)))
            .transpose()?;

        if let Some(name) = name {
            self.state.name = name.to_string();
        }
        if let Some(age_group) = age_group {
            self.state.age_group = age_group;
        }
        if let Some(job_function) = job_function {
            self.state.job_function = job_function;
        }
        Ok(())
    }

    fn select(
        &self,
        value: &str,
        field: &'static str,
        known: impl Fn(&QuestionCatalog, &str) -> bool,
    ) -> Result<Option<String>, Notice> {
        if value.is_empty() {
            return Ok(None);
        }
        if !known(&self.catalog, value) {
            return Err(Notice::UnknownOption {
                field,
                value: value.to_string(),
            });
        }
        Ok(Some(value.to_string()))
    }

    /// Record the answer to question `index`
    pub fn answer(&mut self, index: usize, value: u8) -> Result<(), Notice> {
        self.require_page(Page::Assessment, "answer")?;
        self.state
            .answers
            .record(index, value, self.catalog.len())
            .map_err(|_| Notice::InvalidAnswer { index, value })?;
        debug!(
            "Answered question {} with {} ({}/{} answered)",
            index,
            value,
            self.state.answers.answered(),
            self.catalog.len()
        );
        Ok(())
    }

    /// Apply `event`, running its side effect before committing
    pub async fn dispatch(&mut self, event: FlowEvent) -> Result<Outcome, FlowError> {
        let from = self.state.page;
        let transition = {
            let ctx = FlowContext {
                catalog: &self.catalog,
                admin: &self.admin,
                clock: self.clock.as_ref(),
            };
            self.state.transition(&event, &ctx)
        };

        let transition = match transition {
            Ok(t) => t,
            Err(notice) => {
                debug!("Flow {} rejected '{}': {}", from, event.name(), notice);
                return Err(notice.into());
            }
        };

        let persisted = match transition.effect {
            Some(Effect::Persist(submission)) => {
                self.store.append(submission.clone()).await?;
                info!(
                    "Stored submission {} for '{}' (score {})",
                    submission.id,
                    submission.name,
                    format_score(submission.score)
                );
                Some(submission)
            }
            None => None,
        };

        self.state = transition.next;
        info!("Flow {} -> {} on '{}'", from, self.state.page, event.name());

        Ok(Outcome {
            page: self.state.page,
            persisted,
        })
    }

    pub async fn start(&mut self) -> Result<Outcome, FlowError> {
        self.dispatch(FlowEvent::Start).await
    }

    pub async fn complete(&mut self) -> Result<Outcome, FlowError> {
        self.dispatch(FlowEvent::Complete).await
    }

    pub async fn restart(&mut self) -> Result<Outcome, FlowError> {
        self.dispatch(FlowEvent::Restart).await
    }

    pub async fn open_admin(&mut self) -> Result<Outcome, FlowError> {
        self.dispatch(FlowEvent::Admin).await
    }

    pub async fn login(&mut self, password: &str) -> Result<Outcome, FlowError> {
        self.dispatch(FlowEvent::Login(password.to_string())).await
    }

    pub async fn back(&mut self) -> Result<Outcome, FlowError> {
        self.dispatch(FlowEvent::Back).await
    }

    /// Name and two-decimal score, once on the results page
    pub fn results_view(&self) -> Option<ResultsView> {
        if self.state.page != Page::Results {
            return None;
        }
        let score = self.state.score?;
        Some(ResultsView {
            name: self.state.name.clone(),
            score: format_score(score),
        })
    }
}
