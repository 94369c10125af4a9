//! Billing reconciliation
//!
//! Joins the schedule registry with a resolved week and the unit values
//! typed for it, producing the batch of billing entries handed to export.
//!
//! `BillingSession` carries the working state for one anchor week:
//!
//! ```text
//! Empty -> WeekResolved -> Editing -> Submitted
//!   ^                                   |
//!   +---------- new anchor -------------+
//! ```
//!
//! A week that reached `Submitted` cannot be entered again in the same
//! session.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::{BillingError, BillingResult};
use crate::models::billing::parse_unit_value;
use crate::models::week::is_complete_anchor;
use crate::models::{
    resolve_week, BillingEntry, FieldError, FieldKey, Recipient, RecipientId, ResolvedWeek,
    ScheduleEntry, UnitError, UnitField, UnitKey,
};

/// Raw unit values as typed, keyed by schedule slot
pub type UnitInputs = HashMap<UnitKey, String>;

/// Receiver of accepted billing entries
pub trait BatchSink {
    /// Accept a whole batch, or fail without keeping any of it
    fn submit_billing_batch(&self, entries: &[BillingEntry]) -> BillingResult<()>;
}

/// Result of reconciling one week
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillingBatch {
    /// Entries with a valid, populated unit value
    pub entries: Vec<BillingEntry>,
    /// Flagged cells; any of these blocks submission
    pub errors: Vec<FieldError>,
}

impl BillingBatch {
    pub fn is_blocked(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Build the billing entries for a week
///
/// One entry per schedule with a non-blank unit value, in schedule order.
/// Schedules whose recipient is missing are skipped, and inputs for
/// unscheduled slots are ignored.
pub fn build_billing_batch(
    schedules: &[ScheduleEntry],
    recipients: &[Recipient],
    week: &ResolvedWeek,
    unit_inputs: &UnitInputs,
) -> BillingBatch {
    let known: HashMap<RecipientId, &Recipient> =
        recipients.iter().map(|r| (r.id, r)).collect();

    let mut batch = BillingBatch::default();

    for schedule in schedules {
        if !known.contains_key(&schedule.recipient_id) {
            warn!(
                schedule = %schedule.id,
                recipient = %schedule.recipient_id,
                "skipping schedule for missing recipient"
            );
            continue;
        }

        let Some(raw) = unit_inputs.get(&schedule.key()) else {
            continue;
        };

        let date = week.date_for(schedule.weekday);
        let field = UnitField::for_service(schedule.service_type);

        match parse_unit_value(field, raw) {
            Ok(None) => {}
            Ok(Some(value)) => batch
                .entries
                .push(BillingEntry::new(schedule.recipient_id, date).with_units(field, value)),
            Err(error) => batch.errors.push(FieldError {
                key: FieldKey::new(schedule.recipient_id, date, field),
                error,
            }),
        }
    }

    debug!(
        week = %week,
        entries = batch.entries.len(),
        errors = batch.errors.len(),
        "billing batch built"
    );
    batch
}

/// Where a billing session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No complete anchor yet
    Empty,
    /// Week resolved, nothing typed
    WeekResolved,
    /// Unit values being entered
    Editing,
    /// Batch accepted; a different anchor starts over
    Submitted,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::WeekResolved => write!(f, "week resolved"),
            Self::Editing => write!(f, "editing"),
            Self::Submitted => write!(f, "submitted"),
        }
    }
}

/// Working state for billing one week
#[derive(Debug, Clone)]
pub struct BillingSession {
    schedules: Vec<ScheduleEntry>,
    recipients: Vec<Recipient>,
    state: SessionState,
    week: Option<ResolvedWeek>,
    inputs: UnitInputs,
    errors: BTreeMap<FieldKey, UnitError>,
    /// Mondays of the weeks already handed to a sink
    submitted: BTreeSet<NaiveDate>,
}

impl BillingSession {
    /// Start an empty session over the given roster
    pub fn new(schedules: Vec<ScheduleEntry>, recipients: Vec<Recipient>) -> Self {
        Self {
            schedules,
            recipients,
            state: SessionState::Empty,
            week: None,
            inputs: UnitInputs::new(),
            errors: BTreeMap::new(),
            submitted: BTreeSet::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn week(&self) -> Option<&ResolvedWeek> {
        self.week.as_ref()
    }

    pub fn schedules(&self) -> &[ScheduleEntry] {
        &self.schedules
    }

    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    /// Enter (or re-enter) the anchor date
    ///
    /// Any previous week, values and errors are dropped. An anchor with
    /// fewer than six digits leaves the session empty without resolving.
    /// Re-entering a week this session already submitted is refused and
    /// leaves the session untouched.
    pub fn enter_anchor(&mut self, anchor: &str) -> BillingResult<SessionState> {
        let week = if is_complete_anchor(anchor) {
            Some(resolve_week(anchor))
        } else {
            None
        };

        if let Some(Ok(week)) = &week {
            if self.submitted.contains(&week.anchor()) {
                warn!(week = %week, "refusing to reopen a submitted week");
                return Err(BillingError::Session(format!(
                    "The week of {} has already been submitted",
                    week
                )));
            }
        }

        self.state = SessionState::Empty;
        self.week = None;
        self.inputs.clear();
        self.errors.clear();

        let Some(week) = week else {
            return Ok(self.state);
        };

        let week = week?;
        debug!(week = %week, "anchor resolved");
        self.week = Some(week);
        self.state = SessionState::WeekResolved;
        Ok(self.state)
    }

    /// Record a typed unit value for a scheduled slot
    ///
    /// The value is checked immediately. A flagged value is kept so it can
    /// be corrected, and returned so the caller can show it.
    pub fn set_unit(&mut self, key: UnitKey, raw: &str) -> BillingResult<Option<FieldError>> {
        let week = match self.state {
            SessionState::Empty => {
                return Err(BillingError::Session(
                    "Enter a Monday anchor date before entering units".into(),
                ))
            }
            SessionState::Submitted => {
                return Err(BillingError::Session(
                    "This week has been submitted; enter a new anchor to start again".into(),
                ))
            }
            SessionState::WeekResolved | SessionState::Editing => match self.week {
                Some(week) => week,
                None => return Err(BillingError::Session("No week resolved".into())),
            },
        };

        if !self.is_billable(&key) {
            return Err(BillingError::Validation(format!(
                "{} is not scheduled for {} on {}",
                key.recipient_id, key.service_type, key.weekday
            )));
        }

        let field = UnitField::for_service(key.service_type);
        let field_key = FieldKey::new(key.recipient_id, week.date_for(key.weekday), field);

        if raw.trim().is_empty() {
            self.inputs.remove(&key);
        } else {
            self.inputs.insert(key, raw.trim().to_string());
        }
        self.state = SessionState::Editing;

        match parse_unit_value(field, raw) {
            Ok(_) => {
                self.errors.remove(&field_key);
                Ok(None)
            }
            Err(error) => {
                self.errors.insert(field_key, error.clone());
                Ok(Some(FieldError {
                    key: field_key,
                    error,
                }))
            }
        }
    }

    /// The value typed for a slot, if any
    pub fn unit_input(&self, key: &UnitKey) -> Option<&str> {
        self.inputs.get(key).map(String::as_str)
    }

    /// The error flagged on a cell, if any
    pub fn field_error(&self, key: &FieldKey) -> Option<&UnitError> {
        self.errors.get(key)
    }

    /// All flagged cells in key order
    pub fn errors(&self) -> Vec<FieldError> {
        self.errors
            .iter()
            .map(|(key, error)| FieldError {
                key: *key,
                error: error.clone(),
            })
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Reconcile the current values without submitting
    pub fn preview(&self) -> BillingResult<BillingBatch> {
        let week = self
            .week
            .as_ref()
            .ok_or_else(|| BillingError::Session("No week resolved".into()))?;

        Ok(build_billing_batch(
            &self.schedules,
            &self.recipients,
            week,
            &self.inputs,
        ))
    }

    /// Hand the batch to the sink if no cell is flagged
    ///
    /// Nothing is sent while any error remains. On success the session
    /// becomes `Submitted` and returns the number of entries sent.
    pub fn submit(&mut self, sink: &dyn BatchSink) -> BillingResult<usize> {
        match self.state {
            SessionState::Empty => {
                return Err(BillingError::Session(
                    "Enter a Monday anchor date before submitting".into(),
                ))
            }
            SessionState::Submitted => {
                return Err(BillingError::Session(
                    "This week has already been submitted".into(),
                ))
            }
            SessionState::WeekResolved | SessionState::Editing => {}
        }

        if self.has_errors() {
            return Err(BillingError::SubmissionBlocked {
                errors: self.errors(),
            });
        }

        let batch = self.preview()?;
        if batch.is_blocked() {
            return Err(BillingError::SubmissionBlocked {
                errors: batch.errors,
            });
        }
        if batch.entries.is_empty() {
            return Err(BillingError::Session(
                "No units entered for this week".into(),
            ));
        }

        sink.submit_billing_batch(&batch.entries)?;
        self.state = SessionState::Submitted;
        if let Some(week) = &self.week {
            self.submitted.insert(week.anchor());
        }

        info!(entries = batch.entries.len(), "billing batch submitted");
        Ok(batch.entries.len())
    }

    fn is_billable(&self, key: &UnitKey) -> bool {
        self.schedules.iter().any(|s| s.key() == *key)
            && self.recipients.iter().any(|r| r.id == key.recipient_id)
    }
}
