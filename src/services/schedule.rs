//! Schedule registry service
//!
//! Validates new schedule entries against the recipient directory and
//! produces the weekday-ordered listing used for display and billing.

use std::cmp::Ordering;

use tracing::{info, warn};

use crate::audit::EntityType;
use crate::error::{BillingError, BillingResult};
use crate::models::{Recipient, RecipientId, ScheduleEntry, ScheduleId, ServiceType, UnitKey, Weekday};
use crate::storage::Storage;

/// A schedule entry joined with its recipient
#[derive(Debug, Clone)]
pub struct ScheduleListing {
    pub entry: ScheduleEntry,
    pub recipient: Recipient,
}

/// Listing order: weekday, surname, service type (work first), first name
pub fn compare_listings(a: &ScheduleListing, b: &ScheduleListing) -> Ordering {
    a.entry
        .weekday
        .cmp(&b.entry.weekday)
        .then_with(|| {
            a.recipient
                .last_name
                .to_lowercase()
                .cmp(&b.recipient.last_name.to_lowercase())
        })
        .then_with(|| a.entry.service_type.cmp(&b.entry.service_type))
        .then_with(|| {
            a.recipient
                .first_name
                .to_lowercase()
                .cmp(&b.recipient.first_name.to_lowercase())
        })
}

/// Service for the schedule registry
pub struct ScheduleService<'a> {
    storage: &'a Storage,
}

impl<'a> ScheduleService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a schedule entry from user-typed weekday and service type
    pub fn add_schedule(
        &self,
        recipient_id: RecipientId,
        weekday: &str,
        service_type: &str,
    ) -> BillingResult<ScheduleEntry> {
        let weekday = Weekday::parse(weekday).ok_or_else(|| {
            BillingError::Validation(format!(
                "'{}' is not a weekday (monday through friday)",
                weekday.trim()
            ))
        })?;
        let service_type = ServiceType::parse(service_type).ok_or_else(|| {
            BillingError::Validation(format!(
                "'{}' is not a service type (work or trip)",
                service_type.trim()
            ))
        })?;

        self.add(recipient_id, weekday, service_type)
    }

    /// Add a schedule entry
    ///
    /// Checks, in order: the recipient exists, the recipient holds a valid
    /// code for the service type, and the slot is not already taken.
    pub fn add(
        &self,
        recipient_id: RecipientId,
        weekday: Weekday,
        service_type: ServiceType,
    ) -> BillingResult<ScheduleEntry> {
        let recipient = self
            .storage
            .recipients
            .get(recipient_id)?
            .ok_or_else(|| BillingError::UnknownRecipient(recipient_id.to_string()))?;

        if !recipient.is_valid_service_code(service_type) {
            return Err(BillingError::IneligibleServiceCode {
                recipient: recipient.to_string(),
                service_type: service_type.to_string(),
            });
        }

        let key = UnitKey::new(recipient_id, weekday, service_type);
        if self.storage.schedules.find_by_key(&key)?.is_some() {
            return Err(BillingError::DuplicateSchedule {
                recipient: recipient.to_string(),
                weekday: weekday.to_string(),
                service_type: service_type.to_string(),
            });
        }

        let entry = ScheduleEntry::new(recipient_id, weekday, service_type);
        self.storage.schedules.upsert(entry.clone())?;
        self.storage.schedules.save()?;

        self.storage.log_create(
            EntityType::Schedule,
            entry.id.to_string(),
            Some(format!("{} {} {}", recipient, weekday, service_type)),
            &entry,
        )?;

        info!(
            schedule = %entry.id,
            recipient = %recipient_id,
            weekday = weekday.as_str(),
            service_type = service_type.as_str(),
            "schedule added"
        );
        Ok(entry)
    }

    /// Remove a schedule entry; a missing id is not an error
    pub fn delete_schedule(&self, id: ScheduleId) -> BillingResult<Option<ScheduleEntry>> {
        let Some(entry) = self.storage.schedules.delete(id)? else {
            return Ok(None);
        };
        self.storage.schedules.save()?;

        self.storage
            .log_delete(EntityType::Schedule, id.to_string(), None, &entry)?;

        info!(schedule = %id, "schedule deleted");
        Ok(Some(entry))
    }

    /// Find an entry by full id or `sch-` prefixed short id
    pub fn find(&self, identifier: &str) -> BillingResult<Option<ScheduleEntry>> {
        let identifier = identifier.trim();

        if let Ok(id) = identifier.parse::<ScheduleId>() {
            return self.storage.schedules.get(id);
        }

        // Short display ids ("sch-1a2b3c4d") only carry the first 8 hex digits
        let prefix = identifier.strip_prefix("sch-").unwrap_or(identifier);
        if prefix.is_empty() {
            return Ok(None);
        }
        let matches: Vec<_> = self
            .storage
            .schedules
            .get_all()?
            .into_iter()
            .filter(|s| s.id.as_uuid().to_string().starts_with(prefix))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.into_iter().next()),
            n => Err(BillingError::Validation(format!(
                "'{}' matches {} schedules; use a longer id",
                identifier, n
            ))),
        }
    }

    /// All raw entries, including any whose recipient has gone missing
    pub fn entries(&self) -> BillingResult<Vec<ScheduleEntry>> {
        self.storage.schedules.get_all()
    }

    /// Entries joined with their recipients in listing order
    ///
    /// Entries whose recipient is missing are left out.
    pub fn list(&self) -> BillingResult<Vec<ScheduleListing>> {
        let mut listings = Vec::new();

        for entry in self.storage.schedules.get_all()? {
            match self.storage.recipients.get(entry.recipient_id)? {
                Some(recipient) => listings.push(ScheduleListing { entry, recipient }),
                None => warn!(
                    schedule = %entry.id,
                    recipient = %entry.recipient_id,
                    "schedule references a missing recipient, skipping"
                ),
            }
        }

        listings.sort_by(compare_listings);
        Ok(listings)
    }

    /// Listing restricted to one weekday
    pub fn list_for_weekday(&self, weekday: Weekday) -> BillingResult<Vec<ScheduleListing>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|l| l.entry.weekday == weekday)
            .collect())
    }

    pub fn count(&self) -> BillingResult<usize> {
        self.storage.schedules.count()
    }
}
