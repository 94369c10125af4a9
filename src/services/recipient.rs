//! Recipient directory service
//!
//! Adds, looks up and removes recipients, and answers the service-code
//! eligibility question the schedule registry asks before accepting an entry.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{BillingError, BillingResult};
use crate::models::recipient::is_valid_medicaid_id;
use crate::models::{
    Recipient, RecipientId, RecipientValidationError, ServiceType, TripServiceCode,
    WorkServiceCode,
};
use crate::storage::Storage;

/// Raw fields for a new recipient, as typed by the user
#[derive(Debug, Clone, Default)]
pub struct NewRecipient {
    pub last_name: String,
    pub first_name: String,
    pub medicaid_id: String,
    /// Blank or absent means work is not billed
    pub work_service_code: Option<String>,
    /// Blank or absent means trips are not billed
    pub trip_service_code: Option<String>,
}

/// Whether a recipient holds a valid code for the given service type
pub fn is_valid_service_code(recipient: &Recipient, service_type: ServiceType) -> bool {
    recipient.is_valid_service_code(service_type)
}

/// Service for the recipient directory
pub struct RecipientService<'a> {
    storage: &'a Storage,
}

impl<'a> RecipientService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a recipient to the directory
    pub fn create(&self, fields: NewRecipient) -> BillingResult<Recipient> {
        let medicaid_id = fields.medicaid_id.trim();
        if !is_valid_medicaid_id(medicaid_id) {
            return Err(BillingError::Validation(
                RecipientValidationError::InvalidMedicaidId(medicaid_id.to_string()).to_string(),
            ));
        }

        if self.storage.recipients.get_by_medicaid_id(medicaid_id)?.is_some() {
            return Err(BillingError::Validation(format!(
                "Medicaid ID {} is already registered",
                medicaid_id
            )));
        }

        let work_code = parse_code(fields.work_service_code.as_deref(), |s| {
            WorkServiceCode::parse(s).ok_or(RecipientValidationError::UnknownWorkCode(s.into()))
        })?;
        let trip_code = parse_code(fields.trip_service_code.as_deref(), |s| {
            TripServiceCode::parse(s).ok_or(RecipientValidationError::UnknownTripCode(s.into()))
        })?;

        let mut recipient = Recipient::new(
            fields.last_name.trim(),
            fields.first_name.trim(),
            medicaid_id,
        );
        recipient.work_service_code = work_code;
        recipient.trip_service_code = trip_code;

        recipient
            .validate()
            .map_err(|e| BillingError::Validation(e.to_string()))?;

        self.storage.recipients.upsert(recipient.clone())?;
        self.storage.recipients.save()?;

        self.storage.log_create(
            EntityType::Recipient,
            recipient.id.to_string(),
            Some(recipient.to_string()),
            &recipient,
        )?;

        info!(recipient = %recipient.id, name = %recipient, "recipient added");
        Ok(recipient)
    }

    /// Look up a recipient by id
    pub fn find_by_id(&self, id: RecipientId) -> BillingResult<Option<Recipient>> {
        self.storage.recipients.get(id)
    }

    /// Find a recipient by id, short `rcp-` id or Medicaid ID
    pub fn find(&self, identifier: &str) -> BillingResult<Option<Recipient>> {
        let identifier = identifier.trim();

        if let Ok(id) = identifier.parse::<RecipientId>() {
            if let Some(recipient) = self.storage.recipients.get(id)? {
                return Ok(Some(recipient));
            }
        }

        if let Some(recipient) = self.storage.recipients.get_by_medicaid_id(identifier)? {
            return Ok(Some(recipient));
        }

        let Some(prefix) = identifier.strip_prefix("rcp-").filter(|p| !p.is_empty()) else {
            return Ok(None);
        };
        let mut matches = self
            .storage
            .recipients
            .get_all()?
            .into_iter()
            .filter(|r| r.id.as_uuid().to_string().starts_with(prefix));

        match (matches.next(), matches.next()) {
            (Some(recipient), None) => Ok(Some(recipient)),
            (None, _) => Ok(None),
            (Some(_), Some(_)) => Err(BillingError::Validation(format!(
                "'{}' matches more than one recipient; use the Medicaid ID",
                identifier
            ))),
        }
    }

    /// All recipients ordered by surname
    pub fn list(&self) -> BillingResult<Vec<Recipient>> {
        self.storage.recipients.get_all()
    }

    /// Remove a recipient and every schedule entry that references them
    pub fn delete(&self, id: RecipientId) -> BillingResult<Recipient> {
        let recipient = self
            .storage
            .recipients
            .get(id)?
            .ok_or_else(|| BillingError::recipient_not_found(id.to_string()))?;

        self.storage.recipients.delete(id)?;
        let removed_schedules = self.storage.schedules.delete_by_recipient(id)?;

        self.storage.recipients.save()?;
        self.storage.schedules.save()?;

        self.storage.log_delete(
            EntityType::Recipient,
            id.to_string(),
            Some(recipient.to_string()),
            &recipient,
        )?;

        info!(
            recipient = %id,
            removed_schedules,
            "recipient deleted"
        );
        Ok(recipient)
    }

    pub fn count(&self) -> BillingResult<usize> {
        self.storage.recipients.count()
    }
}

/// Blank means absent; anything else must parse
fn parse_code<T>(
    raw: Option<&str>,
    parse: impl Fn(&str) -> Result<T, RecipientValidationError>,
) -> BillingResult<Option<T>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(code) => parse(code)
            .map(Some)
            .map_err(|e| BillingError::Validation(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BillingPaths;
    use crate::models::{ScheduleEntry, Weekday};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BillingPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn jane() -> NewRecipient {
        NewRecipient {
            last_name: "Doe".into(),
            first_name: "Jane".into(),
            medicaid_id: "123456789012".into(),
            work_service_code: Some("adf".into()),
            trip_service_code: Some("".into()),
        }
    }

    #[test]
    fn test_create_recipient() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RecipientService::new(&storage);

        let recipient = service.create(jane()).unwrap();
        assert_eq!(recipient.work_service_code, Some(WorkServiceCode::Adf));
        assert_eq!(recipient.trip_service_code, None);

        assert!(is_valid_service_code(&recipient, ServiceType::Work));
        assert!(!is_valid_service_code(&recipient, ServiceType::Trip));

        let entries = storage.audit().entries().unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_medicaid_id_must_be_twelve_digits() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RecipientService::new(&storage);

        for bad in ["12345", "1234567890123", "12345678901x", ""] {
            let mut fields = jane();
            fields.medicaid_id = bad.into();
            let err = service.create(fields).unwrap_err();
            assert!(err.is_validation(), "{bad} should be rejected");
        }
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_medicaid_id_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RecipientService::new(&storage);

        service.create(jane()).unwrap();
        let mut again = jane();
        again.first_name = "Janet".into();
        assert!(service.create(again).unwrap_err().is_validation());
    }

    #[test]
    fn test_unknown_code_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RecipientService::new(&storage);

        let mut fields = jane();
        fields.trip_service_code = Some("XYZ".into());
        assert!(service.create(fields).unwrap_err().is_validation());
    }

    #[test]
    fn test_names_required() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RecipientService::new(&storage);

        let mut fields = jane();
        fields.first_name = "   ".into();
        assert!(service.create(fields).unwrap_err().is_validation());
    }

    #[test]
    fn test_find_by_id_and_medicaid_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RecipientService::new(&storage);

        let recipient = service.create(jane()).unwrap();

        let by_uuid = service
            .find(&recipient.id.as_uuid().to_string())
            .unwrap()
            .unwrap();
        assert_eq!(by_uuid.id, recipient.id);

        let by_medicaid = service.find("123456789012").unwrap().unwrap();
        assert_eq!(by_medicaid.id, recipient.id);

        let by_short = service.find(&recipient.id.to_string()).unwrap().unwrap();
        assert_eq!(by_short.id, recipient.id);
        assert!(service.find("rcp-").unwrap().is_none());

        assert!(service.find("999999999999").unwrap().is_none());
        assert!(service.find_by_id(RecipientId::new()).unwrap().is_none());
    }

    #[test]
    fn test_delete_cascades_schedules() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RecipientService::new(&storage);

        let recipient = service.create(jane()).unwrap();
        storage
            .schedules
            .upsert(ScheduleEntry::new(
                recipient.id,
                Weekday::Monday,
                ServiceType::Work,
            ))
            .unwrap();

        service.delete(recipient.id).unwrap();
        assert_eq!(service.count().unwrap(), 0);
        assert_eq!(storage.schedules.count().unwrap(), 0);
    }

    #[test]
    fn test_delete_unknown_is_not_found() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RecipientService::new(&storage);

        let err = service.delete(RecipientId::new()).unwrap_err();
        assert!(err.is_not_found());
    }
}
