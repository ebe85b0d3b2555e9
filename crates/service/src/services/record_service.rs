use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use models::errors::ModelError;
use models::HealthRecord;

use crate::clock::{datetime_from_nanos, Clock};
use crate::errors::ServiceError;
use crate::storage::record_store::RecordStore;

/// CRUD orchestration over the record store: id generation, timestamp
/// stamping, and merge-based partial update.
///
/// Both collaborators are explicit handles so tests can substitute an
/// in-memory store and a manual clock. A read-modify-write such as `update`
/// is not transactional; concurrent updates to the same id resolve
/// last-write-wins.
pub struct RecordService {
    store: Arc<RecordStore>,
    clock: Arc<dyn Clock>,
}

/// Shallow last-write-wins merge: every field in `patch` replaces the field
/// of the same name in `doc`.
fn overlay(doc: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (field, value) in patch {
        doc.insert(field, value);
    }
}

impl RecordService {
    pub fn new(store: Arc<RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    fn now_value(&self) -> Result<Value, ServiceError> {
        serde_json::to_value(datetime_from_nanos(self.clock.now_nanos()))
            .map_err(|e| ServiceError::Model(ModelError::Malformed(e.to_string())))
    }

    /// Create a record from the caller's partial field map.
    ///
    /// Caller fields land last in the merge, so supplied values win over the
    /// generated id and timestamps. That permissiveness mirrors the stored
    /// contract; it is not a validation gap to close here.
    pub async fn create(&self, fields: Map<String, Value>) -> Result<HealthRecord, ServiceError> {
        let mut doc = Map::new();
        doc.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
        doc.insert("createdAt".into(), self.now_value()?);
        doc.insert("updatedAt".into(), Value::Null);
        overlay(&mut doc, fields);

        let record = HealthRecord::from_document(doc)?;
        self.store.insert(record.id.clone(), record.clone()).await?;
        debug!(id = %record.id, "created health record");
        Ok(record)
    }

    pub async fn get_one(&self, id: &str) -> Result<HealthRecord, ServiceError> {
        self.store
            .get(id)
            .await
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    /// All records, in the store's ascending key order.
    pub async fn get_all(&self) -> Vec<HealthRecord> {
        self.store.values().await
    }

    /// Merge a partial field map into an existing record.
    ///
    /// Merge order: existing fields, then caller fields, then `updatedAt`
    /// stamped from the clock. The stamp lands after the caller's fields so
    /// it always reflects this write, whatever the body said. The replace
    /// happens under the looked-up key even if the body rewrote `id`.
    pub async fn update(
        &self,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<HealthRecord, ServiceError> {
        let existing = self
            .store
            .get(id)
            .await
            .ok_or_else(|| ServiceError::UpdateTargetMissing(id.to_string()))?;

        let mut doc = existing.to_document()?;
        overlay(&mut doc, fields);
        doc.insert("updatedAt".into(), self.now_value()?);

        let updated = HealthRecord::from_document(doc)?;
        self.store.insert(existing.id, updated.clone()).await?;
        debug!(id = %id, "updated health record");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<HealthRecord, ServiceError> {
        let removed = self.store.remove(id).await?;
        match removed {
            Some(record) => {
                debug!(id = %id, "deleted health record");
                Ok(record)
            }
            None => Err(ServiceError::DeleteTargetMissing(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Deterministic clock: every reading advances one millisecond, so
    /// successive stamps strictly increase.
    struct ManualClock(AtomicU64);

    impl ManualClock {
        fn starting_at(nanos: u64) -> Arc<Self> {
            Arc::new(Self(AtomicU64::new(nanos)))
        }
    }

    impl Clock for ManualClock {
        fn now_nanos(&self) -> u64 {
            self.0.fetch_add(1_000_000, Ordering::SeqCst)
        }
    }

    fn service() -> RecordService {
        RecordService::new(
            RecordStore::in_memory(),
            ManualClock::starting_at(1_700_000_000_000_000_000),
        )
    }

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[tokio::test]
    async fn create_then_get_one_round_trips() {
        let svc = service();
        let created = svc
            .create(fields(json!({
                "patientName": "Jane Doe",
                "diagnosis": "Flu",
                "treatmentPlan": "Rest"
            })))
            .await
            .unwrap();

        assert!(!created.id.is_empty());
        assert!(created.updated_at.is_none());
        assert_eq!(created.patient_name.as_deref(), Some("Jane Doe"));

        let fetched = svc.get_one(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_all_returns_every_created_record() {
        let svc = service();
        let mut ids = Vec::new();
        for i in 0..5 {
            let rec = svc
                .create(fields(json!({"patientName": format!("Patient {i}")})))
                .await
                .unwrap();
            ids.push(rec.id);
        }

        let all = svc.get_all().await;
        assert_eq!(all.len(), 5);
        for id in &ids {
            assert!(svc.get_one(id).await.is_ok());
        }
    }

    #[tokio::test]
    async fn empty_update_only_bumps_updated_at() {
        let svc = service();
        let created = svc
            .create(fields(json!({"patientName": "Jane Doe", "diagnosis": "Flu"})))
            .await
            .unwrap();

        let updated = svc.update(&created.id, Map::new()).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.patient_name, created.patient_name);
        assert_eq!(updated.diagnosis, created.diagnosis);
        assert_eq!(updated.treatment_plan, created.treatment_plan);
        assert_eq!(updated.created_at, created.created_at);
        let stamped = updated.updated_at.expect("updatedAt set");
        assert!(stamped >= created.created_at);
    }

    #[tokio::test]
    async fn repeated_update_differs_only_in_timestamp() {
        let svc = service();
        let created = svc.create(Map::new()).await.unwrap();

        let patch = fields(json!({"diagnosis": "Recovered"}));
        let first = svc.update(&created.id, patch.clone()).await.unwrap();
        let second = svc.update(&created.id, patch).await.unwrap();

        assert_eq!(second.diagnosis.as_deref(), Some("Recovered"));
        assert!(second.updated_at.unwrap() > first.updated_at.unwrap());

        let mut second_without_stamp = second.clone();
        second_without_stamp.updated_at = first.updated_at;
        assert_eq!(second_without_stamp, first);
    }

    #[tokio::test]
    async fn update_merges_partial_fields() {
        let svc = service();
        let created = svc
            .create(fields(json!({
                "patientName": "Jane Doe",
                "diagnosis": "Flu",
                "treatmentPlan": "Rest"
            })))
            .await
            .unwrap();

        let updated = svc
            .update(&created.id, fields(json!({"diagnosis": "Recovered"})))
            .await
            .unwrap();

        assert_eq!(updated.diagnosis.as_deref(), Some("Recovered"));
        assert_eq!(updated.patient_name.as_deref(), Some("Jane Doe"));
        assert_eq!(updated.treatment_plan.as_deref(), Some("Rest"));
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.unwrap() >= created.created_at);
    }

    #[tokio::test]
    async fn delete_then_get_one_is_not_found() {
        let svc = service();
        let created = svc.create(Map::new()).await.unwrap();

        let removed = svc.delete(&created.id).await.unwrap();
        assert_eq!(removed.id, created.id);

        match svc.get_one(&created.id).await {
            Err(ServiceError::NotFound(id)) => assert_eq!(id, created.id),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn misses_map_to_distinct_errors_with_exact_messages() {
        let svc = service();

        let err = svc.get_one("ghost").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(err.to_string(), "Health record with id=ghost not found");

        let err = svc.update("ghost", Map::new()).await.unwrap_err();
        assert!(matches!(err, ServiceError::UpdateTargetMissing(_)));
        assert_eq!(
            err.to_string(),
            "Couldn't update health record with id=ghost. Record not found."
        );

        let err = svc.delete("ghost").await.unwrap_err();
        assert!(matches!(err, ServiceError::DeleteTargetMissing(_)));
        assert_eq!(
            err.to_string(),
            "Couldn't delete health record with id=ghost. Record not found."
        );
    }

    #[tokio::test]
    async fn caller_may_override_generated_fields_on_create() {
        let svc = service();
        let created = svc
            .create(fields(json!({
                "id": "chosen-id",
                "updatedAt": "2030-01-01T00:00:00Z"
            })))
            .await
            .unwrap();

        assert_eq!(created.id, "chosen-id");
        assert!(created.updated_at.is_some());
        assert!(svc.get_one("chosen-id").await.is_ok());
    }

    #[tokio::test]
    async fn update_keeps_the_original_store_key() {
        let svc = service();
        let created = svc.create(Map::new()).await.unwrap();

        let updated = svc
            .update(&created.id, fields(json!({"id": "renamed"})))
            .await
            .unwrap();
        assert_eq!(updated.id, "renamed");

        // Stored under the looked-up key, not the rewritten id field.
        let fetched = svc.get_one(&created.id).await.unwrap();
        assert_eq!(fetched.id, "renamed");
        assert!(svc.get_one("renamed").await.is_err());
    }

    #[tokio::test]
    async fn unknown_fields_are_absorbed() {
        let svc = service();
        let created = svc
            .create(fields(json!({"insuranceNumber": "INS-42"})))
            .await
            .unwrap();
        assert_eq!(created.extra["insuranceNumber"], json!("INS-42"));

        let fetched = svc.get_one(&created.id).await.unwrap();
        assert_eq!(fetched.extra["insuranceNumber"], json!("INS-42"));
    }

    #[tokio::test]
    async fn malformed_override_is_a_model_error() {
        let svc = service();
        let err = svc
            .create(fields(json!({"createdAt": {"not": "a date"}})))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));
    }

    #[tokio::test]
    async fn update_timestamps_never_precede_creation() {
        let svc = service();
        let created = svc.create(Map::new()).await.unwrap();
        let mut last = created.created_at;
        for _ in 0..3 {
            let updated = svc.update(&created.id, Map::new()).await.unwrap();
            let stamped = updated.updated_at.unwrap();
            assert!(stamped >= last);
            last = stamped;
        }
    }
}
