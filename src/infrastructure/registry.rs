//! In-memory registry of active model slots

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::model::{ModelInfo, ModelSlot};
use crate::domain::policy::ModelVersion;
use crate::domain::DomainError;

/// Holds the set of currently deployed model slots, keyed by version.
///
/// Read-mostly: every routed request looks a slot up, while registration
/// and unregistration happen only on administrative promotion. Re-registering
/// an existing version swaps the `Arc` atomically, so in-flight predictions
/// on the old slot finish against the object they already hold.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    slots: RwLock<HashMap<ModelVersion, Arc<dyn ModelSlot>>>,
}

impl ModelRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a slot under its version, replacing any previous slot for
    /// that version
    pub fn register(&self, slot: Arc<dyn ModelSlot>) -> Result<(), DomainError> {
        let mut slots = self
            .slots
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to acquire write lock: {}", e)))?;

        slots.insert(slot.version().clone(), slot);
        Ok(())
    }

    /// Remove a version from the registry; returns whether it was present
    pub fn unregister(&self, version: &ModelVersion) -> Result<bool, DomainError> {
        let mut slots = self
            .slots
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to acquire write lock: {}", e)))?;

        Ok(slots.remove(version).is_some())
    }

    /// Look up the slot for a version
    pub fn get(&self, version: &ModelVersion) -> Result<Option<Arc<dyn ModelSlot>>, DomainError> {
        let slots = self
            .slots
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(slots.get(version).cloned())
    }

    /// Versions currently registered
    pub fn versions(&self) -> Result<Vec<ModelVersion>, DomainError> {
        let slots = self
            .slots
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(slots.keys().cloned().collect())
    }

    /// Metadata for every registered model
    pub fn model_info(&self) -> Result<Vec<ModelInfo>, DomainError> {
        let slots = self
            .slots
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(slots.values().map(|slot| slot.info()).collect())
    }

    /// Number of registered versions
    pub fn len(&self) -> Result<usize, DomainError> {
        let slots = self
            .slots
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(slots.len())
    }

    pub fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::model::StaticModelSlot;

    fn version(v: &str) -> ModelVersion {
        ModelVersion::new(v).unwrap()
    }

    fn slot(v: &str) -> Arc<dyn ModelSlot> {
        Arc::new(StaticModelSlot::new(version(v), vec![0.4, 0.6]))
    }

    #[test]
    fn test_register_and_get() {
        let registry = ModelRegistry::new();
        registry.register(slot("v1")).unwrap();

        let fetched = registry.get(&version("v1")).unwrap();
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().version().as_str(), "v1");
        assert_eq!(registry.len().unwrap(), 1);
    }

    #[test]
    fn test_get_missing_version() {
        let registry = ModelRegistry::new();
        assert!(registry.get(&version("v9")).unwrap().is_none());
    }

    #[test]
    fn test_unregister() {
        let registry = ModelRegistry::new();
        registry.register(slot("v1")).unwrap();

        assert!(registry.unregister(&version("v1")).unwrap());
        assert!(!registry.unregister(&version("v1")).unwrap());
        assert!(registry.is_empty().unwrap());
    }

    #[test]
    fn test_register_replaces_existing_slot() {
        let registry = ModelRegistry::new();
        registry.register(slot("v1")).unwrap();

        let replacement: Arc<dyn ModelSlot> =
            Arc::new(StaticModelSlot::new(version("v1"), vec![0.1, 0.9]));
        registry.register(replacement).unwrap();

        assert_eq!(registry.len().unwrap(), 1);
    }

    #[test]
    fn test_model_info_lists_all_slots() {
        let registry = ModelRegistry::new();
        registry.register(slot("v1")).unwrap();
        registry.register(slot("v2")).unwrap();

        let info = registry.model_info().unwrap();
        assert_eq!(info.len(), 2);
    }
}
