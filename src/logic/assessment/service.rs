//! Assessment Service - engine plus device and history repositories

use std::sync::Arc;

use super::engine::AssessmentEngine;
use super::repository::{InMemoryRepository, Repository};
use super::types::{AssessmentRequest, AssessmentResult, HistoryEntry};
use crate::logic::error::RiskResult;
use crate::logic::knowledge::{InMemoryKnowledgeStore, KnowledgeStore};
use crate::logic::record::Device;

pub struct AssessmentService<K: KnowledgeStore = InMemoryKnowledgeStore> {
    engine: Arc<AssessmentEngine<K>>,
    devices: Box<dyn Repository<Device>>,
    history: Box<dyn Repository<HistoryEntry>>,
}

impl<K: KnowledgeStore> AssessmentService<K> {
    pub fn new(
        engine: Arc<AssessmentEngine<K>>,
        devices: Box<dyn Repository<Device>>,
        history: Box<dyn Repository<HistoryEntry>>,
    ) -> Self {
        Self {
            engine,
            devices,
            history,
        }
    }

    /// Service over empty in-memory repositories
    pub fn in_memory(engine: Arc<AssessmentEngine<K>>) -> Self {
        Self::new(
            engine,
            Box::new(InMemoryRepository::new()),
            Box::new(InMemoryRepository::new()),
        )
    }

    pub fn engine(&self) -> &AssessmentEngine<K> {
        &self.engine
    }

    pub fn register_device(&self, device: Device) -> RiskResult<Device> {
        device.validate()?;
        let device = self.devices.create(device)?;
        log::info!("Registered device {} ({})", device.id, device.device_type);
        Ok(device)
    }

    pub fn device(&self, id: &str) -> RiskResult<Device> {
        self.devices.get(id)
    }

    pub fn devices(&self) -> Vec<Device> {
        self.devices.list()
    }

    /// Assess a registered device and record the outcome in its history
    pub fn assess_device(&self, device_id: &str, request: &AssessmentRequest) -> RiskResult<AssessmentResult> {
        let device = self.devices.get(device_id)?;
        let result = self.engine.assess(&device, request)?;
        self.history.create(HistoryEntry::from_result(&result))?;
        Ok(result)
    }

    /// Past assessments of one device, oldest first
    pub fn history_for(&self, device_id: &str) -> RiskResult<Vec<HistoryEntry>> {
        self.devices.get(device_id)?;
        let mut entries: Vec<HistoryEntry> = self
            .history
            .list()
            .into_iter()
            .filter(|e| e.device_id == device_id)
            .collect();
        entries.sort_by_key(|e| e.timestamp);
        Ok(entries)
    }

    /// Mark a history entry resolved
    pub fn resolve(&self, entry_id: &str) -> RiskResult<HistoryEntry> {
        let mut entry = self.history.get(entry_id)?;
        entry.resolve();
        let entry = self.history.update(entry)?;
        log::info!("Resolved assessment {} for device {}", entry.id, entry.device_id);
        Ok(entry)
    }
}
