//! The patient census: every tracked patient plus the active selection.
//!
//! The census is the single mutation surface for patient records. The
//! derived-value engine only ever reads records; anything that changes a
//! chart goes through [`PatientCensus::update`] or
//! [`PatientCensus::replace`].
//!
//! Operations are total: acting on an id that is not present is a silent
//! no-op rather than an error, so stale references from the display layer
//! can never crash a round.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::PatientRecord;

/// The persisted shape: the patient map plus the active selection.
///
/// This is exactly the in-memory shape; the persistence collaborator
/// stores it as an opaque JSON blob and hands it back on startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub patients: BTreeMap<String, PatientRecord>,
    pub active_patient_id: Option<String>,
}

/// All tracked patients, keyed by an opaque stable id.
///
/// Keys are unique; iteration order (sorted by id) matters only for display
/// and for the deterministic choice of a replacement active patient after a
/// delete.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatientCensus {
    patients: BTreeMap<String, PatientRecord>,
    active: Option<String>,
}

impl PatientCensus {
    /// An empty census with no active patient.
    pub fn new() -> Self {
        PatientCensus::default()
    }

    /// Admits a new blank patient and makes it the active one.
    ///
    /// # Returns
    ///
    /// The generated id (`bed-` prefix plus a 32-hex uuid), guaranteed not
    /// to collide with any existing key.
    pub fn add(&mut self) -> String {
        let id = format!("bed-{}", Uuid::new_v4().simple());
        self.patients.insert(id.clone(), PatientRecord::blank());
        self.active = Some(id.clone());
        tracing::info!("admitted patient {}", id);
        id
    }

    /// Makes `id` the active patient if it exists.
    ///
    /// Selecting an unknown id keeps the previous selection — clearing it
    /// silently would lose the clinician's place.
    pub fn select(&mut self, id: &str) {
        if self.patients.contains_key(id) {
            self.active = Some(id.to_owned());
        } else {
            tracing::warn!("select ignored for unknown patient {}", id);
        }
    }

    /// Applies an in-place edit to the record at `id`.
    ///
    /// The closure mutates only the fields it names, which is the merge
    /// contract of a partial update. A missing id is a silent no-op.
    pub fn update(&mut self, id: &str, edit: impl FnOnce(&mut PatientRecord)) {
        match self.patients.get_mut(id) {
            Some(record) => edit(record),
            None => tracing::warn!("update ignored for unknown patient {}", id),
        }
    }

    /// Replaces the whole record at `id`; same missing-id semantics as
    /// [`PatientCensus::update`].
    pub fn replace(&mut self, id: &str, record: PatientRecord) {
        match self.patients.get_mut(id) {
            Some(slot) => *slot = record,
            None => tracing::warn!("replace ignored for unknown patient {}", id),
        }
    }

    /// Discharges the patient at `id`.
    ///
    /// If it was the active patient, the first remaining id (in key order)
    /// becomes active, or the selection clears when the census empties.
    pub fn remove(&mut self, id: &str) {
        if self.patients.remove(id).is_none() {
            tracing::warn!("remove ignored for unknown patient {}", id);
            return;
        }
        if self.active.as_deref() == Some(id) {
            self.active = self.patients.keys().next().cloned();
        }
        tracing::info!("discharged patient {}", id);
    }

    /// The active patient's id, if any.
    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The active patient's id and record, if any.
    pub fn active(&self) -> Option<(&str, &PatientRecord)> {
        let id = self.active.as_deref()?;
        let record = self.patients.get(id)?;
        Some((id, record))
    }

    /// The record at `id`, if present.
    pub fn get(&self, id: &str) -> Option<&PatientRecord> {
        self.patients.get(id)
    }

    /// All patients in display (key) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PatientRecord)> + '_ {
        self.patients.iter().map(|(id, record)| (id.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// Freezes the census into its persisted shape.
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            patients: self.patients.clone(),
            active_patient_id: self.active.clone(),
        }
    }

    /// Restores a census from a persisted snapshot.
    ///
    /// A saved active id that no longer resolves to a patient is replaced
    /// by the first available id, never left dangling.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let Snapshot {
            patients,
            active_patient_id,
        } = snapshot;
        let active = active_patient_id
            .filter(|id| patients.contains_key(id))
            .or_else(|| patients.keys().next().cloned());
        PatientCensus { patients, active }
    }

    /// Builds a census from explicit entries, activating the first id.
    /// Used by the seed data.
    pub(crate) fn from_entries(entries: Vec<(String, PatientRecord)>) -> Self {
        let patients: BTreeMap<_, _> = entries.into_iter().collect();
        let active = patients.keys().next().cloned();
        PatientCensus { patients, active }
    }
}
