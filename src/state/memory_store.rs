// In-memory camp repository and identity store

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::info;

use crate::api::CampRepository;
use crate::auth::credentials::{IdentityStore, StoredIdentity};
use crate::core::errors::CampError;
use crate::core::models::{Camp, Speaker, Talk};
use crate::loader::seed_loader::SeedData;

#[derive(Debug, Default)]
struct Tables {
    camps: BTreeMap<i32, Camp>,
    speakers: BTreeMap<i32, Speaker>,
    talks: BTreeMap<i32, Talk>,
    /// Highest camp id ever handed out; deleted ids are never reused
    last_camp_id: i32,
}

/// Process-local store backing both the camp API and credential lookups
///
/// Camps, speakers and talks share one lock so cascading deletes are atomic.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    identities: RwLock<HashMap<String, StoredIdentity>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: SeedData) -> Self {
        let camps: BTreeMap<i32, Camp> = seed.camps.into_iter().map(|c| (c.id, c)).collect();
        let last_camp_id = camps.keys().next_back().copied().unwrap_or(0);
        let tables = Tables {
            camps,
            speakers: seed.speakers.into_iter().map(|s| (s.id, s)).collect(),
            talks: seed.talks.into_iter().map(|t| (t.id, t)).collect(),
            last_camp_id,
        };
        let identities = seed
            .identities
            .into_iter()
            .map(|i| (i.username.clone(), i))
            .collect::<HashMap<_, _>>();

        info!(
            camps = tables.camps.len(),
            speakers = tables.speakers.len(),
            talks = tables.talks.len(),
            users = identities.len(),
            "In-memory store seeded"
        );

        Self {
            tables: RwLock::new(tables),
            identities: RwLock::new(identities),
        }
    }

    pub async fn add_identity(&self, identity: StoredIdentity) {
        self.identities
            .write()
            .await
            .insert(identity.username.clone(), identity);
    }

    pub async fn add_speaker(&self, speaker: Speaker) {
        self.tables.write().await.speakers.insert(speaker.id, speaker);
    }

    pub async fn add_talk(&self, talk: Talk) {
        self.tables.write().await.talks.insert(talk.id, talk);
    }
}

#[async_trait]
impl IdentityStore for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<StoredIdentity>, CampError> {
        Ok(self.identities.read().await.get(username).cloned())
    }
}

#[async_trait]
impl CampRepository for InMemoryStore {
    async fn list_camps(&self) -> Result<Vec<Camp>, CampError> {
        Ok(self.tables.read().await.camps.values().cloned().collect())
    }

    async fn get_camp(&self, id: i32) -> Result<Option<Camp>, CampError> {
        Ok(self.tables.read().await.camps.get(&id).cloned())
    }

    async fn add_camp(&self, mut camp: Camp) -> Result<Camp, CampError> {
        let mut tables = self.tables.write().await;
        let next_id = tables
            .last_camp_id
            .checked_add(1)
            .ok_or_else(|| CampError::StateError("camp id space exhausted".to_string()))?;
        tables.last_camp_id = next_id;
        camp.id = next_id;
        tables.camps.insert(next_id, camp.clone());
        Ok(camp)
    }

    async fn update_camp(&self, camp: Camp) -> Result<(), CampError> {
        let mut tables = self.tables.write().await;
        match tables.camps.get_mut(&camp.id) {
            Some(existing) => {
                *existing = camp;
                Ok(())
            }
            None => Err(CampError::NotFound(format!(
                "Could not find a camp with an ID of {}",
                camp.id
            ))),
        }
    }

    async fn delete_camp(&self, id: i32) -> Result<bool, CampError> {
        let mut tables = self.tables.write().await;
        if tables.camps.remove(&id).is_none() {
            return Ok(false);
        }
        tables.speakers.retain(|_, s| s.camp_id != id);
        tables.talks.retain(|_, t| t.camp_id != id);
        Ok(true)
    }

    async fn list_speakers(&self, camp_id: i32) -> Result<Vec<Speaker>, CampError> {
        Ok(self
            .tables
            .read()
            .await
            .speakers
            .values()
            .filter(|s| s.camp_id == camp_id)
            .cloned()
            .collect())
    }

    async fn get_speaker(&self, camp_id: i32, id: i32) -> Result<Option<Speaker>, CampError> {
        Ok(self
            .tables
            .read()
            .await
            .speakers
            .get(&id)
            .filter(|s| s.camp_id == camp_id)
            .cloned())
    }

    async fn list_talks(&self, camp_id: i32, speaker_id: i32) -> Result<Vec<Talk>, CampError> {
        Ok(self
            .tables
            .read()
            .await
            .talks
            .values()
            .filter(|t| t.camp_id == camp_id && t.speaker_id == speaker_id)
            .cloned()
            .collect())
    }

    async fn get_talk(&self, camp_id: i32, speaker_id: i32, id: i32) -> Result<Option<Talk>, CampError> {
        Ok(self
            .tables
            .read()
            .await
            .talks
            .get(&id)
            .filter(|t| t.camp_id == camp_id && t.speaker_id == speaker_id)
            .cloned())
    }
}
