// YAML seed loading - users, camps, speakers and talks for the in-memory store

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::auth::credentials::StoredIdentity;
use crate::auth::password::{Password, StoredPasswordHash};
use crate::core::errors::CampError;
use crate::core::models::{Camp, Location, Speaker, Talk};

/// Container for the seed file's root structure
#[derive(Debug, Deserialize)]
struct SeedYaml {
    #[serde(default)]
    users: Vec<UserEntry>,
    #[serde(default)]
    camps: Vec<CampEntry>,
}

/// A user with either a plaintext password or a PHC hash
#[derive(Debug, Deserialize)]
struct UserEntry {
    username: String,
    password: Option<String>,
    password_hash: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CampEntry {
    id: i32,
    moniker: String,
    name: String,
    #[serde(default)]
    description: String,
    event_date: NaiveDate,
    #[serde(default = "default_length")]
    length: i32,
    #[serde(default)]
    location: Location,
    #[serde(default)]
    speakers: Vec<SpeakerEntry>,
}

fn default_length() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
struct SpeakerEntry {
    id: i32,
    name: String,
    #[serde(default)]
    company_name: String,
    #[serde(default)]
    phone_number: String,
    #[serde(default)]
    website_url: String,
    #[serde(default)]
    twitter_name: String,
    #[serde(default)]
    github_name: String,
    #[serde(default)]
    bio: String,
    #[serde(default)]
    head_shot_url: String,
    #[serde(default)]
    user_name: String,
    #[serde(default)]
    talks: Vec<TalkEntry>,
}

#[derive(Debug, Deserialize)]
struct TalkEntry {
    id: i32,
    title: String,
    #[serde(default, rename = "abstract")]
    abstract_text: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    level: i32,
    #[serde(default)]
    prerequisites: String,
    #[serde(default)]
    start_time: Option<NaiveDateTime>,
    #[serde(default)]
    room: String,
}

/// Flattened, validated seed contents
#[derive(Debug, Default)]
pub struct SeedData {
    pub identities: Vec<StoredIdentity>,
    pub camps: Vec<Camp>,
    pub speakers: Vec<Speaker>,
    pub talks: Vec<Talk>,
}

/// Seed loader - parses and validates seed documents
pub struct SeedLoader;

impl SeedLoader {
    /// Load seed data from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SeedData, CampError> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(CampError::ConfigurationError(format!(
                "Seed file not found at {:?}",
                path_ref
            )));
        }

        let yaml_content = fs::read_to_string(path_ref).map_err(|e| {
            CampError::ConfigurationError(format!("Failed to read seed file: {}", e))
        })?;

        Self::from_yaml_str(&yaml_content)
    }

    /// Parse seed data from YAML text
    ///
    /// Plaintext passwords are hashed here, so nothing downstream sees them.
    pub fn from_yaml_str(yaml: &str) -> Result<SeedData, CampError> {
        let seed: SeedYaml = serde_yaml::from_str(yaml)
            .map_err(|e| CampError::ConfigurationError(format!("Failed to parse seed YAML: {}", e)))?;

        let mut data = SeedData::default();

        let mut usernames = HashSet::new();
        for user in seed.users {
            if !usernames.insert(user.username.clone()) {
                return Err(CampError::ConfigurationError(format!(
                    "Duplicate user '{}' in seed",
                    user.username
                )));
            }
            let password_hash = Self::resolve_password(&user)?;
            data.identities.push(StoredIdentity {
                username: user.username,
                password_hash,
            });
        }

        let mut camp_ids = HashSet::new();
        let mut speaker_ids = HashSet::new();
        let mut talk_ids = HashSet::new();
        for camp in seed.camps {
            if !camp_ids.insert(camp.id) {
                return Err(Self::duplicate("camp", camp.id));
            }
            if camp.length < 1 {
                return Err(CampError::ConfigurationError(format!(
                    "Camp {} has length {}; must be at least 1",
                    camp.id, camp.length
                )));
            }

            for speaker in camp.speakers {
                if !speaker_ids.insert(speaker.id) {
                    return Err(Self::duplicate("speaker", speaker.id));
                }
                for talk in speaker.talks {
                    if !talk_ids.insert(talk.id) {
                        return Err(Self::duplicate("talk", talk.id));
                    }
                    data.talks.push(Talk {
                        id: talk.id,
                        camp_id: camp.id,
                        speaker_id: speaker.id,
                        title: talk.title,
                        abstract_text: talk.abstract_text,
                        category: talk.category,
                        level: talk.level,
                        prerequisites: talk.prerequisites,
                        start_time: talk.start_time,
                        room: talk.room,
                    });
                }
                data.speakers.push(Speaker {
                    id: speaker.id,
                    camp_id: camp.id,
                    name: speaker.name,
                    company_name: speaker.company_name,
                    phone_number: speaker.phone_number,
                    website_url: speaker.website_url,
                    twitter_name: speaker.twitter_name,
                    github_name: speaker.github_name,
                    bio: speaker.bio,
                    head_shot_url: speaker.head_shot_url,
                    user_name: speaker.user_name,
                });
            }

            data.camps.push(Camp {
                id: camp.id,
                moniker: camp.moniker,
                name: camp.name,
                description: camp.description,
                event_date: camp.event_date,
                length: camp.length,
                location: camp.location,
            });
        }

        Ok(data)
    }

    fn resolve_password(user: &UserEntry) -> Result<StoredPasswordHash, CampError> {
        match (&user.password, &user.password_hash) {
            (Some(plain), None) => Ok(Password::new(plain).hash()?),
            (None, Some(phc)) => StoredPasswordHash::from_phc_string(phc).map_err(|e| {
                CampError::ConfigurationError(format!("User '{}' has an invalid password_hash: {}", user.username, e))
            }),
            _ => Err(CampError::ConfigurationError(format!(
                "User '{}' must set exactly one of password or password_hash",
                user.username
            ))),
        }
    }

    fn duplicate(kind: &str, id: i32) -> CampError {
        CampError::ConfigurationError(format!("Duplicate {} id {} in seed", kind, id))
    }
}
