// Domain models: persisted entities, external view models and token claims

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::core::constants::token;

/// Postal location of a camp
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub address1: String,
    pub address2: String,
    pub address3: String,
    pub city_town: String,
    pub state_province: String,
    pub postal_code: String,
    pub country: String,
}

/// A scheduled code camp as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camp {
    pub id: i32,
    pub moniker: String,
    pub name: String,
    pub description: String,
    pub event_date: NaiveDate,
    /// Duration in days, always >= 1
    pub length: i32,
    #[serde(default)]
    pub location: Location,
}

impl Default for Camp {
    fn default() -> Self {
        Self {
            id: 0,
            moniker: String::new(),
            name: String::new(),
            description: String::new(),
            event_date: NaiveDate::MIN,
            length: 1,
            location: Location::default(),
        }
    }
}

/// A speaker registered for a camp
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Speaker {
    pub id: i32,
    pub camp_id: i32,
    pub name: String,
    pub company_name: String,
    pub phone_number: String,
    pub website_url: String,
    pub twitter_name: String,
    pub github_name: String,
    pub bio: String,
    pub head_shot_url: String,
    /// Owning account; internal only
    pub user_name: String,
}

/// A talk given by a speaker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Talk {
    pub id: i32,
    pub camp_id: i32,
    pub speaker_id: i32,
    pub title: String,
    pub abstract_text: String,
    pub category: String,
    pub level: i32,
    pub prerequisites: String,
    pub start_time: Option<NaiveDateTime>,
    pub room: String,
}

/// External representation of a camp
///
/// Dates default to `NaiveDate::MIN`, which marks them as "not supplied"
/// for partial updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CampModel {
    pub url: String,
    pub moniker: String,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location_address1: String,
    pub location_address2: String,
    pub location_address3: String,
    pub location_city_town: String,
    pub location_state_province: String,
    pub location_postal_code: String,
    pub location_country: String,
    /// Filled only when the caller asks for speakers
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub speakers: Vec<SpeakerModel>,
}

impl Default for CampModel {
    fn default() -> Self {
        Self {
            url: String::new(),
            moniker: String::new(),
            name: String::new(),
            description: String::new(),
            start_date: NaiveDate::MIN,
            end_date: NaiveDate::MIN,
            location_address1: String::new(),
            location_address2: String::new(),
            location_address3: String::new(),
            location_city_town: String::new(),
            location_state_province: String::new(),
            location_postal_code: String::new(),
            location_country: String::new(),
            speakers: Vec::new(),
        }
    }
}

/// External representation of a speaker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpeakerModel {
    pub url: String,
    pub name: String,
    pub company_name: String,
    pub phone_number: String,
    pub website_url: String,
    pub twitter_name: String,
    pub github_name: String,
    pub bio: String,
    pub head_shot_url: String,
}

/// External representation of a talk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TalkModel {
    pub url: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub category: String,
    pub level: i32,
    pub prerequisites: String,
    pub start_time: Option<NaiveDateTime>,
    pub room: String,
}

/// Username/password pair posted to the auth endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CredentialModel {
    #[serde(alias = "username")]
    pub user_name: String,
    pub password: String,
}

/// Ordered (key, value) claims embedded in a signed token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet(Vec<(String, String)>);

impl ClaimSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a claim, keeping insertion order
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// First value recorded for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn subject(&self) -> Option<&str> {
        self.get(token::CLAIM_SUBJECT)
    }

    pub fn token_id(&self) -> Option<&str> {
        self.get(token::CLAIM_TOKEN_ID)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
