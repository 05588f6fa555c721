// Unit tests for seed loading into the in-memory store

use codecamp_api::api::CampRepository;
use codecamp_api::auth::credentials::IdentityStore;
use codecamp_api::auth::password::Password;
use codecamp_api::core::errors::CampError;
use codecamp_api::loader::seed_loader::SeedLoader;
use codecamp_api::state::memory_store::InMemoryStore;
use std::io::Write;
use tempfile::NamedTempFile;

use crate::common::*;

#[test]
fn test_shared_seed_flattens_hierarchy() {
    let seed = SeedLoader::from_yaml_str(SEED_YAML).unwrap();

    assert_eq!(seed.identities.len(), 2);
    assert_eq!(seed.camps.len(), 2);
    assert_eq!(seed.speakers.len(), 1);
    assert_eq!(seed.talks.len(), 2);

    assert_eq!(seed.speakers[0].camp_id, 1);
    assert!(seed.talks.iter().all(|t| t.camp_id == 1 && t.speaker_id == 1));
    assert_eq!(seed.talks[0].abstract_text, "REST from first principles");
    assert_eq!(seed.camps[1].length, 1);
    assert_eq!(seed.camps[1].location.postal_code, "");
}

#[test]
fn test_plaintext_passwords_are_hashed() {
    let seed = SeedLoader::from_yaml_str(SEED_YAML).unwrap();
    let shawn = seed.identities.iter().find(|i| i.username == USERNAME).unwrap();

    assert!(shawn.password_hash.as_str().starts_with("$argon2"));
    assert!(!shawn.password_hash.as_str().contains(PASSWORD));
    assert!(shawn.password_hash.verify(&Password::new(PASSWORD)).unwrap());
}

#[tokio::test]
async fn test_precomputed_hash_from_file() {
    let hash = Password::new("s3cret-value").hash().unwrap();
    let yaml = format!(
        "users:\n  - username: ops\n    password_hash: \"{}\"\ncamps: []\n",
        hash.as_str()
    );

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    let seed = SeedLoader::from_file(file.path()).unwrap();
    let store = InMemoryStore::from_seed(seed);

    let identity = store.find_by_username("ops").await.unwrap().unwrap();
    assert!(identity.password_hash.verify(&Password::new("s3cret-value")).unwrap());
    assert!(store.list_camps().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_seeded_store_scopes_children() {
    let store = seeded_store();

    assert_eq!(store.list_camps().await.unwrap().len(), 2);
    assert!(store.get_speaker(1, 1).await.unwrap().is_some());
    assert!(store.get_speaker(2, 1).await.unwrap().is_none());
    assert_eq!(store.list_talks(1, 1).await.unwrap().len(), 2);
    assert!(store.get_talk(1, 1, 2).await.unwrap().is_some());
    assert!(store.get_talk(2, 1, 2).await.unwrap().is_none());
}

#[test]
fn test_missing_file_rejected() {
    let result = SeedLoader::from_file("/nonexistent/seed.yaml");
    assert!(matches!(result, Err(CampError::ConfigurationError(_))));
}

#[test]
fn test_user_with_both_password_forms_rejected() {
    let yaml = r#"
users:
  - username: shawn
    password: "a"
    password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaA"
"#;
    let result = SeedLoader::from_yaml_str(yaml);
    assert!(matches!(result, Err(CampError::ConfigurationError(_))));
}

#[test]
fn test_user_without_password_rejected() {
    let result = SeedLoader::from_yaml_str("users:\n  - username: shawn\n");
    assert!(matches!(result, Err(CampError::ConfigurationError(_))));
}

#[test]
fn test_invalid_hash_rejected() {
    let yaml = "users:\n  - username: shawn\n    password_hash: plaintext\n";
    let result = SeedLoader::from_yaml_str(yaml);
    assert!(matches!(result, Err(CampError::ConfigurationError(_))));
}

#[test]
fn test_duplicate_camp_id_rejected() {
    let yaml = r#"
camps:
  - id: 1
    moniker: A
    name: A
    event_date: 2024-01-01
  - id: 1
    moniker: B
    name: B
    event_date: 2024-02-01
"#;
    let err = SeedLoader::from_yaml_str(yaml).unwrap_err();
    assert!(err.to_string().contains("Duplicate camp id 1"));
}

#[test]
fn test_duplicate_username_rejected() {
    let yaml = r#"
users:
  - username: shawn
    password: a
  - username: shawn
    password: b
"#;
    let result = SeedLoader::from_yaml_str(yaml);
    assert!(matches!(result, Err(CampError::ConfigurationError(_))));
}

#[test]
fn test_zero_length_camp_rejected() {
    let yaml = r#"
camps:
  - id: 1
    moniker: A
    name: A
    event_date: 2024-01-01
    length: 0
"#;
    let result = SeedLoader::from_yaml_str(yaml);
    assert!(matches!(result, Err(CampError::ConfigurationError(_))));
}

#[test]
fn test_malformed_yaml_rejected() {
    let result = SeedLoader::from_yaml_str("camps: [ {id: 1");
    assert!(matches!(result, Err(CampError::ConfigurationError(_))));
}
