// Unit tests for camp, speaker and talk projection

use chrono::{NaiveDate, NaiveDateTime};
use codecamp_api::core::errors::CampError;
use codecamp_api::core::models::{Camp, CampModel, Location, Speaker, Talk, TalkModel};
use codecamp_api::mapping::url::{RouteContext, RouteLinker, RouteTable};
use codecamp_api::mapping::{apply_update, from_view, EntityProjector, Projection};
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn linker() -> RouteLinker {
    RouteLinker::new(Arc::new(RouteTable::default()), RouteContext::new("https", "camps.example.org"))
}

fn camp(event_date: NaiveDate, length: i32) -> Camp {
    Camp {
        id: 5,
        moniker: "ATL2024".to_string(),
        name: "Atlanta Code Camp".to_string(),
        description: String::new(),
        event_date,
        length,
        location: Location {
            city_town: "Atlanta".to_string(),
            postal_code: "30303".to_string(),
            ..Location::default()
        },
    }
}

#[test]
fn test_three_day_camp_end_date_and_back() {
    let linker = linker();
    let view = EntityProjector::new(&linker)
        .to_view(&camp(date(2024, 6, 1), 3))
        .unwrap();

    assert_eq!(view.start_date, date(2024, 6, 1));
    assert_eq!(view.end_date, date(2024, 6, 3));
    assert_eq!(view.url, "https://camps.example.org/api/camps/5");

    let rebuilt = from_view(&view, Camp { id: 5, ..Camp::default() }).unwrap();
    assert_eq!(rebuilt.event_date, date(2024, 6, 1));
    assert_eq!(rebuilt.length, 3);
    assert_eq!(rebuilt, camp(date(2024, 6, 1), 3));
}

#[test]
fn test_single_day_camp_ends_on_start() {
    let linker = linker();
    let view = EntityProjector::new(&linker)
        .to_view(&camp(date(2024, 9, 14), 1))
        .unwrap();
    assert_eq!(view.end_date, view.start_date);

    let model = CampModel {
        start_date: date(2024, 9, 14),
        end_date: date(2024, 9, 14),
        ..CampModel::default()
    };
    let rebuilt = from_view(&model, Camp::default()).unwrap();
    assert_eq!(rebuilt.length, 1);
}

#[test]
fn test_month_boundary_end_date() {
    let linker = linker();
    let view = EntityProjector::new(&linker)
        .to_view(&camp(date(2024, 2, 28), 3))
        .unwrap();
    assert_eq!(view.end_date, date(2024, 3, 1));
}

#[test]
fn test_end_before_start_rejected_on_create() {
    let model = CampModel {
        moniker: "BAD".to_string(),
        start_date: date(2024, 6, 3),
        end_date: date(2024, 6, 1),
        ..CampModel::default()
    };
    let result = from_view(&model, Camp::default());
    assert!(matches!(result, Err(CampError::ValidationFailure(_))));
}

#[test]
fn test_end_before_stored_start_rejected_on_update() {
    let mut stored = camp(date(2024, 6, 1), 3);
    let before = stored.clone();

    let model = CampModel {
        name: "Renamed".to_string(),
        end_date: date(2024, 5, 30),
        ..CampModel::default()
    };
    let result = apply_update(&model, &mut stored);

    assert!(matches!(result, Err(CampError::ValidationFailure(_))));
    assert_eq!(stored, before);
}

#[test]
fn test_partial_update_only_touches_supplied_fields() {
    let mut stored = camp(date(2024, 6, 1), 3);

    let model = CampModel {
        location_postal_code: "30309".to_string(),
        ..CampModel::default()
    };
    apply_update(&model, &mut stored).unwrap();

    assert_eq!(stored.location.postal_code, "30309");
    assert_eq!(stored.location.city_town, "Atlanta");
    assert_eq!(stored.name, "Atlanta Code Camp");
    assert_eq!(stored.event_date, date(2024, 6, 1));
    assert_eq!(stored.length, 3);
}

#[test]
fn test_moving_start_keeps_length() {
    let mut stored = camp(date(2024, 6, 1), 3);

    let model = CampModel {
        start_date: date(2024, 7, 10),
        ..CampModel::default()
    };
    apply_update(&model, &mut stored).unwrap();

    assert_eq!(stored.event_date, date(2024, 7, 10));
    assert_eq!(stored.length, 3);
}

#[test]
fn test_supplied_end_date_overwrites_length() {
    let mut stored = camp(date(2024, 6, 1), 3);

    let model = CampModel {
        end_date: date(2024, 6, 5),
        ..CampModel::default()
    };
    apply_update(&model, &mut stored).unwrap();

    assert_eq!(stored.event_date, date(2024, 6, 1));
    assert_eq!(stored.length, 5);
}

#[test]
fn test_end_measured_from_new_start() {
    let mut stored = camp(date(2024, 6, 1), 3);

    let model = CampModel {
        start_date: date(2024, 7, 10),
        end_date: date(2024, 7, 11),
        ..CampModel::default()
    };
    apply_update(&model, &mut stored).unwrap();

    assert_eq!(stored.event_date, date(2024, 7, 10));
    assert_eq!(stored.length, 2);
}

fn project_all<E: Projection>(linker: &RouteLinker, items: &[E]) -> Vec<E::View> {
    EntityProjector::new(linker).to_views(items).unwrap()
}

#[test]
fn test_projection_through_generic_caller() {
    let linker = linker();

    let camps = project_all(&linker, &[camp(date(2024, 6, 1), 3), camp(date(2024, 9, 14), 1)]);
    assert_eq!(camps.len(), 2);
    assert_eq!(camps[1].end_date, date(2024, 9, 14));

    let speakers = project_all(
        &linker,
        &[Speaker { id: 7, camp_id: 5, name: "Jane".to_string(), ..Speaker::default() }],
    );
    assert_eq!(speakers[0].url, "https://camps.example.org/api/camps/5/speakers/7");
}

#[test]
fn test_missing_host_fails_projection() {
    let linker = RouteLinker::new(
        Arc::new(RouteTable::default()),
        RouteContext {
            scheme: Some("http".to_string()),
            host: None,
            path_base: String::new(),
        },
    );
    let result = EntityProjector::new(&linker).to_view(&camp(date(2024, 6, 1), 3));
    assert!(matches!(result, Err(CampError::ResolutionFailure(_))));
}

#[test]
fn test_speaker_url_and_fields() {
    let speaker = Speaker {
        id: 7,
        camp_id: 5,
        name: "Jane Doe".to_string(),
        twitter_name: "@jane".to_string(),
        user_name: "jane".to_string(),
        ..Speaker::default()
    };

    let linker = linker();
    let view = EntityProjector::new(&linker).to_view(&speaker).unwrap();

    assert_eq!(view.url, "https://camps.example.org/api/camps/5/speakers/7");
    assert_eq!(view.name, "Jane Doe");
    assert_eq!(view.twitter_name, "@jane");

    let json = serde_json::to_value(&view).unwrap();
    assert!(json.get("userName").is_none());
}

#[test]
fn test_talk_url_and_partial_update() {
    let mut talk = Talk {
        id: 3,
        camp_id: 5,
        speaker_id: 7,
        title: "Async Rust".to_string(),
        level: 200,
        start_time: NaiveDateTime::parse_from_str("2024-06-01 10:00:00", "%Y-%m-%d %H:%M:%S").ok(),
        ..Talk::default()
    };

    let linker = linker();
    let view = EntityProjector::new(&linker).to_view(&talk).unwrap();
    assert_eq!(view.url, "https://camps.example.org/api/camps/5/speakers/7/talks/3");

    let update = TalkModel {
        room: "Ballroom B".to_string(),
        ..TalkModel::default()
    };
    apply_update(&update, &mut talk).unwrap();

    assert_eq!(talk.room, "Ballroom B");
    assert_eq!(talk.level, 200);
    assert_eq!(talk.title, "Async Rust");
    assert!(talk.start_time.is_some());
}
