// Camp <-> CampModel rules

use chrono::{Days, NaiveDate};

use crate::core::errors::CampError;
use crate::core::models::{Camp, CampModel};
use crate::mapping::rules::{text_rule, FieldRule};
use crate::mapping::url::ResourceRef;
use crate::mapping::Projection;

/// Last day of a camp: `event_date + (length - 1)`
pub fn end_date(event_date: NaiveDate, length: i32) -> NaiveDate {
    let extra_days = u64::try_from(length.saturating_sub(1)).unwrap_or(0);
    event_date
        .checked_add_days(Days::new(extra_days))
        .unwrap_or(NaiveDate::MAX)
}

/// Inclusive day count between two dates; rejects an end before the start
pub fn length_between(start: NaiveDate, end: NaiveDate) -> Result<i32, CampError> {
    let days = (end - start).num_days();
    if days < 0 {
        return Err(CampError::ValidationFailure(format!(
            "endDate {} is before startDate {}",
            end, start
        )));
    }
    i32::try_from(days + 1)
        .map_err(|_| CampError::ValidationFailure("camp length out of range".to_string()))
}

fn reverse_start(view: &CampModel, camp: &mut Camp) -> Result<(), CampError> {
    if view.start_date == NaiveDate::MIN {
        return Err(CampError::ValidationFailure("startDate is required".to_string()));
    }
    camp.event_date = view.start_date;
    Ok(())
}

fn reverse_end(view: &CampModel, camp: &mut Camp) -> Result<(), CampError> {
    // No end date: a new camp keeps its single-day default
    if view.end_date == NaiveDate::MIN {
        return Ok(());
    }
    camp.length = length_between(camp.event_date, view.end_date)?;
    Ok(())
}

// start_date must precede end_date: the end rule measures from the
// event date the start rule has just written.
static CAMP_RULES: [FieldRule<Camp, CampModel>; 12] = [
    text_rule!("moniker", moniker => moniker),
    text_rule!("name", name => name),
    text_rule!("description", description => description),
    FieldRule {
        name: "startDate",
        forward: |camp, view| view.start_date = camp.event_date,
        reverse: reverse_start,
        is_default: |view| view.start_date == NaiveDate::MIN,
    },
    FieldRule {
        name: "endDate",
        forward: |camp, view| view.end_date = end_date(camp.event_date, camp.length),
        reverse: reverse_end,
        is_default: |view| view.end_date == NaiveDate::MIN,
    },
    text_rule!("locationAddress1", location.address1 => location_address1),
    text_rule!("locationAddress2", location.address2 => location_address2),
    text_rule!("locationAddress3", location.address3 => location_address3),
    text_rule!("locationCityTown", location.city_town => location_city_town),
    text_rule!("locationStateProvince", location.state_province => location_state_province),
    text_rule!("locationPostalCode", location.postal_code => location_postal_code),
    text_rule!("locationCountry", location.country => location_country),
];

impl Projection for Camp {
    type View = CampModel;

    fn rules() -> &'static [FieldRule<Self, Self::View>] {
        &CAMP_RULES
    }

    fn resource(&self) -> ResourceRef {
        ResourceRef::Camp { camp_id: self.id }
    }

    fn set_url(view: &mut Self::View, url: String) {
        view.url = url;
    }
}
