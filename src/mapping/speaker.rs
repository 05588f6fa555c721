// Speaker <-> SpeakerModel rules

use crate::core::models::{Speaker, SpeakerModel};
use crate::mapping::rules::{text_rule, FieldRule};
use crate::mapping::url::ResourceRef;
use crate::mapping::Projection;

// user_name is internal and has no rule
static SPEAKER_RULES: [FieldRule<Speaker, SpeakerModel>; 8] = [
    text_rule!("name", name => name),
    text_rule!("companyName", company_name => company_name),
    text_rule!("phoneNumber", phone_number => phone_number),
    text_rule!("websiteUrl", website_url => website_url),
    text_rule!("twitterName", twitter_name => twitter_name),
    text_rule!("githubName", github_name => github_name),
    text_rule!("bio", bio => bio),
    text_rule!("headShotUrl", head_shot_url => head_shot_url),
];

impl Projection for Speaker {
    type View = SpeakerModel;

    fn rules() -> &'static [FieldRule<Self, Self::View>] {
        &SPEAKER_RULES
    }

    fn resource(&self) -> ResourceRef {
        ResourceRef::Speaker {
            camp_id: self.camp_id,
            speaker_id: self.id,
        }
    }

    fn set_url(view: &mut Self::View, url: String) {
        view.url = url;
    }
}
