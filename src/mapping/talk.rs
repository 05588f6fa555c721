// Talk <-> TalkModel rules

use crate::core::models::{Talk, TalkModel};
use crate::mapping::rules::{text_rule, FieldRule};
use crate::mapping::url::ResourceRef;
use crate::mapping::Projection;

static TALK_RULES: [FieldRule<Talk, TalkModel>; 7] = [
    text_rule!("title", title => title),
    text_rule!("abstract", abstract_text => abstract_text),
    text_rule!("category", category => category),
    FieldRule {
        name: "level",
        forward: |talk, view| view.level = talk.level,
        reverse: |view, talk| {
            talk.level = view.level;
            Ok(())
        },
        is_default: |view| view.level <= 0,
    },
    text_rule!("prerequisites", prerequisites => prerequisites),
    FieldRule {
        name: "startTime",
        forward: |talk, view| view.start_time = talk.start_time,
        reverse: |view, talk| {
            talk.start_time = view.start_time;
            Ok(())
        },
        is_default: |view| view.start_time.is_none(),
    },
    text_rule!("room", room => room),
];

impl Projection for Talk {
    type View = TalkModel;

    fn rules() -> &'static [FieldRule<Self, Self::View>] {
        &TALK_RULES
    }

    fn resource(&self) -> ResourceRef {
        ResourceRef::Talk {
            camp_id: self.camp_id,
            speaker_id: self.speaker_id,
            talk_id: self.id,
        }
    }

    fn set_url(view: &mut Self::View, url: String) {
        view.url = url;
    }
}
