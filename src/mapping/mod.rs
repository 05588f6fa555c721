// Entity <-> view model projection

pub mod camp;
pub mod rules;
pub mod speaker;
pub mod talk;
pub mod url;

use tracing::debug;

use crate::core::errors::CampError;
use crate::mapping::rules::FieldRule;
use crate::mapping::url::{ResourceRef, UrlResolver};

/// An entity with a rule table linking it to its view model
pub trait Projection: Sized + Clone + 'static {
    type View: Default + 'static;

    /// Field rules in application order
    fn rules() -> &'static [FieldRule<Self, Self::View>];

    /// Identity chain used to build the view's URL
    fn resource(&self) -> ResourceRef;

    fn set_url(view: &mut Self::View, url: String);
}

/// Projects entities into view models, synthesizing URLs with an injected resolver
pub struct EntityProjector<'a> {
    resolver: &'a dyn UrlResolver,
}

impl<'a> EntityProjector<'a> {
    pub fn new(resolver: &'a dyn UrlResolver) -> Self {
        Self { resolver }
    }

    pub fn to_view<E: Projection>(&self, entity: &E) -> Result<E::View, CampError> {
        let mut view = E::View::default();
        rules::project(E::rules(), entity, &mut view);
        let url = self.resolver.resolve(&entity.resource())?;
        E::set_url(&mut view, url);
        Ok(view)
    }

    pub fn to_views<E: Projection>(&self, entities: &[E]) -> Result<Vec<E::View>, CampError> {
        entities.iter().map(|entity| self.to_view(entity)).collect()
    }
}

/// Build a new entity from a complete view model
///
/// Identity fields come from `base`; the view's URL is ignored.
pub fn from_view<E: Projection>(view: &E::View, base: E) -> Result<E, CampError> {
    let mut entity = base;
    rules::apply_all(E::rules(), view, &mut entity)?;
    Ok(entity)
}

/// Non-destructive partial update
///
/// Supplied fields overwrite; sentinel fields keep the stored value. On
/// error `entity` is left exactly as it was.
pub fn apply_update<E: Projection>(view: &E::View, entity: &mut E) -> Result<(), CampError> {
    let mut working = entity.clone();
    let table = E::rules();
    rules::apply_supplied(table, view, &mut working)?;
    debug!(
        supplied = table.iter().filter(|rule| !(rule.is_default)(view)).count(),
        "Applied partial update"
    );
    *entity = working;
    Ok(())
}
