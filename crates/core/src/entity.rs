//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;

    /// Human-readable name shown wherever the entity is referenced.
    fn display_name(&self) -> &str;
}

/// Find an entity by exact display name.
///
/// Returns `None` when no entity, or more than one entity, carries the name:
/// an ambiguous name is not a canonical reference.
pub fn find_unique_by_name<'a, E: Entity>(
    entities: impl IntoIterator<Item = &'a E>,
    name: &str,
) -> Option<&'a E>
where
    E: 'a,
{
    let mut matches = entities.into_iter().filter(|e| e.display_name() == name);
    let first = matches.next()?;
    if matches.next().is_some() {
        return None;
    }
    Some(first)
}
