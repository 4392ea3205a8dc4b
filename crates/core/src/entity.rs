//! Things with identity: a cart line stays the same line when its quantity or
//! notes change, and an inventory item stays the same item as stock moves.

pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Whether this entity is the one identified by `id`, whatever its state.
    fn is(&self, id: &Self::Id) -> bool {
        self.id() == id
    }
}
