use std::fmt::{self, Display};
use std::marker::PhantomData;

use crate::model::{Entity, RecordId, ResourceKind};
use crate::store::Reducer;

/// Client-side copy of one remote collection plus transient request flags.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<E> {
    pub items: Vec<E>,
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl<E> Default for ResourceState<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            success: None,
        }
    }
}

impl<E: Entity> ResourceState<E> {
    pub fn find(&self, id: &RecordId) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }
}

/// Which request a pending or rejected action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl Operation {
    fn is_mutation(self) -> bool {
        !matches!(self, Self::Fetch)
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fetch => "fetch",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Lifecycle messages for a resource collection.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceAction<E> {
    /// A request was issued.
    Pending(Operation),
    /// The list request resolved; replaces the collection.
    Fetched(Vec<E>),
    /// The server created a record.
    Created(E),
    /// The server returned the updated record.
    Updated(E),
    /// The server removed the record with this id.
    Deleted(RecordId),
    /// A request failed with a user-facing message.
    Rejected {
        operation: Operation,
        message: String,
    },
    ClearMessages,
}

/// Applies [`ResourceAction`]s to a [`ResourceState`].
pub struct ResourceReducer<E>(PhantomData<fn() -> E>);

impl<E> ResourceReducer<E> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E> Default for ResourceReducer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Reducer for ResourceReducer<E> {
    type State = ResourceState<E>;
    type Action = ResourceAction<E>;

    fn reduce(&self, state: &mut ResourceState<E>, action: ResourceAction<E>) {
        let ResourceKind {
            label,
            success_suffix: suffix,
            ..
        } = E::KIND;
        match action {
            ResourceAction::Pending(operation) => {
                state.loading = true;
                state.error = None;
                if operation.is_mutation() {
                    state.success = None;
                }
            }
            ResourceAction::Fetched(items) => {
                state.loading = false;
                state.items = items;
            }
            ResourceAction::Created(record) => {
                state.loading = false;
                state.items.push(record);
                state.success = Some(format!("{label} added successfully{suffix}"));
            }
            ResourceAction::Updated(record) => {
                state.loading = false;
                if let Some(slot) = state.items.iter_mut().find(|item| item.id() == record.id()) {
                    *slot = record;
                }
                state.success = Some(format!("{label} updated successfully{suffix}"));
            }
            ResourceAction::Deleted(id) => {
                state.loading = false;
                state.items.retain(|item| item.id() != &id);
                state.success = Some(format!("{label} deleted successfully{suffix}"));
            }
            ResourceAction::Rejected { message, .. } => {
                state.loading = false;
                state.error = Some(message);
            }
            ResourceAction::ClearMessages => {
                state.error = None;
                state.success = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Customer, Product};
    use chrono::{TimeZone, Utc};

    fn customer(id: &str, name: &str) -> Customer {
        Customer {
            id: RecordId::new(id),
            name: name.to_owned(),
            contact: "0240000000".to_owned(),
            location: "Accra".to_owned(),
            date: Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
        }
    }

    fn reduce(
        state: ResourceState<Customer>,
        action: ResourceAction<Customer>,
    ) -> ResourceState<Customer> {
        let mut state = state;
        ResourceReducer::new().reduce(&mut state, action);
        state
    }

    fn seeded() -> ResourceState<Customer> {
        ResourceState {
            items: vec![customer("1", "Ama"), customer("2", "Kofi")],
            success: Some("old".to_owned()),
            ..ResourceState::default()
        }
    }

    #[test]
    fn fetch_pending_keeps_success_but_clears_error() {
        let state = ResourceState {
            error: Some("boom".to_owned()),
            ..seeded()
        };
        let state = reduce(state, ResourceAction::Pending(Operation::Fetch));
        assert!(state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.success.as_deref(), Some("old"));
    }

    #[test]
    fn mutation_pending_clears_success() {
        let state = reduce(seeded(), ResourceAction::Pending(Operation::Delete));
        assert_eq!(state.success, None);
    }

    #[test]
    fn fetched_replaces_without_merge() {
        let state = reduce(
            seeded(),
            ResourceAction::Fetched(vec![customer("3", "Yaw")]),
        );
        assert_eq!(state.items, vec![customer("3", "Yaw")]);
    }

    #[test]
    fn update_of_unknown_id_does_not_insert() {
        let state = reduce(seeded(), ResourceAction::Updated(customer("9", "Esi")));
        assert_eq!(state.items, seeded().items);
        assert_eq!(state.success.as_deref(), Some("Customer updated successfully"));
    }

    #[test]
    fn product_messages_carry_their_suffix() {
        let product = Product {
            id: RecordId::new("p1"),
            name: "Rye".to_owned(),
            quantity: 3,
            date: Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
        };
        let mut state = ResourceState::default();
        ResourceReducer::new().reduce(&mut state, ResourceAction::Created(product));
        assert_eq!(state.success.as_deref(), Some("Product added successfully!"));

        ResourceReducer::<Product>::new()
            .reduce(&mut state, ResourceAction::Deleted(RecordId::new("p1")));
        assert_eq!(state.success.as_deref(), Some("Product deleted successfully!"));
    }

    #[test]
    fn update_replaces_matching_entry_only() {
        let state = reduce(seeded(), ResourceAction::Updated(customer("2", "Kofi B.")));
        assert_eq!(state.items[0], customer("1", "Ama"));
        assert_eq!(state.items[1].name, "Kofi B.");
    }

    #[test]
    fn rejected_keeps_items() {
        let state = reduce(
            seeded(),
            ResourceAction::Rejected {
                operation: Operation::Fetch,
                message: "offline".to_owned(),
            },
        );
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.error.as_deref(), Some("offline"));
        assert!(!state.loading);
    }

    #[test]
    fn clear_messages_resets_both() {
        let state = ResourceState {
            error: Some("e".to_owned()),
            ..seeded()
        };
        let state = reduce(state, ResourceAction::ClearMessages);
        assert_eq!((state.error, state.success), (None, None));
    }
}
