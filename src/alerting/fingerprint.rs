use sea_orm::ActiveEnum;

use crate::db::entities::inventory_item;

/// Deterministic summary of a low-stock set: `id-name-quantity-min` tuples over
/// the set ordered by (category, name), joined with `|`. The empty set is the
/// empty string. Any change to a low item's id, name, quantity or threshold, or
/// to the set membership itself, changes the fingerprint.
pub fn fingerprint(low_items: &[inventory_item::Model]) -> String {
    let mut ordered: Vec<&inventory_item::Model> = low_items.iter().collect();
    ordered.sort_by(|a, b| {
        a.category
            .to_value()
            .cmp(&b.category.to_value())
            .then_with(|| a.name.cmp(&b.name))
    });

    ordered
        .iter()
        .map(|item| {
            format!(
                "{}-{}-{}-{}",
                item.id, item.name, item.quantity, item.min_quantity
            )
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Which way the low-stock picture moved since the previous check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockTransition {
    /// Same fingerprint as last time; nothing to send.
    Unchanged,
    /// The low set changed and is non-empty.
    AlertLow,
    /// The low set just became empty; announced exactly once.
    AllClear,
}

/// The last-sent fingerprint. Owned by the monitor task, which is the single
/// writer; everyone else reaches it through the monitor's request queue.
/// Not persisted: a restart re-sends the first alert even if nothing changed.
#[derive(Debug, Default)]
pub struct NotificationState {
    last_fingerprint: String,
}

impl NotificationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compares and unconditionally stores the new fingerprint. The store is
    /// not rolled back if the subsequent dispatch fails; failed sends are not
    /// retried at this layer.
    pub fn observe(&mut self, fingerprint: String) -> StockTransition {
        if fingerprint == self.last_fingerprint {
            return StockTransition::Unchanged;
        }
        self.last_fingerprint = fingerprint;
        if self.last_fingerprint.is_empty() {
            StockTransition::AllClear
        } else {
            StockTransition::AlertLow
        }
    }

    /// Forgets the last fingerprint so the next check reports afresh, even if
    /// the low set is unchanged. Used after restocks and target registration.
    pub fn reset(&mut self) {
        self.last_fingerprint.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::enums::ItemCategory;
    use chrono::Utc;

    fn item(
        id: i32,
        name: &str,
        category: ItemCategory,
        quantity: i32,
        min_quantity: i32,
    ) -> inventory_item::Model {
        let now = Utc::now();
        inventory_item::Model {
            id,
            name: name.to_string(),
            category,
            quantity,
            min_quantity,
            unit: "pcs".to_string(),
            price: 1.0,
            supplier: None,
            description: None,
            last_updated: now,
            updated_by_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_set_has_empty_fingerprint() {
        assert_eq!(fingerprint(&[]), "");
    }

    #[test]
    fn test_fingerprint_changes_with_quantity_and_membership() {
        let a = item(1, "Bolts", ItemCategory::Consumable, 5, 10);
        let b = item(2, "Steel Rod", ItemCategory::Material, 1, 4);

        let just_a = fingerprint(std::slice::from_ref(&a));
        assert_eq!(just_a, "1-Bolts-5-10");

        let both = fingerprint(&[a.clone(), b.clone()]);
        assert_eq!(both, "1-Bolts-5-10|2-Steel Rod-1-4");
        assert_ne!(just_a, both);

        let mut a_dropped = a.clone();
        a_dropped.quantity = 4;
        assert_ne!(
            fingerprint(std::slice::from_ref(&a)),
            fingerprint(std::slice::from_ref(&a_dropped))
        );
    }

    #[test]
    fn test_fingerprint_is_order_independent() {
        let a = item(1, "Bolts", ItemCategory::Consumable, 5, 10);
        let b = item(2, "Steel Rod", ItemCategory::Material, 1, 4);

        assert_eq!(
            fingerprint(&[a.clone(), b.clone()]),
            fingerprint(&[b, a])
        );
    }

    #[test]
    fn test_transition_sequence_notifies_twice() {
        // [none low] -> [A low] -> [A low, unchanged] -> [none low]
        let a = item(1, "Bolts", ItemCategory::Consumable, 5, 10);
        let mut state = NotificationState::new();

        assert_eq!(state.observe(fingerprint(&[])), StockTransition::Unchanged);
        assert_eq!(
            state.observe(fingerprint(std::slice::from_ref(&a))),
            StockTransition::AlertLow
        );
        assert_eq!(
            state.observe(fingerprint(std::slice::from_ref(&a))),
            StockTransition::Unchanged
        );
        assert_eq!(state.observe(fingerprint(&[])), StockTransition::AllClear);
        // Still-empty afterwards stays silent.
        assert_eq!(state.observe(fingerprint(&[])), StockTransition::Unchanged);
    }

    #[test]
    fn test_reset_bypasses_suppression() {
        let a = item(1, "Bolts", ItemCategory::Consumable, 5, 10);
        let fp = fingerprint(std::slice::from_ref(&a));
        let mut state = NotificationState::new();

        assert_eq!(state.observe(fp.clone()), StockTransition::AlertLow);
        assert_eq!(state.observe(fp.clone()), StockTransition::Unchanged);

        // After a reset the same low set alerts again (post-restock behavior).
        state.reset();
        assert_eq!(state.observe(fp), StockTransition::AlertLow);
    }
}
