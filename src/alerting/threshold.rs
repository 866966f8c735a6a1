use crate::db::entities::inventory_item;

/// Applied when an item has no usable minimum configured.
pub const DEFAULT_MIN_QUANTITY: i32 = 10;

/// The threshold actually applied: a non-positive stored minimum falls back to
/// the default, so percent computations can never divide by zero.
pub fn effective_min_quantity(item: &inventory_item::Model) -> i32 {
    if item.min_quantity > 0 {
        item.min_quantity
    } else {
        DEFAULT_MIN_QUANTITY
    }
}

/// Strictly below the threshold. Sitting exactly at the minimum is not low.
pub fn is_low(item: &inventory_item::Model) -> bool {
    item.quantity < effective_min_quantity(item)
}

/// How much of the threshold is still covered, rounded to whole percent.
pub fn percent_remaining(item: &inventory_item::Model) -> i32 {
    let min = effective_min_quantity(item);
    ((item.quantity as f64 / min as f64) * 100.0).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::enums::ItemCategory;
    use chrono::Utc;

    fn item(quantity: i32, min_quantity: i32) -> inventory_item::Model {
        let now = Utc::now();
        inventory_item::Model {
            id: 1,
            name: "Bolts".to_string(),
            category: ItemCategory::Consumable,
            quantity,
            min_quantity,
            unit: "pcs".to_string(),
            price: 0.5,
            supplier: None,
            description: None,
            last_updated: now,
            updated_by_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_strictly_below_threshold_is_low() {
        assert!(is_low(&item(9, 10)));
        assert!(is_low(&item(0, 10)));
        assert!(!is_low(&item(11, 10)));
    }

    #[test]
    fn test_boundary_quantity_is_not_low() {
        assert!(!is_low(&item(10, 10)));
    }

    #[test]
    fn test_unset_minimum_falls_back_to_default() {
        assert_eq!(effective_min_quantity(&item(5, 0)), DEFAULT_MIN_QUANTITY);
        assert!(is_low(&item(9, 0)));
        assert!(!is_low(&item(10, 0)));
    }

    #[test]
    fn test_percent_remaining_rounds() {
        assert_eq!(percent_remaining(&item(5, 10)), 50);
        assert_eq!(percent_remaining(&item(1, 3)), 33);
        assert_eq!(percent_remaining(&item(2, 3)), 67);
        // No division by zero with an unset minimum.
        assert_eq!(percent_remaining(&item(5, 0)), 50);
    }
}
