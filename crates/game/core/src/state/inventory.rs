use std::collections::BTreeMap;

use crate::equipment::EquipmentInstance;

/// Stackable goods by item id, plus unequipped equipment instances.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryState {
    pub materials: BTreeMap<String, u32>,
    pub consumables: BTreeMap<String, u32>,
    pub equipment: Vec<EquipmentInstance>,
}

fn add_to(stack: &mut BTreeMap<String, u32>, item_id: &str, quantity: u32) {
    let count = stack.entry(item_id.to_string()).or_default();
    *count = count.saturating_add(quantity);
}

fn take_from(stack: &mut BTreeMap<String, u32>, item_id: &str, quantity: u32) -> bool {
    match stack.get_mut(item_id) {
        Some(count) if *count >= quantity => {
            *count -= quantity;
            if *count == 0 {
                stack.remove(item_id);
            }
            true
        }
        _ => false,
    }
}

impl InventoryState {
    pub fn add_material(&mut self, item_id: &str, quantity: u32) {
        add_to(&mut self.materials, item_id, quantity);
    }

    pub fn add_consumable(&mut self, item_id: &str, quantity: u32) {
        add_to(&mut self.consumables, item_id, quantity);
    }

    pub fn consumable_count(&self, item_id: &str) -> u32 {
        self.consumables.get(item_id).copied().unwrap_or(0)
    }

    /// Removes `quantity` consumables. Returns false and leaves the stack
    /// unchanged when there are not enough.
    pub fn take_consumable(&mut self, item_id: &str, quantity: u32) -> bool {
        take_from(&mut self.consumables, item_id, quantity)
    }

    pub fn equipment(&self, unique_id: u64) -> Option<&EquipmentInstance> {
        self.equipment.iter().find(|item| item.unique_id == unique_id)
    }

    pub fn equipment_mut(&mut self, unique_id: u64) -> Option<&mut EquipmentInstance> {
        self.equipment
            .iter_mut()
            .find(|item| item.unique_id == unique_id)
    }

    pub fn take_equipment(&mut self, unique_id: u64) -> Option<EquipmentInstance> {
        let index = self
            .equipment
            .iter()
            .position(|item| item.unique_id == unique_id)?;
        Some(self.equipment.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumables_stack_and_empty_stacks_are_removed() {
        let mut inventory = InventoryState::default();
        inventory.add_consumable("bread", 2);
        inventory.add_consumable("bread", 1);
        assert_eq!(inventory.consumable_count("bread"), 3);

        assert!(!inventory.take_consumable("bread", 4));
        assert_eq!(inventory.consumable_count("bread"), 3);

        assert!(inventory.take_consumable("bread", 3));
        assert!(!inventory.consumables.contains_key("bread"));
    }
}
