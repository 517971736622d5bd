//! Pin and class storage sized from a [`ClassSchema`].
//!
//! The tables are allocated once, before the loading pass, and only appended
//! to afterwards; the loading pass never grows them past the discovered
//! sizes.

use crate::discovery::ClassSchema;
use crate::ids::{ClassId, PinId};
use crate::types::{PinClass, PinDirection, PinRecord, SideSet};
use kiln_common::{InternalError, KilnResult};

/// A class being filled by the loading pass.
#[derive(Clone, Debug)]
pub struct ClassSlot {
    /// The class ID.
    pub id: ClassId,
    /// Set by the first pin of the class.
    pub direction: Option<PinDirection>,
    /// Members seen so far.
    pub members: Vec<PinId>,
    capacity: u32,
}

impl ClassSlot {
    /// Number of pins discovery counted for this class.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Converts the slot into a [`PinClass`]; `None` if no pin set its direction.
    pub fn into_class(self) -> Option<PinClass> {
        let ClassSlot {
            id,
            direction,
            members,
            ..
        } = self;
        direction.map(|direction| PinClass {
            id,
            direction,
            members,
        })
    }
}

/// Class and pin tables under construction.
#[derive(Clone, Debug)]
pub struct PinTables {
    classes: Vec<ClassSlot>,
    pins: Vec<PinRecord>,
    expected_pins: usize,
}

impl PinTables {
    /// Allocates exactly the storage described by `schema`.
    pub fn allocate(schema: &ClassSchema) -> Self {
        let classes = schema
            .pins_per_class()
            .iter()
            .enumerate()
            .map(|(i, &n)| ClassSlot {
                id: ClassId::from_raw(i as u32),
                direction: None,
                members: Vec::with_capacity(n as usize),
                capacity: n,
            })
            .collect();
        Self {
            classes,
            pins: Vec::with_capacity(schema.total_pins()),
            expected_pins: schema.total_pins(),
        }
    }

    /// Number of class slots.
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Number of pins committed so far.
    pub fn num_pins(&self) -> usize {
        self.pins.len()
    }

    /// The slot for `class`, if discovery sized one.
    pub fn class(&self, class: u32) -> Option<&ClassSlot> {
        self.classes.get(class as usize)
    }

    /// Mutable access to the slot for `class`.
    pub fn class_mut(&mut self, class: u32) -> Option<&mut ClassSlot> {
        self.classes.get_mut(class as usize)
    }

    /// The ID the next committed pin will receive.
    pub fn next_pin(&self) -> PinId {
        PinId::from_raw(self.pins.len() as u32)
    }

    /// Appends a pin to the pin table and to its class's member list.
    ///
    /// Fails if the class was not discovered or is already full; either means
    /// the two passes read different statements.
    pub fn commit_pin(&mut self, class: u32, sides: SideSet) -> KilnResult<PinId> {
        let index = self.next_pin();
        if self.pins.len() >= self.expected_pins {
            return Err(InternalError::new(format!(
                "pin {index} exceeds the {} pins found by discovery",
                self.expected_pins
            )));
        }
        let slot = self.classes.get_mut(class as usize).ok_or_else(|| {
            InternalError::new(format!("class {class} was not found by discovery"))
        })?;
        if slot.members.len() >= slot.capacity as usize {
            return Err(InternalError::new(format!(
                "class {class} has more than the {} pins found by discovery",
                slot.capacity
            )));
        }
        slot.members.push(index);
        self.pins.push(PinRecord {
            index,
            class: ClassId::from_raw(class),
            sides,
        });
        Ok(index)
    }

    /// Finalizes the tables into class slots and the pin list.
    ///
    /// Classes that never received a pin keep an unset direction; the caller
    /// decides how to report them.
    pub fn finish(self) -> (Vec<ClassSlot>, Vec<PinRecord>) {
        (self.classes, self.pins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    fn sides(list: &[Side]) -> SideSet {
        list.iter().copied().collect()
    }

    #[test]
    fn allocates_from_schema() {
        let tables = PinTables::allocate(&ClassSchema::from_counts(vec![2, 1]));
        assert_eq!(tables.num_classes(), 2);
        assert_eq!(tables.num_pins(), 0);
        assert_eq!(tables.class(0).unwrap().capacity(), 2);
        assert!(tables.class(0).unwrap().direction.is_none());
        assert!(tables.class(2).is_none());
    }

    #[test]
    fn commit_assigns_sequential_ids() {
        let mut tables = PinTables::allocate(&ClassSchema::from_counts(vec![2, 1]));
        let a = tables.commit_pin(1, sides(&[Side::Top])).unwrap();
        let b = tables.commit_pin(0, sides(&[Side::Left])).unwrap();
        let c = tables.commit_pin(0, sides(&[Side::Right])).unwrap();
        assert_eq!((a.as_raw(), b.as_raw(), c.as_raw()), (0, 1, 2));
        assert_eq!(tables.class(0).unwrap().members, vec![b, c]);
        let (classes, pins) = tables.finish();
        assert_eq!(classes.len(), 2);
        assert_eq!(pins[0].class, ClassId::from_raw(1));
    }

    #[test]
    fn overflow_is_internal_error() {
        let mut tables = PinTables::allocate(&ClassSchema::from_counts(vec![1, 1]));
        tables.commit_pin(0, SideSet::EMPTY).unwrap();
        let err = tables.commit_pin(0, SideSet::EMPTY).unwrap_err();
        assert!(err.message.contains("class 0"));
        let err = tables.commit_pin(5, SideSet::EMPTY).unwrap_err();
        assert!(err.message.contains("not found"));
    }

    #[test]
    fn into_class_requires_direction() {
        let tables = PinTables::allocate(&ClassSchema::from_counts(vec![1, 1]));
        let (mut slots, _) = tables.finish();
        slots[1].direction = Some(PinDirection::Driver);
        let second = slots.pop().unwrap().into_class().unwrap();
        assert_eq!(second.id, ClassId::from_raw(1));
        assert_eq!(second.direction, PinDirection::Driver);
        assert!(slots.pop().unwrap().into_class().is_none());
    }
}
