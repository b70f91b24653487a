//! Old-id to new-id translation built up during an import.
//!
//! Ids in a backup document belong to whatever database produced it.
//! While importing, freshly inserted rows get new ids, and child rows
//! (movimenti referencing conti/anagrafiche, anagrafiche referencing
//! tipologie) must be re-pointed through this table.

use std::collections::HashMap;

/// The entity kinds that are referenced by id inside a backup document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Conto,
    Tipologia,
    Anagrafica,
}

#[derive(Debug, Default)]
pub struct RemapTable {
    map: HashMap<(EntityKind, i32), i32>,
}

impl RemapTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: EntityKind, old_id: i32, new_id: i32) {
        self.map.insert((kind, old_id), new_id);
    }

    pub fn resolve(&self, kind: EntityKind, old_id: i32) -> Option<i32> {
        self.map.get(&(kind, old_id)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_per_kind() {
        let mut remap = RemapTable::new();
        remap.record(EntityKind::Conto, 7, 1);
        remap.record(EntityKind::Anagrafica, 7, 2);

        assert_eq!(remap.resolve(EntityKind::Conto, 7), Some(1));
        assert_eq!(remap.resolve(EntityKind::Anagrafica, 7), Some(2));
        assert_eq!(remap.resolve(EntityKind::Tipologia, 7), None);
    }

    #[test]
    fn unknown_id_is_none() {
        let remap = RemapTable::new();
        assert_eq!(remap.resolve(EntityKind::Conto, 42), None);
    }
}
