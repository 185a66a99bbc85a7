//! Per-group lookup tables between ordinal positions, names and limits

use ahash::AHashMap;

use formcheck_core::{InspectionRecord, ToleranceLimits};

/// Lookups for one inspection group
///
/// Built from the group's records in sorted order. When two records share an
/// ordinal or a name, the later record wins. Borrows the records, so it
/// lives no longer than the group it was built from.
#[derive(Debug, Default)]
pub struct CharacteristicIndex<'a> {
    names_by_ordinal: AHashMap<u32, &'a str>,
    ordinals_by_name: AHashMap<&'a str, u32>,
    limits_by_name: AHashMap<&'a str, ToleranceLimits>,
}

impl<'a> CharacteristicIndex<'a> {
    /// Build the index from a group's records
    pub fn build(records: &[&'a InspectionRecord]) -> Self {
        let mut index = Self {
            names_by_ordinal: AHashMap::with_capacity(records.len()),
            ordinals_by_name: AHashMap::with_capacity(records.len()),
            limits_by_name: AHashMap::with_capacity(records.len()),
        };

        for &record in records {
            let name = record.characteristic.as_str();
            index.names_by_ordinal.insert(record.ordinal, name);
            index.ordinals_by_name.insert(name, record.ordinal);
            index.limits_by_name.insert(name, record.limits);
        }

        index
    }

    /// Name of the characteristic at an ordinal position
    pub fn ordinal_to_name(&self, ordinal: u32) -> Option<&'a str> {
        self.names_by_ordinal.get(&ordinal).copied()
    }

    /// Ordinal position of a characteristic
    pub fn name_to_ordinal(&self, name: &str) -> Option<u32> {
        self.ordinals_by_name.get(name).copied()
    }

    /// Declared limits of a characteristic; unknown names have no bounds
    pub fn limits(&self, name: &str) -> ToleranceLimits {
        self.limits_by_name.get(name).copied().unwrap_or_default()
    }

    /// Number of distinct ordinal positions
    pub(crate) fn len(&self) -> usize {
        self.names_by_ordinal.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(
        ordinal: u32,
        name: &str,
        lower: Option<f64>,
        upper: Option<f64>,
    ) -> InspectionRecord {
        InspectionRecord {
            row: 0,
            plan_group: "5000".into(),
            operation: "0010".into(),
            operation_description: String::new(),
            ordinal,
            characteristic: name.into(),
            formula: String::new(),
            limits: ToleranceLimits::new(lower, upper),
        }
    }

    #[test]
    fn test_lookups() {
        let records = [
            record(10, "KM G/G", Some(10.0), Some(12.0)),
            record(20, "YAG G/G", None, Some(4.0)),
        ];
        let refs: Vec<&InspectionRecord> = records.iter().collect();
        let index = CharacteristicIndex::build(&refs);

        assert_eq!(index.len(), 2);
        assert_eq!(index.ordinal_to_name(20), Some("YAG G/G"));
        assert_eq!(index.ordinal_to_name(30), None);
        assert_eq!(index.name_to_ordinal("KM G/G"), Some(10));
        assert_eq!(index.name_to_ordinal("TUZ"), None);
        assert_eq!(index.limits("YAG G/G"), ToleranceLimits::new(None, Some(4.0)));
        assert!(index.limits("TUZ").is_unbounded());
    }

    #[test]
    fn test_later_record_wins() {
        let records = [
            record(10, "KM G/G", Some(1.0), None),
            record(20, "KM G/G", Some(2.0), None),
            record(20, "YAG G/G", None, None),
        ];
        let refs: Vec<&InspectionRecord> = records.iter().collect();
        let index = CharacteristicIndex::build(&refs);

        assert_eq!(index.name_to_ordinal("KM G/G"), Some(20));
        assert_eq!(index.limits("KM G/G").lower, Some(2.0));
        assert_eq!(index.ordinal_to_name(20), Some("YAG G/G"));
        assert_eq!(index.ordinal_to_name(10), Some("KM G/G"));
    }

    #[test]
    fn test_empty_group() {
        let index = CharacteristicIndex::build(&[]);
        assert_eq!(index.len(), 0);
    }
}
