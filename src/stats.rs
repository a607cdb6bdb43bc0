// src/stats.rs
//
// Dashboard aggregates over the current record list.

use std::collections::HashMap;

use crate::model::Record;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassStats {
    pub total: usize,
    /// (class label, count) in order of first appearance.
    pub per_class: Vec<(String, usize)>,
}

impl ClassStats {
    pub fn from_records(records: &[Record]) -> Self {
        let mut slot: HashMap<&str, usize> = HashMap::new();
        let mut per_class: Vec<(String, usize)> = Vec::new();

        for r in records {
            match slot.get(r.class_name.as_str()) {
                Some(&ix) => per_class[ix].1 += 1,
                None => {
                    slot.insert(r.class_name.as_str(), per_class.len());
                    per_class.push((r.class_name.clone(), 1));
                }
            }
        }

        Self { total: records.len(), per_class }
    }

    #[inline]
    pub fn class_count(&self) -> usize { self.per_class.len() }

    pub fn max_count(&self) -> usize {
        self.per_class.iter().map(|(_, n)| *n).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(class: &str) -> Record {
        Record {
            id: String::new(),
            full_name: String::new(),
            class_name: class.into(),
            dob: String::new(),
            created_at: None,
        }
    }

    #[test]
    fn counts_in_first_appearance_order() {
        let rs = vec![rec("12A1"), rec("11B"), rec("12A1"), rec("10C"), rec("11B"), rec("12A1")];
        let st = ClassStats::from_records(&rs);
        assert_eq!(st.total, 6);
        assert_eq!(st.class_count(), 3);
        assert_eq!(
            st.per_class,
            vec![("12A1".into(), 3), ("11B".into(), 2), ("10C".into(), 1)]
        );
        assert_eq!(st.max_count(), 3);
    }

    #[test]
    fn empty_list() {
        let st = ClassStats::from_records(&[]);
        assert_eq!(st, ClassStats::default());
        assert_eq!(st.max_count(), 0);
    }
}
