use fxhash::FxBuildHasher;
use indexmap::IndexMap;

type FxMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Label name -> command index, in declaration order.
///
/// Filled once while loading and only read while running, so labels declared
/// after a `goto` still resolve.
#[derive(Clone, Debug, Default)]
pub struct LabelTable {
    map: FxMap<String, usize>,
}

impl LabelTable {
    pub fn new() -> Self {
        LabelTable {
            map: IndexMap::with_hasher(FxBuildHasher::default()),
        }
    }

    /// Bind `name` to `index`. On a duplicate the table is unchanged and the
    /// existing index is returned.
    pub fn insert(&mut self, name: &str, index: usize) -> Result<(), usize> {
        if let Some(&existing) = self.map.get(name) {
            return Err(existing);
        }
        self.map.insert(name.to_owned(), index);
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.map.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.map.iter().map(|(name, &idx)| (name.as_str(), idx))
    }

    /// Names bound to `index`, in declaration order.
    pub fn labels_at(&self, index: usize) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(move |&(_, idx)| idx == index)
            .map(|(name, _)| name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn insert_and_find() {
        let mut labels = LabelTable::new();
        assert!(labels.is_empty());
        labels.insert("top", 0).unwrap();
        labels.insert("end", 4).unwrap();
        assert_eq!(labels.find("top"), Some(0));
        assert_eq!(labels.find("end"), Some(4));
        assert_eq!(labels.find("middle"), None);
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut labels = LabelTable::new();
        labels.insert("again", 1).unwrap();
        assert_eq!(labels.insert("again", 7), Err(1));
        assert_eq!(labels.find("again"), Some(1));
        assert_eq!(labels.len(), 1);
    }

    #[test]
    fn several_labels_share_an_index() {
        let mut labels = LabelTable::new();
        labels.insert("a", 2).unwrap();
        labels.insert("b", 3).unwrap();
        labels.insert("c", 2).unwrap();
        assert_eq!(labels.labels_at(2).collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(labels.labels_at(5).count(), 0);
    }
}
