use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Entry type usable inside a [`DraftList`].
pub trait DraftEntry: Default + Clone {
    /// Blank entries are never committed.
    fn is_blank(&self) -> bool;
}

impl DraftEntry for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

/// List-valued form field whose last slot is the open draft.
///
/// The array is the only state: committed items are every slot but the last,
/// and serialization only ever emits the committed items.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftList<T> {
    entries: Vec<T>,
}

impl<T: DraftEntry> Default for DraftList<T> {
    fn default() -> Self {
        Self {
            entries: vec![T::default()],
        }
    }
}

impl<T: DraftEntry> DraftList<T> {
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        let mut entries: Vec<T> = items.into_iter().filter(|item| !item.is_blank()).collect();
        entries.push(T::default());
        Self { entries }
    }

    pub fn committed(&self) -> &[T] {
        &self.entries[..self.draft_index()]
    }

    pub fn draft(&self) -> &T {
        &self.entries[self.draft_index()]
    }

    pub fn draft_mut(&mut self) -> &mut T {
        let index = self.draft_index();
        &mut self.entries[index]
    }

    pub fn set_draft(&mut self, value: T) {
        *self.draft_mut() = value;
    }

    /// Commit the draft and open a fresh one. Returns `false` when the draft was blank.
    pub fn add(&mut self) -> bool {
        if self.draft().is_blank() {
            return false;
        }
        self.entries.push(T::default());
        true
    }

    /// Remove committed item `index`; later items shift down by one.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.draft_index() {
            return None;
        }
        Some(self.entries.remove(index))
    }

    pub fn len(&self) -> usize {
        self.draft_index()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.committed().iter()
    }

    pub fn into_items(mut self) -> Vec<T> {
        self.entries.pop();
        self.entries
    }

    fn draft_index(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }
}

impl<T: DraftEntry + Serialize> Serialize for DraftList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.committed().serialize(serializer)
    }
}

impl<'de, T: DraftEntry + Deserialize<'de>> Deserialize<'de> for DraftList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Option::<Vec<T>>::deserialize(deserializer)?;
        Ok(Self::from_items(items.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &DraftList<String>) -> Vec<&str> {
        list.iter().map(String::as_str).collect()
    }

    #[test]
    fn add_with_blank_draft_is_a_noop() {
        let mut list = DraftList::<String>::default();
        list.set_draft("   ".to_string());

        assert!(!list.add());
        assert_eq!(list.len(), 0);
        assert_eq!(list.draft(), "   ");
    }

    #[test]
    fn add_commits_one_item_and_clears_the_draft() {
        let mut list = DraftList::from_items(vec!["Ana".to_string()]);
        list.set_draft("Beatriz".to_string());

        assert!(list.add());
        assert_eq!(names(&list), vec!["Ana", "Beatriz"]);
        assert!(list.draft().is_empty());
    }

    #[test]
    fn remove_preserves_relative_order() {
        let mut list = DraftList::from_items(
            ["Ana", "Beatriz", "Carla", "Diana"]
                .into_iter()
                .map(String::from),
        );
        list.set_draft("Elisa".to_string());

        assert_eq!(list.remove(1).as_deref(), Some("Beatriz"));
        assert_eq!(names(&list), vec!["Ana", "Carla", "Diana"]);
        assert_eq!(list.draft(), "Elisa");
    }

    #[test]
    fn remove_never_touches_the_draft_slot() {
        let mut list = DraftList::from_items(vec!["Ana".to_string()]);
        list.set_draft("Beatriz".to_string());

        assert!(list.remove(1).is_none());
        assert_eq!(list.len(), 1);
        assert_eq!(list.draft(), "Beatriz");
    }

    #[test]
    fn serializes_only_committed_items() {
        let mut list = DraftList::from_items(vec!["Ana".to_string()]);
        list.set_draft("still typing".to_string());

        let json = serde_json::to_value(&list).expect("serializes");
        assert_eq!(json, serde_json::json!(["Ana"]));

        let restored: DraftList<String> = serde_json::from_value(json).expect("deserializes");
        assert_eq!(names(&restored), vec!["Ana"]);
        assert!(restored.draft().is_empty());
    }

    #[test]
    fn null_deserializes_to_an_empty_list() {
        let list: DraftList<String> =
            serde_json::from_value(serde_json::Value::Null).expect("deserializes");
        assert!(list.is_empty());
        assert_eq!(list.into_items(), Vec::<String>::new());
    }
}
