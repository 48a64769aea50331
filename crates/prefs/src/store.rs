use std::collections::BTreeMap;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use appshell_util::geom::{Rect, Size};

use crate::error::PrefError;
use crate::xml;

/// String-keyed preference store.
///
/// A key is present if and only if it holds a value; the empty string
/// is a valid value, distinct from absence. Removal is an explicit
/// operation ([`unset`](Self::unset)), never a sentinel value.
///
/// The store itself is plain data: construct one per application (or
/// per test) and pass it to whoever needs it. Two stores pointed at
/// the same file are not coordinated; the last writer wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PrefStore {
    // BTreeMap keeps save() output in a stable, reproducible order.
    settings: BTreeMap<String, String>,
}

impl PrefStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the setting, or `None` if it was never set or was
    /// unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    /// Inserts or overwrites a setting.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.settings.insert(key.into(), value.into());
    }

    /// Removes a setting. Removing an absent key is a no-op.
    pub fn unset(&mut self, key: &str) {
        self.settings.remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.settings.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.settings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Merges the entries of the preference file at `path` into the
    /// store. Current entries are not purged; loaded entries overwrite
    /// same-named ones. Names and values are trimmed of surrounding
    /// whitespace.
    ///
    /// A missing file is not an error: there is simply nothing to
    /// load. A present but corrupt file reports [`PrefError::Parse`];
    /// individual malformed entries are skipped with a warning and do
    /// not fail the load.
    pub fn load(&mut self, path: &Path) -> Result<(), PrefError> {
        if !path.exists() {
            return Ok(());
        }

        let contents = fs::read_to_string(path)?;
        let entries = xml::parse_entries(&contents)?;
        log::debug!("loaded {} pref entries from {}", entries.len(), path.display());

        for (name, value) in &entries {
            let name = xml::trim_entry(name);
            let value = xml::trim_entry(value);
            self.settings.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    /// Writes every setting to the preference file at `path`, creating
    /// the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), PrefError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = fs::File::create(path)?;
        xml::write_entries(
            BufWriter::new(file),
            self.settings.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }

    /// Reads a rectangle stored under `rect_<key>_x/y/w/h`. Returns
    /// `None` unless all four components are present and numeric.
    pub fn get_rect(&self, key: &str) -> Option<Rect> {
        let prefix = format!("rect_{key}_");
        Some(Rect {
            x: self.int_setting(&format!("{prefix}x"))?,
            y: self.int_setting(&format!("{prefix}y"))?,
            w: self.int_setting(&format!("{prefix}w"))?,
            h: self.int_setting(&format!("{prefix}h"))?,
        })
    }

    /// Stores a rectangle as four decimal text settings.
    pub fn set_rect(&mut self, key: &str, rect: Rect) {
        let prefix = format!("rect_{key}_");
        self.set(format!("{prefix}x"), rect.x.to_string());
        self.set(format!("{prefix}y"), rect.y.to_string());
        self.set(format!("{prefix}w"), rect.w.to_string());
        self.set(format!("{prefix}h"), rect.h.to_string());
    }

    /// Reads a size stored under `size_<key>_w/h`.
    pub fn get_size(&self, key: &str) -> Option<Size> {
        let prefix = format!("size_{key}_");
        Some(Size {
            w: self.int_setting(&format!("{prefix}w"))?,
            h: self.int_setting(&format!("{prefix}h"))?,
        })
    }

    /// Stores a size as two decimal text settings.
    pub fn set_size(&mut self, key: &str, size: Size) {
        let prefix = format!("size_{key}_");
        self.set(format!("{prefix}w"), size.w.to_string());
        self.set(format!("{prefix}h"), size.h.to_string());
    }

    /// Reads an ordered string list stored under `enum_<key>_count`
    /// plus one positional setting per index.
    ///
    /// Returns `None` if no list was stored (no count key, or a
    /// malformed count). A stored empty list returns `Some(vec![])`.
    /// A missing positional entry yields `""` for that slot rather
    /// than failing the whole read.
    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        let prefix = format!("enum_{key}_");
        let count = self.int_setting(&format!("{prefix}count"))?;
        let count = usize::try_from(count).ok()?;

        Some(
            (0..count)
                .map(|i| self.get(&format!("{prefix}{i}")).unwrap_or("").to_string())
                .collect(),
        )
    }

    /// Stores an ordered string list, replacing any list previously
    /// stored under `key`.
    ///
    /// The old encoding is deleted before the new one is written so a
    /// shorter list leaves no stale positional entries behind: every
    /// `enum_<key>_` setting with a numeric index (or the count) is
    /// swept, even leftovers from a corrupted count. `None` items are
    /// stored as empty strings; that distinction does not survive a
    /// round trip.
    ///
    /// Items may be given as `&str` or `Option<&str>`.
    pub fn set_list<'a, I, T>(&mut self, key: &str, items: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<Option<&'a str>>,
    {
        let prefix = format!("enum_{key}_");
        let count_key = format!("{prefix}count");

        let stale: Vec<String> = self
            .settings
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .filter(|(k, _)| {
                let suffix = &k[prefix.len()..];
                suffix == "count"
                    || (!suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
            })
            .map(|(k, _)| k.clone())
            .collect();
        for k in stale {
            self.settings.remove(&k);
        }

        let mut n = 0usize;
        for item in items {
            self.set(format!("{prefix}{n}"), item.into().unwrap_or(""));
            n += 1;
        }
        self.set(count_key, n.to_string());
    }

    fn int_setting(&self, key: &str) -> Option<i32> {
        let text = self.get(key)?;
        match text.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                log::warn!("preference {key} holds non-numeric text {text:?}");
                None
            }
        }
    }
}

/// Default preference file location for the given application name:
/// `<user config dir>/<app_name>/prefs.xml`. The host stays free to
/// pass any other path to [`PrefStore::load`]/[`PrefStore::save`].
pub fn default_pref_path(app_name: &str) -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(app_name)
        .join("prefs.xml")
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "reserved-test-key";

    #[test]
    fn starts_empty() {
        let store = PrefStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get(KEY), None);
    }

    #[test]
    fn set_get_unset() {
        let mut store = PrefStore::new();

        store.set(KEY, "test-value-42-42");
        assert_eq!(store.get(KEY), Some("test-value-42-42"));

        store.unset(KEY);
        assert_eq!(store.get(KEY), None);
        assert!(!store.contains(KEY));
        assert_eq!(store.keys().count(), 0);
    }

    #[test]
    fn empty_string_is_a_present_value() {
        let mut store = PrefStore::new();
        store.set(KEY, "");
        assert_eq!(store.get(KEY), Some(""));
        assert!(store.contains(KEY));
    }

    #[test]
    fn rect_round_trips_with_negative_coordinates() {
        let mut store = PrefStore::new();
        let rect = Rect::new(-42, 43, 44, -45);

        store.set_rect(KEY, rect);

        assert_eq!(store.get(&format!("rect_{KEY}_x")), Some("-42"));
        assert_eq!(store.get(&format!("rect_{KEY}_y")), Some("43"));
        assert_eq!(store.get(&format!("rect_{KEY}_w")), Some("44"));
        assert_eq!(store.get(&format!("rect_{KEY}_h")), Some("-45"));

        assert_eq!(store.get_rect(KEY), Some(rect));
    }

    #[test]
    fn rect_is_absent_unless_all_components_parse() {
        let mut store = PrefStore::new();
        store.set_rect(KEY, Rect::new(1, 2, 3, 4));

        store.unset(&format!("rect_{KEY}_h"));
        assert_eq!(store.get_rect(KEY), None);

        store.set(format!("rect_{KEY}_h"), "not a number");
        assert_eq!(store.get_rect(KEY), None);
    }

    #[test]
    fn size_round_trips() {
        let mut store = PrefStore::new();
        let size = Size::new(42, 43);

        store.set_size(KEY, size);

        assert_eq!(store.get(&format!("size_{KEY}_w")), Some("42"));
        assert_eq!(store.get(&format!("size_{KEY}_h")), Some("43"));
        assert_eq!(store.get_size(KEY), Some(size));
    }

    #[test]
    fn list_round_trips() {
        let mut store = PrefStore::new();
        store.set_list(KEY, ["foo", "bar", "42"]);

        assert_eq!(store.get(&format!("enum_{KEY}_count")), Some("3"));
        assert_eq!(store.get_list(KEY), Some(vec!["foo".into(), "bar".into(), "42".into()]));
    }

    #[test]
    fn list_none_items_become_empty_strings() {
        let mut store = PrefStore::new();
        store.set_list(KEY, ["foo", "bar", "42"]);

        // Rewriting with more items, one of them absent.
        store.set_list(KEY, [Some("foo"), Some("bar"), Some("42"), None, Some("end")]);

        assert_eq!(
            store.get_list(KEY),
            Some(vec![
                "foo".to_string(),
                "bar".to_string(),
                "42".to_string(),
                String::new(),
                "end".to_string(),
            ])
        );
    }

    #[test]
    fn list_shrink_leaves_no_stale_entries() {
        let mut store = PrefStore::new();
        store.set_list(KEY, ["a", "b", "c", "d", "e"]);
        store.set_list(KEY, ["x", "y"]);

        assert_eq!(store.get_list(KEY), Some(vec!["x".to_string(), "y".to_string()]));
        for i in 2..5 {
            assert!(!store.contains(&format!("enum_{KEY}_{i}")));
        }
    }

    #[test]
    fn list_rewrite_sweeps_stale_entries_past_a_corrupt_count() {
        let mut store = PrefStore::new();
        store.set_list(KEY, ["a", "b", "c", "d", "e"]);

        // A damaged count must not shield the old positional entries.
        store.set(format!("enum_{KEY}_count"), "not-a-number");
        store.set_list(KEY, ["x", "y"]);

        assert_eq!(store.get_list(KEY), Some(vec!["x".to_string(), "y".to_string()]));
        for i in 2..5 {
            assert!(!store.contains(&format!("enum_{KEY}_{i}")));
        }
    }

    #[test]
    fn list_rewrite_keeps_unrelated_prefixed_keys() {
        let mut store = PrefStore::new();
        store.set(format!("enum_{KEY}_extra"), "kept");
        store.set_list(format!("{KEY}_nested").as_str(), ["deep"]);

        store.set_list(KEY, ["x"]);

        assert_eq!(store.get(&format!("enum_{KEY}_extra")), Some("kept"));
        assert_eq!(store.get_list(&format!("{KEY}_nested")), Some(vec!["deep".to_string()]));
    }

    #[test]
    fn empty_list_is_present() {
        let mut store = PrefStore::new();
        store.set_list(KEY, Vec::<&str>::new());
        assert_eq!(store.get_list(KEY), Some(vec![]));
    }

    #[test]
    fn list_is_absent_without_a_count() {
        let store = PrefStore::new();
        assert_eq!(store.get_list(KEY), None);

        let mut store = PrefStore::new();
        store.set(format!("enum_{KEY}_count"), "three");
        assert_eq!(store.get_list(KEY), None);
    }

    #[test]
    fn list_missing_positional_entry_reads_as_empty() {
        let mut store = PrefStore::new();
        store.set_list(KEY, ["a", "b"]);
        store.unset(&format!("enum_{KEY}_0"));

        assert_eq!(store.get_list(KEY), Some(vec![String::new(), "b".to_string()]));
    }

    #[test]
    fn default_path_ends_with_app_name_and_file() {
        let path = default_pref_path("appshell");
        assert!(path.ends_with("appshell/prefs.xml"));
    }
}
