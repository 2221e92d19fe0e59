mod run;
mod store;

pub use run::run;
pub use store::{ReferenceMap, ReferenceStore};

#[cfg(test)]
mod tests {
    use std::fs;

    use super::run::read_reference_file;
    use super::*;
    use crate::model::ReferenceEntry;

    fn entry(source: &str, target: &str, is_bad_source: bool) -> ReferenceEntry {
        ReferenceEntry {
            source: source.to_string(),
            target: target.to_string(),
            is_bad_source,
        }
    }

    #[test]
    fn reference_map_excludes_bad_sources() {
        let map = ReferenceMap::from_entries(vec![
            entry("Hello.", "Ahoj.", false),
            entry("Broken source", "Rozbité", true),
        ]);

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("Hello."), Some("Ahoj."));
        assert_eq!(map.get("Broken source"), None);
    }

    #[test]
    fn reference_map_keeps_last_entry_for_repeated_source() {
        let map = ReferenceMap::from_entries(vec![
            entry("Hello.", "first", false),
            entry("Hello.", "second", false),
        ]);
        assert_eq!(map.get("Hello."), Some("second"));
    }

    #[test]
    fn store_returns_entries_for_requested_corpus_in_insertion_order() {
        let mut store = ReferenceStore::open_in_memory().expect("in-memory store");
        let cs_a = entry("a", "a-cs", false);
        let ja_a = entry("a", "a-ja", false);
        let cs_b = entry("b", "b-cs", true);
        store
            .insert_entries(
                vec![("en-cs_CZ", &cs_a), ("en-ja_JP", &ja_a), ("en-cs_CZ", &cs_b)],
                false,
            )
            .expect("insert");

        let entries = store.entries("en-cs_CZ").expect("entries");
        assert_eq!(entries, vec![cs_a, cs_b]);
        assert!(store.entries("en-ru_RU").expect("entries").is_empty());

        let counts = store.corpus_counts().expect("counts");
        assert_eq!(
            counts,
            vec![
                ("en-cs_CZ".to_string(), 2, 1),
                ("en-ja_JP".to_string(), 1, 0)
            ]
        );
    }

    #[test]
    fn replace_import_drops_previous_rows_for_the_same_corpus_only() {
        let mut store = ReferenceStore::open_in_memory().expect("in-memory store");
        let old_cs = entry("old", "stare", false);
        let ja = entry("kept", "keep", false);
        store
            .insert_entries(vec![("en-cs_CZ", &old_cs), ("en-ja_JP", &ja)], false)
            .expect("first insert");

        let new_cs = entry("new", "nove", false);
        store
            .insert_entries(vec![("en-cs_CZ", &new_cs)], true)
            .expect("replace insert");

        assert_eq!(store.entries("en-cs_CZ").expect("entries"), vec![new_cs]);
        assert_eq!(store.entries("en-ja_JP").expect("entries"), vec![ja]);
    }

    #[test]
    fn read_reference_file_defaults_missing_bad_source_flag() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("wmt24pp.jsonl");
        fs::write(
            &path,
            concat!(
                "{\"lp\": \"en-ja_JP\", \"source\": \"Hi\", \"target\": \"やあ\"}\n",
                "\n",
                "{\"lp\": \"en-ja_JP\", \"source\": \"Bad\", \"target\": \"悪い\", \"is_bad_source\": true}\n",
            ),
        )
        .expect("write corpus");

        let entries = read_reference_file(&path).expect("read corpus");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "en-ja_JP");
        assert!(!entries[0].1.is_bad_source);
        assert!(entries[1].1.is_bad_source);
    }

    #[test]
    fn store_reopened_read_only_serves_lookups_and_rejects_writes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("refs").join("references.sqlite");
        let hello = entry("Hello.", "Привет.", false);
        {
            let mut store = ReferenceStore::open(&db_path).expect("open store");
            store
                .insert_entries(vec![("en-ru_RU", &hello)], false)
                .expect("insert");
        }

        let mut store = ReferenceStore::open_read_only(&db_path).expect("reopen");
        assert_eq!(store.entries("en-ru_RU").expect("entries"), vec![hello.clone()]);
        assert!(store.insert_entries(vec![("en-ru_RU", &hello)], false).is_err());
    }

    #[test]
    fn open_read_only_refuses_to_create_a_database() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("absent.sqlite");

        assert!(ReferenceStore::open_read_only(&db_path).is_err());
        assert!(!db_path.exists());
    }
}
