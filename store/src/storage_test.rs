use super::*;

#[test]
fn memory_round_trips_and_counts_writes() {
    let mut storage = MemoryStorage::new();
    assert_eq!(storage.read("k").expect("read"), None);
    storage.write("k", "one").expect("write");
    storage.write("k", "two").expect("write");
    assert_eq!(storage.read("k").expect("read").as_deref(), Some("two"));
    assert_eq!(storage.writes(), 2);
}

#[test]
fn file_missing_key_reads_as_none() {
    let dir = tempfile::tempdir().expect("temp dir");
    let storage = FileStorage::new(dir.path());
    assert_eq!(storage.read("absent").expect("read"), None);
}

#[test]
fn file_write_replaces_and_leaves_no_temp() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut storage = FileStorage::new(dir.path());
    storage.write("state", "{\"a\":1}").expect("write");
    storage.write("state", "{\"a\":2}").expect("overwrite");

    assert_eq!(storage.read("state").expect("read").as_deref(), Some("{\"a\":2}"));
    assert!(storage.path_for("state").ends_with("state.json"));
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .expect("read dir")
        .flatten()
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn file_write_creates_missing_directory() {
    let root = tempfile::tempdir().expect("temp dir");
    let dir = root.path().join("nested").join("deeper");
    let mut storage = FileStorage::new(&dir);
    storage.write("state", "{}").expect("write");
    assert!(dir.join("state.json").exists());
}
