//! Flat directory of map blobs and their preview images.
//!
//! Every document is stored twice over: `<key>.mmd` holds the encoded
//! document and `<key>.png` a preview that listings can show without
//! decoding the map. The two writes are independent, so a failure between
//! them may leave a stale preview behind. Readers treat a missing or
//! unreadable preview as a placeholder.

use crate::{DocumentSummary, StoreConfig};
use chrono::{DateTime, Local};
use interchange::{
    decode, encode, read_header, validate_name, Document, MapError, Preview, Result,
};
use log::{debug, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Clone, Debug)]
pub struct FileStore {
    config: StoreConfig,
}

impl FileStore {
    /// Opens the store, creating its directory if needed.
    pub fn open(config: StoreConfig) -> Result<Self> {
        fs::create_dir_all(&config.root)
            .map_err(|e| MapError::io("create", &config.root, e))?;
        debug!("opened map store at {}", config.root.display());
        Ok(Self { config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn map_file_name(&self, key: &str) -> String {
        format!("{key}.{}", self.config.map_extension)
    }

    pub fn preview_file_name(&self, key: &str) -> String {
        format!("{key}.{}", self.config.preview_extension)
    }

    /// The storage key a map file name belongs to, if it is one.
    pub fn key_of<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        file_name
            .strip_suffix(self.config.map_extension.as_str())
            .and_then(|stem| stem.strip_suffix('.'))
            .filter(|key| !key.is_empty())
    }

    pub fn exists(&self, key: &str) -> bool {
        self.path(&self.map_file_name(key)).is_file()
    }

    pub fn read(&self, file_name: &str) -> Result<Vec<u8>> {
        let path = self.path(file_name);
        fs::read(&path).map_err(|e| MapError::io("read", path, e))
    }

    pub fn write(&self, file_name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(file_name);
        fs::write(&path, bytes).map_err(|e| MapError::io("write", path, e))
    }

    pub fn delete(&self, file_name: &str) -> Result<()> {
        let path = self.path(file_name);
        fs::remove_file(&path).map_err(|e| MapError::io("delete", path, e))
    }

    /// Names of every visible file ending in `.<extension>`, in directory
    /// order.
    pub fn list_files(&self, extension: &str) -> Result<Vec<String>> {
        Ok(self
            .entries(extension)?
            .into_iter()
            .map(|(name, _)| name)
            .collect())
    }

    /// Every map file in the store.
    pub fn list_all(&self) -> Result<Vec<String>> {
        self.list_files(&self.config.map_extension)
    }

    /// Map files by modification time, newest first, at most `limit` of
    /// them.
    ///
    /// Files whose time can't be read sort last. Equal times fall back to
    /// name order.
    pub fn list_recent(&self, limit: usize) -> Result<Vec<String>> {
        let mut entries = self.entries(&self.config.map_extension)?;
        entries.sort_by(|(a_name, a_time), (b_name, b_time)| {
            b_time.cmp(a_time).then_with(|| a_name.cmp(b_name))
        });
        entries.truncate(limit);
        Ok(entries.into_iter().map(|(name, _)| name).collect())
    }

    /// Map files whose key contains `needle`. Case-sensitive.
    pub fn search(&self, needle: &str) -> Result<Vec<String>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|name| self.key_of(name).is_some_and(|key| key.contains(needle)))
            .collect())
    }

    /// Writes the preview, then the encoded document, under the document's
    /// key.
    pub fn save_document(&self, doc: &Document) -> Result<()> {
        let key = doc.key();
        let blob = encode(doc)?;

        self.write(&self.preview_file_name(key), doc.preview.bytes())?;
        self.write(&self.map_file_name(key), &blob)?;

        info!("saved map {key:?} ({} nodes)", doc.map.len());
        Ok(())
    }

    /// Saves a document whose root was renamed away from `previous_key`.
    ///
    /// Refuses with [MapError::NameTaken] when the new key is already in
    /// use. The old files are removed once the new ones are written; failing
    /// to remove them leaves orphans behind but still counts as saved.
    pub fn save_renamed(&self, doc: &Document, previous_key: &str) -> Result<()> {
        let key = doc.key();
        if key == previous_key {
            return self.save_document(doc);
        }

        validate_name(key)?;
        if self.exists(key) {
            return Err(MapError::NameTaken(key.to_string()));
        }

        self.save_document(doc)?;
        if let Err(e) = self.delete_document(previous_key) {
            warn!("map {key:?} saved, but its old files under {previous_key:?} remain: {e}");
        }
        info!("renamed map {previous_key:?} to {key:?}");
        Ok(())
    }

    pub fn load_document(&self, key: &str) -> Result<Document> {
        let doc = decode(&self.read(&self.map_file_name(key))?)?;
        debug!("loaded map {key:?} ({} nodes)", doc.map.len());
        Ok(doc)
    }

    /// Removes a map and its preview. A missing preview is not an error.
    pub fn delete_document(&self, key: &str) -> Result<()> {
        match self.delete(&self.preview_file_name(key)) {
            Err(e) if e.is_not_found() => debug!("map {key:?} had no preview"),
            other => other?,
        }
        self.delete(&self.map_file_name(key))?;

        info!("deleted map {key:?}");
        Ok(())
    }

    /// The stored preview for `key`, or the placeholder.
    pub fn read_preview(&self, key: &str) -> Preview {
        match self.read(&self.preview_file_name(key)) {
            Ok(bytes) => Preview::or_placeholder(bytes),
            Err(e) => {
                warn!("{e}; using placeholder preview");
                Preview::placeholder()
            }
        }
    }

    /// Adds an external document blob to the store.
    ///
    /// The blob must decode, and its root name must be a usable key that
    /// isn't taken yet. The bytes are stored as given.
    pub fn import_bytes(&self, bytes: &[u8]) -> Result<Document> {
        let doc = decode(bytes).map_err(|e| MapError::ImportFailed(e.to_string()))?;
        let key = doc.key().to_string();

        validate_name(&key).map_err(|e| MapError::ImportFailed(e.to_string()))?;
        if self.exists(&key) {
            return Err(MapError::NameTaken(key));
        }

        self.write(&self.preview_file_name(&key), doc.preview.bytes())?;
        self.write(&self.map_file_name(&key), bytes)?;

        info!("imported map {key:?}");
        Ok(doc)
    }

    pub fn import_file(&self, source: impl AsRef<Path>) -> Result<Document> {
        let source = source.as_ref();
        let bytes = fs::read(source).map_err(|e| MapError::io("read", source, e))?;
        self.import_bytes(&bytes)
            .inspect_err(|e| warn!("import of {} failed: {e}", source.display()))
    }

    /// Listing details for one map file.
    pub fn summary(&self, file_name: &str) -> Result<DocumentSummary> {
        let key = self
            .key_of(file_name)
            .ok_or_else(|| MapError::CorruptDocument(format!("{file_name:?} isn't a map file")))?;

        let header = read_header(&self.read(file_name)?)?;
        let modified = fs::metadata(self.path(file_name))
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::<Local>::from);

        Ok(DocumentSummary {
            key: key.to_string(),
            name: header.name,
            state: header.state,
            modified,
            preview: self.read_preview(key),
        })
    }

    /// Summaries for `file_names`, skipping maps that fail to load.
    pub fn summaries(&self, file_names: &[String]) -> Vec<DocumentSummary> {
        file_names
            .iter()
            .filter_map(|name| match self.summary(name) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    warn!("skipping {name:?} in listing: {e}");
                    None
                }
            })
            .collect()
    }

    fn path(&self, file_name: &str) -> PathBuf {
        self.config.root.join(file_name)
    }

    fn entries(&self, extension: &str) -> Result<Vec<(String, SystemTime)>> {
        let suffix = format!(".{extension}");
        let dir = fs::read_dir(self.root()).map_err(|e| MapError::io("list", self.root(), e))?;

        let mut entries = Vec::new();
        for entry in dir {
            let entry = entry.map_err(|e| MapError::io("list", self.root(), e))?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with('.') || !name.ends_with(&suffix) {
                continue;
            }

            let meta = match entry.metadata() {
                Ok(meta) => meta,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(MapError::io("inspect", entry.path(), e)),
            };
            if !meta.is_file() {
                continue;
            }

            entries.push((name, meta.modified().unwrap_or(SystemTime::UNIX_EPOCH)));
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interchange::preview::{encode_png, BACKGROUND};
    use image::RgbaImage;
    use interchange::LockState;
    use node::CanvasPoint;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(StoreConfig::new(dir.path())).unwrap();
        (dir, store)
    }

    fn saved(store: &FileStore, name: &str) -> Document {
        let doc = Document::new(name).unwrap();
        store.save_document(&doc).unwrap();
        doc
    }

    fn touch(store: &FileStore, file_name: &str, secs: u64) {
        File::options()
            .write(true)
            .open(store.path(file_name))
            .unwrap()
            .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    #[test]
    fn test_save_writes_map_and_preview() {
        let (dir, store) = store();
        saved(&store, "Trip Plan");

        assert!(dir.path().join("Trip Plan.mmd").is_file());
        assert!(dir.path().join("Trip Plan.png").is_file());
        assert!(store.exists("Trip Plan"));
        assert!(!store.exists("Other"));
    }

    #[test]
    fn test_save_and_load_trip_plan() {
        let (_dir, store) = store();
        let mut doc = Document::new("Trip Plan").unwrap();
        let root = doc.map.root_id();
        let flights = doc
            .map
            .add_child(root, "Flights", Some(CanvasPoint::new(100.0, 100.0)))
            .unwrap();
        doc.map
            .add_child(flights, "Hotel", Some(CanvasPoint::new(120.0, 140.0)))
            .unwrap();
        store.save_document(&doc).unwrap();

        let loaded = store.load_document("Trip Plan").unwrap();
        assert_eq!(loaded.map.to_string(), "Trip Plan {Flights {Hotel}}");
        let flights = loaded.map.children(loaded.map.root_id()).next().unwrap();
        assert_eq!(flights.position(), Some(CanvasPoint::new(100.0, 100.0)));
        let hotel = loaded.map.children(flights.id()).next().unwrap();
        assert_eq!(hotel.position(), Some(CanvasPoint::new(120.0, 140.0)));
    }

    #[test]
    fn test_load_missing_is_io_failure() {
        let (_dir, store) = store();
        let err = store.load_document("nope").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_corrupt_blob() {
        let (_dir, store) = store();
        store.write("Broken.mmd", b"{\"rootNode\": 3}").unwrap();
        assert!(matches!(
            store.load_document("Broken"),
            Err(MapError::CorruptDocument(_))
        ));
    }

    #[test]
    fn test_list_all_filters_extension_and_hidden() {
        let (dir, store) = store();
        saved(&store, "Alpha");
        saved(&store, "Beta");
        store.write(".Hidden.mmd", b"{}").unwrap();
        store.write("notes.txt", b"").unwrap();
        fs::create_dir(dir.path().join("Folder.mmd")).unwrap();

        let mut all = store.list_all().unwrap();
        all.sort();
        assert_eq!(all, ["Alpha.mmd", "Beta.mmd"]);

        let mut previews = store.list_files("png").unwrap();
        previews.sort();
        assert_eq!(previews, ["Alpha.png", "Beta.png"]);
    }

    #[test]
    fn test_list_recent_orders_by_modification_time() {
        let (_dir, store) = store();
        for (name, secs) in [("Old", 1_000), ("Newest", 3_000), ("Middle", 2_000)] {
            saved(&store, name);
            touch(&store, &store.map_file_name(name), secs);
        }

        assert_eq!(
            store.list_recent(10).unwrap(),
            ["Newest.mmd", "Middle.mmd", "Old.mmd"]
        );
        assert_eq!(store.list_recent(2).unwrap(), ["Newest.mmd", "Middle.mmd"]);
        assert!(store.list_recent(0).unwrap().is_empty());
    }

    #[test]
    fn test_search_is_case_sensitive_substring() {
        let (_dir, store) = store();
        saved(&store, "Trip Plan");
        saved(&store, "Road trip");
        saved(&store, "Groceries");

        let mut hits = store.search("trip").unwrap();
        hits.sort();
        assert_eq!(hits, ["Road trip.mmd"]);
        assert_eq!(store.search("Trip").unwrap(), ["Trip Plan.mmd"]);
        assert!(store.search("mmd").unwrap().is_empty());
    }

    #[test]
    fn test_delete_removes_both_files() {
        let (dir, store) = store();
        saved(&store, "Gone");
        store.delete_document("Gone").unwrap();
        assert!(!dir.path().join("Gone.mmd").exists());
        assert!(!dir.path().join("Gone.png").exists());
        assert!(store.delete_document("Gone").unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_tolerates_missing_preview() {
        let (_dir, store) = store();
        saved(&store, "Half");
        store.delete("Half.png").unwrap();
        store.delete_document("Half").unwrap();
        assert!(!store.exists("Half"));
    }

    #[test]
    fn test_read_preview_falls_back_to_placeholder() {
        let (_dir, store) = store();
        let mut doc = Document::new("Pic").unwrap();
        doc.preview = Preview::from_bytes(encode_png(&image_of(6, 4)).unwrap()).unwrap();
        store.save_document(&doc).unwrap();
        assert_eq!(store.read_preview("Pic").dimensions(), Some((6, 4)));

        store.write("Pic.png", b"garbage").unwrap();
        assert!(store.read_preview("Pic").is_placeholder());
        assert!(store.read_preview("Missing").is_placeholder());
    }

    fn image_of(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, BACKGROUND)
    }

    #[test]
    fn test_import_stores_blob_and_preview() {
        let (_dir, source) = store();
        let doc = saved(&source, "Imported");
        let bytes = encode(&doc).unwrap();

        let (_other, store) = store();
        let imported = store.import_bytes(&bytes).unwrap();
        assert_eq!(imported.key(), "Imported");
        assert_eq!(store.read("Imported.mmd").unwrap(), bytes);
        assert!(store.exists("Imported"));
        assert_eq!(store.list_files("png").unwrap(), ["Imported.png"]);
    }

    #[test]
    fn test_import_rejects_invalid_and_colliding() {
        let (_dir, store) = store();
        assert!(matches!(
            store.import_bytes(b"not a map"),
            Err(MapError::ImportFailed(_))
        ));

        let doc = saved(&store, "Taken");
        let err = store.import_bytes(&encode(&doc).unwrap()).unwrap_err();
        assert!(matches!(err, MapError::NameTaken(name) if name == "Taken"));
    }

    #[test]
    fn test_import_file() {
        let (dir, store) = store();
        let source = dir.path().join("outside.json");
        fs::write(&source, encode(&Document::new("From Disk").unwrap()).unwrap()).unwrap();

        store.import_file(&source).unwrap();
        assert!(store.exists("From Disk"));
        assert!(store.import_file(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_save_renamed_rekeys() {
        let (_dir, store) = store();
        let mut doc = saved(&store, "Draft");
        saved(&store, "Final");

        let root = doc.map.root_id();
        doc.map.rename(root, "Final").unwrap();
        assert!(matches!(
            store.save_renamed(&doc, "Draft"),
            Err(MapError::NameTaken(_))
        ));
        assert!(store.exists("Draft"));

        doc.map.rename(root, "Published").unwrap();
        store.save_renamed(&doc, "Draft").unwrap();
        assert!(store.exists("Published"));
        assert!(!store.exists("Draft"));
        assert!(store.read("Draft.png").unwrap_err().is_not_found());
    }

    #[test]
    fn test_summaries_skip_corrupt_maps() {
        let (_dir, store) = store();
        let mut doc = Document::new("Secret").unwrap();
        doc.state = LockState::Locked;
        store.save_document(&doc).unwrap();
        store.write("Broken.mmd", b"nope").unwrap();

        let files = store.list_all().unwrap();
        let summaries = store.summaries(&files);
        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.key, "Secret");
        assert_eq!(summary.name, "Secret");
        assert_eq!(summary.state, LockState::Locked);
        assert!(summary.modified.is_some());
    }

    #[test]
    fn test_key_of() {
        let (_dir, store) = store();
        assert_eq!(store.key_of("Trip Plan.mmd"), Some("Trip Plan"));
        assert_eq!(store.key_of("Trip Plan.png"), None);
        assert_eq!(store.key_of(".mmd"), None);
        assert_eq!(store.key_of("mmd"), None);
    }

    #[test]
    fn test_save_renamed_survives_stuck_old_files() {
        let (_dir, store) = store();
        let mut doc = saved(&store, "Ghost");
        // A directory where the old preview should be can't be deleted as a file.
        fs::remove_file(store.root().join("Ghost.png")).unwrap();
        fs::create_dir(store.root().join("Ghost.png")).unwrap();

        let root = doc.map.root_id();
        doc.map.rename(root, "Renamed").unwrap();
        store.save_renamed(&doc, "Ghost").unwrap();

        assert_eq!(store.load_document("Renamed").unwrap().key(), "Renamed");
        assert!(store.exists("Ghost"));
    }

    #[test]
    fn test_summary_reads_header_only() {
        let (_dir, store) = store();
        store
            .write(
                "Lean.mmd",
                br#"{"rootNode": {"name": "Lean", "children": []}, "state": "locked"}"#,
            )
            .unwrap();

        let summary = store.summary("Lean.mmd").unwrap();
        assert_eq!(summary.name, "Lean");
        assert!(summary.is_locked());
        assert!(summary.preview.is_placeholder());
    }
}
