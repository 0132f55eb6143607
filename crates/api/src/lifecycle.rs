//! Operations on stored maps that aren't open in a [Session](crate::Session).

use crate::{AuthOutcome, DeletionConfirmer};
use interchange::{LockState, MapError, Result};
use log::info;
use store::FileStore;

/// Deletes the map under `key` and its preview once the user confirms.
///
/// Returns whether anything was deleted.
pub async fn delete_document(
    store: &FileStore,
    key: &str,
    confirmer: &impl DeletionConfirmer,
) -> Result<bool> {
    if !confirmer.confirm_deletion(key).await {
        info!("deletion of {key:?} cancelled");
        return Ok(false);
    }

    store.delete_document(key)?;
    Ok(true)
}

/// Locks or unlocks a stored map without opening a session on it.
pub fn set_lock_stored(
    store: &FileStore,
    key: &str,
    desired: LockState,
    outcome: AuthOutcome,
) -> Result<()> {
    if !outcome.is_granted() {
        return Err(MapError::AuthenticationDenied);
    }

    let mut doc = store.load_document(key)?;
    if doc.state == desired {
        return Ok(());
    }
    doc.state = desired;
    store.save_document(&doc)?;

    info!("map {key:?} is now {desired}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlankRenderer, Session};
    use store::StoreConfig;
    use tempfile::TempDir;

    fn store_with(name: &str) -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(StoreConfig::new(dir.path())).unwrap();
        Session::create(store.clone(), BlankRenderer::default(), name).unwrap();
        (dir, store)
    }

    #[test]
    fn deletion_waits_for_confirmation() {
        let (_dir, store) = store_with("Keep");

        assert!(!smol::block_on(delete_document(&store, "Keep", &false)).unwrap());
        assert!(store.exists("Keep"));

        assert!(smol::block_on(delete_document(&store, "Keep", &true)).unwrap());
        assert!(!store.exists("Keep"));
        assert!(store.list_files("png").unwrap().is_empty());
    }

    #[test]
    fn deleting_missing_map_fails() {
        let (_dir, store) = store_with("Present");
        let err = smol::block_on(delete_document(&store, "Absent", &true)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn stored_lock_toggle() {
        let (_dir, store) = store_with("Diary");

        let err = set_lock_stored(&store, "Diary", LockState::Locked, AuthOutcome::Denied)
            .unwrap_err();
        assert!(matches!(err, MapError::AuthenticationDenied));
        assert_eq!(store.load_document("Diary").unwrap().state, LockState::Regular);

        set_lock_stored(&store, "Diary", LockState::Locked, AuthOutcome::Granted).unwrap();
        assert_eq!(store.load_document("Diary").unwrap().state, LockState::Locked);

        let preview = store.read_preview("Diary");
        assert!(!preview.is_placeholder());
    }
}
