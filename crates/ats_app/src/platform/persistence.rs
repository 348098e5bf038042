use std::path::Path;

use ats_engine::{load_snapshot, save_snapshot, seed_store, EntityStore, SeedSettings};
use ats_logging::{ats_error, ats_info, ats_warn};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Loads the saved store from `data_dir`, or generates a fresh one.
pub(crate) fn open_store(data_dir: &Path, seed: Option<u64>, settings: &SeedSettings) -> EntityStore {
    match load_snapshot(data_dir) {
        Ok(Some(snapshot)) => {
            ats_info!("Loaded store from {:?}", data_dir);
            return EntityStore::from_snapshot(snapshot);
        }
        Ok(None) => ats_info!("No saved store in {:?}; seeding", data_dir),
        Err(err) => ats_warn!(
            "Failed to load store from {:?}: {}; seeding a new one",
            data_dir,
            err
        ),
    }
    seeded_store(seed, settings)
}

fn seeded_store(seed: Option<u64>, settings: &SeedSettings) -> EntityStore {
    let store = EntityStore::new();
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };
    if let Err(err) = seed_store(&store, settings, &mut rng) {
        ats_error!("Seeding stopped early: {}", err);
    }
    store
}

pub(crate) fn save_store(data_dir: &Path, store: &EntityStore) {
    match save_snapshot(data_dir, &store.snapshot()) {
        Ok(path) => ats_info!("Saved store to {:?}", path),
        Err(err) => ats_error!("Failed to save store to {:?}: {}", data_dir, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ats_core::NewJob;
    use tempfile::TempDir;

    fn small() -> SeedSettings {
        SeedSettings {
            jobs: 2,
            candidates: 5,
            assessments: 1,
        }
    }

    #[test]
    fn empty_dir_is_seeded() {
        let temp = TempDir::new().unwrap();
        let store = open_store(temp.path(), Some(1), &small());
        assert_eq!(store.job_count(), 2);
        assert_eq!(store.candidate_count(), 5);
    }

    #[test]
    fn saved_store_is_preferred_over_seeding() {
        let temp = TempDir::new().unwrap();
        let store = EntityStore::new();
        store.create_job(NewJob::titled("Only Job"));
        save_store(temp.path(), &store);

        let reopened = open_store(temp.path(), Some(1), &small());
        assert_eq!(reopened.job_count(), 1);
        assert_eq!(reopened.get_job("job-1").unwrap().title, "Only Job");
    }

    #[test]
    fn unreadable_store_falls_back_to_seed() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(ats_engine::STORE_FILENAME), "not ron").unwrap();
        let store = open_store(temp.path(), Some(1), &small());
        assert_eq!(store.job_count(), 2);
    }
}
