//! Profile store: trait and JSON-file implementation.
//!
//! The orchestration layer only sees the `ProfileStore` trait. The
//! file-backed implementation keeps all profiles in a single JSON map
//! keyed by user id, read under a shared lock and written atomically
//! (temp file + exclusive lock + rename).

use crate::{Error, Result, UserPhysicalProfile};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Storage seam for user physical profiles
pub trait ProfileStore {
    /// Look up a user's profile; a missing profile is a normal branch,
    /// not an error.
    fn get_by_user_id(&self, user_id: &str) -> Result<Option<UserPhysicalProfile>>;

    /// Insert a new profile. Fails if the user already has one, so two
    /// racing creators cannot both succeed.
    fn add(&self, profile: UserPhysicalProfile) -> Result<UserPhysicalProfile>;

    /// Replace an existing profile. Fails if the user has none.
    fn update(&self, profile: UserPhysicalProfile) -> Result<UserPhysicalProfile>;

    /// Whether a profile exists for the user
    fn exists(&self, user_id: &str) -> Result<bool>;
}

/// JSON-file-backed profile store
pub struct JsonProfileStore {
    path: PathBuf,
}

impl JsonProfileStore {
    /// Create a store over the given profiles file (need not exist yet)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the whole profile map with a shared lock.
    ///
    /// A missing file reads as an empty store; a corrupt file is an
    /// error, never an empty store.
    fn load_all(&self) -> Result<HashMap<String, UserPhysicalProfile>> {
        if !self.path.exists() {
            tracing::debug!("No profile store at {:?}, treating as empty", self.path);
            return Ok(HashMap::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        let read_result = reader.read_to_string(&mut contents);
        file.unlock()?;
        read_result?;

        let profiles = serde_json::from_str(&contents)?;
        Ok(profiles)
    }

    /// Atomically replace the profile map on disk
    fn save_all(&self, profiles: &HashMap<String, UserPhysicalProfile>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "profile store path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(profiles)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} profiles to {:?}", profiles.len(), self.path);
        Ok(())
    }
}

impl ProfileStore for JsonProfileStore {
    fn get_by_user_id(&self, user_id: &str) -> Result<Option<UserPhysicalProfile>> {
        Ok(self.load_all()?.remove(user_id))
    }

    fn add(&self, profile: UserPhysicalProfile) -> Result<UserPhysicalProfile> {
        let mut profiles = self.load_all()?;
        if profiles.contains_key(&profile.user_id) {
            return Err(Error::Store(format!(
                "profile already exists for user {}",
                profile.user_id
            )));
        }
        profiles.insert(profile.user_id.clone(), profile.clone());
        self.save_all(&profiles)?;

        tracing::info!(user_id = %profile.user_id, "Created physical profile");
        Ok(profile)
    }

    fn update(&self, profile: UserPhysicalProfile) -> Result<UserPhysicalProfile> {
        let mut profiles = self.load_all()?;
        if !profiles.contains_key(&profile.user_id) {
            return Err(Error::Store(format!(
                "no profile to update for user {}",
                profile.user_id
            )));
        }
        profiles.insert(profile.user_id.clone(), profile.clone());
        self.save_all(&profiles)?;

        tracing::info!(user_id = %profile.user_id, "Updated physical profile");
        Ok(profile)
    }

    fn exists(&self, user_id: &str) -> Result<bool> {
        Ok(self.load_all()?.contains_key(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BiologicalSex, FitnessLevel};
    use chrono::NaiveDate;

    fn sample_profile(user_id: &str) -> UserPhysicalProfile {
        UserPhysicalProfile::new(
            user_id,
            NaiveDate::from_ymd_opt(1992, 3, 20).unwrap(),
            BiologicalSex::Male,
            Some(1780),
            Some(80000),
            188,
            Some(55),
            FitnessLevel::Beginner,
        )
        .unwrap()
    }

    #[test]
    fn test_add_and_get_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonProfileStore::new(temp_dir.path().join("profiles.json"));

        assert!(store.get_by_user_id("user-1").unwrap().is_none());
        assert!(!store.exists("user-1").unwrap());

        let added = store.add(sample_profile("user-1")).unwrap();
        let loaded = store.get_by_user_id("user-1").unwrap().unwrap();

        assert_eq!(loaded.id, added.id);
        assert_eq!(loaded.height_mm, Some(1780));
        assert_eq!(loaded.max_heart_rate, 188);
        assert!(store.exists("user-1").unwrap());
    }

    #[test]
    fn test_add_is_a_conditional_insert() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonProfileStore::new(temp_dir.path().join("profiles.json"));

        store.add(sample_profile("user-1")).unwrap();
        let second = store.add(sample_profile("user-1"));
        assert!(matches!(second, Err(Error::Store(_))));
    }

    #[test]
    fn test_update_requires_existing_profile() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonProfileStore::new(temp_dir.path().join("profiles.json"));

        let result = store.update(sample_profile("ghost"));
        assert!(matches!(result, Err(Error::Store(_))));

        store.add(sample_profile("user-1")).unwrap();
        let mut profile = store.get_by_user_id("user-1").unwrap().unwrap();
        profile.update_weight(78000).unwrap();
        store.update(profile).unwrap();

        let loaded = store.get_by_user_id("user-1").unwrap().unwrap();
        assert_eq!(loaded.weight_g, Some(78000));
    }

    #[test]
    fn test_profiles_are_independent_per_user() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonProfileStore::new(temp_dir.path().join("profiles.json"));

        store.add(sample_profile("user-1")).unwrap();
        store.add(sample_profile("user-2")).unwrap();

        let a = store.get_by_user_id("user-1").unwrap().unwrap();
        let b = store.get_by_user_id("user-2").unwrap().unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_corrupt_store_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profiles.json");
        std::fs::write(&path, "{ not json }").unwrap();

        let store = JsonProfileStore::new(&path);
        assert!(matches!(
            store.get_by_user_id("user-1"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profiles.json");
        let store = JsonProfileStore::new(&path);

        store.add(sample_profile("user-1")).unwrap();

        assert!(path.exists());
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "profiles.json")
            .collect();
        assert!(extras.is_empty(), "unexpected files: {:?}", extras);
    }
}
