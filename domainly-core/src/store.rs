//! JSON-file-backed domain store
//!
//! The store owns the full record set and persists it as a single JSON
//! document. All mutations rewrite the file through a temp-file rename so a
//! crash mid-save cannot truncate the store.

use crate::domain::{DomainForm, DomainRecord, LOOPBACK_ADDR};
use crate::error::{Error, Result};
use crate::hierarchy::HierarchyIndex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// On-disk shape of the store file
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    next_id: i64,
    domains: Vec<DomainRecord>,
}

/// Persistent collection of managed domains
pub struct DomainStore {
    path: PathBuf,
    next_id: i64,
    domains: Vec<DomainRecord>,
}

impl DomainStore {
    /// Open (or create) a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str::<StoreFile>(&content)
                .map_err(|e| Error::Storage(format!("Invalid store file: {}", e)))?
        } else {
            StoreFile {
                next_id: 1,
                domains: Vec::new(),
            }
        };

        tracing::debug!("Opened domain store at {} ({} records)", path.display(), file.domains.len());

        Ok(Self {
            path,
            next_id: file.next_id,
            domains: file.domains,
        })
    }

    /// Open the store at the platform default location
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Platform default store path (`<data dir>/domainly/domains.json`)
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::data_dir()
            .ok_or_else(|| Error::Storage("No data directory available".to_string()))?;
        Ok(base.join("domainly").join("domains.json"))
    }

    /// All records, in insertion order
    pub fn list(&self) -> &[DomainRecord] {
        &self.domains
    }

    /// Look up a record by id
    pub fn get(&self, id: i64) -> Option<&DomainRecord> {
        self.domains.iter().find(|d| d.id == id)
    }

    /// Look up a record by exact name
    pub fn get_by_name(&self, name: &str) -> Option<&DomainRecord> {
        self.domains.iter().find(|d| d.name == name)
    }

    /// Create a new record; names are unique
    pub fn create(&mut self, form: DomainForm) -> Result<DomainRecord> {
        if self.get_by_name(&form.name).is_some() {
            return Err(Error::Duplicate(form.name));
        }

        let now = chrono::Utc::now().to_rfc3339();
        let record = DomainRecord {
            id: self.next_id,
            name: form.name,
            ip_address: form.ip_address.unwrap_or_else(|| LOOPBACK_ADDR.to_string()),
            port: form.port,
            is_active: form.is_active,
            description: form.description,
            category: form.category,
            tags: form.tags,
            parent_id: form.parent_id,
            created_at: now.clone(),
            updated_at: now,
        };

        self.next_id += 1;
        self.domains.push(record.clone());
        self.save()?;

        tracing::info!("Created domain '{}' (id {})", record.name, record.id);
        Ok(record)
    }

    /// Update an existing record from a form
    pub fn update(&mut self, id: i64, form: DomainForm) -> Result<DomainRecord> {
        // Renaming onto another record's name is a duplicate
        if let Some(existing) = self.get_by_name(&form.name) {
            if existing.id != id {
                return Err(Error::Duplicate(form.name));
            }
        }

        let record = self
            .domains
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(Error::NotFound(id))?;

        record.name = form.name;
        if let Some(ip) = form.ip_address {
            record.ip_address = ip;
        }
        record.port = form.port;
        record.is_active = form.is_active;
        record.description = form.description;
        record.category = form.category;
        record.tags = form.tags;
        record.parent_id = form.parent_id;
        record.updated_at = chrono::Utc::now().to_rfc3339();

        let updated = record.clone();
        self.save()?;
        Ok(updated)
    }

    /// Flip a record's active flag
    pub fn toggle(&mut self, id: i64) -> Result<DomainRecord> {
        let record = self
            .domains
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(Error::NotFound(id))?;

        record.is_active = !record.is_active;
        record.updated_at = chrono::Utc::now().to_rfc3339();

        let updated = record.clone();
        self.save()?;
        Ok(updated)
    }

    /// Delete a record and all of its descendants
    ///
    /// Returns the ids that were removed.
    pub fn delete(&mut self, id: i64) -> Result<Vec<i64>> {
        if self.get(id).is_none() {
            return Err(Error::NotFound(id));
        }

        let mut doomed: Vec<i64> = {
            let index = HierarchyIndex::build(&self.domains);
            index.descendants(id).iter().map(|r| r.id).collect()
        };
        doomed.push(id);

        self.domains.retain(|d| !doomed.contains(&d.id));
        self.save()?;

        tracing::info!("Deleted domain id {} ({} records total)", id, doomed.len());
        Ok(doomed)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = StoreFile {
            next_id: self.next_id,
            domains: self.domains.clone(),
        };
        let content = serde_json::to_string_pretty(&file)
            .map_err(|e| Error::Storage(format!("Failed to serialize store: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, DomainStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DomainStore::open(dir.path().join("domains.json")).unwrap();
        (dir, store)
    }

    fn form(name: &str) -> DomainForm {
        DomainForm {
            name: name.to_string(),
            is_active: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_create_and_reload() {
        let (dir, mut store) = temp_store();
        let created = store.create(form("myapp.local")).unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.ip_address, LOOPBACK_ADDR);

        let reloaded = DomainStore::open(dir.path().join("domains.json")).unwrap();
        assert_eq!(reloaded.list().len(), 1);
        assert_eq!(reloaded.get_by_name("myapp.local").unwrap().id, 1);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_dir, mut store) = temp_store();
        store.create(form("myapp.local")).unwrap();
        let err = store.create(form("myapp.local")).unwrap_err();
        assert!(matches!(err, Error::Duplicate(name) if name == "myapp.local"));
    }

    #[test]
    fn test_toggle() {
        let (_dir, mut store) = temp_store();
        let created = store.create(form("myapp.local")).unwrap();
        assert!(created.is_active);

        let toggled = store.toggle(created.id).unwrap();
        assert!(!toggled.is_active);
    }

    #[test]
    fn test_delete_cascades_to_descendants() {
        let (_dir, mut store) = temp_store();
        let parent = store.create(form("app.local")).unwrap();
        let child = store
            .create(DomainForm {
                name: "api.app.local".to_string(),
                parent_id: Some(parent.id),
                is_active: true,
                ..Default::default()
            })
            .unwrap();
        let grandchild = store
            .create(DomainForm {
                name: "v2.api.app.local".to_string(),
                parent_id: Some(child.id),
                is_active: true,
                ..Default::default()
            })
            .unwrap();
        store.create(form("unrelated.local")).unwrap();

        let removed = store.delete(parent.id).unwrap();
        assert_eq!(removed.len(), 3);
        assert!(store.get(child.id).is_none());
        assert!(store.get(grandchild.id).is_none());
        assert!(store.get_by_name("unrelated.local").is_some());
    }

    #[test]
    fn test_delete_missing_record() {
        let (_dir, mut store) = temp_store();
        assert!(matches!(store.delete(42), Err(Error::NotFound(42))));
    }

    #[test]
    fn test_update_rename_conflict() {
        let (_dir, mut store) = temp_store();
        store.create(form("one.local")).unwrap();
        let two = store.create(form("two.local")).unwrap();

        let err = store.update(two.id, form("one.local")).unwrap_err();
        assert!(matches!(err, Error::Duplicate(_)));
    }
}
