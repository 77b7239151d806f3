use super::{errors::StoreError, models::*, LOG_TARGET};
use crate::types::Address;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use log::info;
use regex::Regex;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

lazy_static! {
    static ref LEGACY_MATCHER: Regex = Regex::new(r"^contract_([0-9a-f]{40})\.swagger\.json$").unwrap();
    static ref INSTANCE_MATCHER: Regex = Regex::new(r"^contract_([0-9a-f]{40})\.instance\.json$").unwrap();
    static ref ABI_MATCHER: Regex = Regex::new(r"^abi_([0-9a-z_-]+)\.deploy\.json$").unwrap();
    static ref ABI_ID: Regex = Regex::new(r"^[0-9a-z_-]+$").unwrap();
}

/// File kinds found under the store root, classified by name
#[derive(Clone, Debug, PartialEq)]
pub enum StoredFile {
    /// Obsolete combined descriptor, migrated away at startup
    Legacy(Address),
    Instance(Address),
    Abi(String),
    Unrecognized,
}

/// One file per ABI and one file per contract instance under a root directory.
///
/// The store owns the on-disk naming convention; nothing else builds these paths.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Open store at `root`, creating the directory if needed
    pub fn open<P: Into<PathBuf>>(root: P) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Write {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stored form of a caller supplied ABI id: lowercased, `None` when it can't be used as a file key
    pub fn normalize_abi_id(id: &str) -> Option<String> {
        let id = id.to_lowercase();
        if ABI_ID.is_match(&id) {
            Some(id)
        } else {
            None
        }
    }

    /// Persist full deployment payload under `id`, overwriting any existing file
    pub fn write_abi(&self, id: &str, msg: &DeployContract) -> Result<(), StoreError> {
        if !ABI_ID.is_match(id) {
            return Err(StoreError::Write {
                path: self.root.join(id),
                source: ErrorKind::InvalidInput.into(),
            });
        }
        let path = self.abi_path(id);
        info!(target: LOG_TARGET, "{}: Stashing deployment details to '{}'", id, path.display());
        self.write_json(id, &path, msg)
    }

    pub fn read_abi(&self, id: &str) -> Result<DeployContract, StoreError> {
        if !ABI_ID.is_match(id) {
            return Err(StoreError::not_found("ABI", id));
        }
        self.read_json("ABI", id, &self.abi_path(id))
    }

    /// Last modification time of the ABI file, used as its creation time
    pub fn abi_modified(&self, id: &str) -> Option<DateTime<Utc>> {
        let modified = fs::metadata(self.abi_path(id)).and_then(|meta| meta.modified()).ok()?;
        Some(modified.into())
    }

    pub fn write_instance(&self, record: &ContractRecord) -> Result<(), StoreError> {
        let path = self.instance_path(&record.address);
        info!(
            target: LOG_TARGET,
            "{}: Storing contract instance JSON to '{}'",
            record.abi,
            path.display()
        );
        self.write_json(record.address.as_str(), &path, record)
    }

    pub fn read_instance(&self, address: &Address) -> Result<ContractRecord, StoreError> {
        self.read_json("Contract", address.as_str(), &self.instance_path(address))
    }

    pub fn remove_instance(&self, address: &Address) -> Result<(), StoreError> {
        let path = self.instance_path(address);
        fs::remove_file(&path).map_err(|source| StoreError::Write { path, source })
    }

    /// Decode a legacy combined descriptor into the caller's schema
    pub fn read_legacy<T: DeserializeOwned>(&self, address: &Address) -> Result<T, StoreError> {
        self.read_json("Legacy descriptor", address.as_str(), &self.legacy_path(address))
    }

    pub fn remove_legacy(&self, address: &Address) -> Result<(), StoreError> {
        let path = self.legacy_path(address);
        fs::remove_file(&path).map_err(|source| StoreError::Write { path, source })
    }

    /// File names under the store root, directory entries that can't be read are skipped
    pub fn list_files(&self) -> Result<impl Iterator<Item = String>, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(|source| StoreError::Read {
            path: self.root.clone(),
            source,
        })?;
        Ok(entries
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok()))
    }

    pub fn classify(file_name: &str) -> StoredFile {
        let address = |captures: regex::Captures| -> Option<Address> { captures[1].parse().ok() };
        if let Some(address) = LEGACY_MATCHER.captures(file_name).and_then(address) {
            StoredFile::Legacy(address)
        } else if let Some(address) = INSTANCE_MATCHER.captures(file_name).and_then(address) {
            StoredFile::Instance(address)
        } else if let Some(captures) = ABI_MATCHER.captures(file_name) {
            StoredFile::Abi(captures[1].to_string())
        } else {
            StoredFile::Unrecognized
        }
    }

    fn abi_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("abi_{}.deploy.json", id))
    }

    fn instance_path(&self, address: &Address) -> PathBuf {
        self.root.join(format!("contract_{}.instance.json", address))
    }

    fn legacy_path(&self, address: &Address) -> PathBuf {
        self.root.join(format!("contract_{}.swagger.json", address))
    }

    fn write_json<T: Serialize>(&self, key: &str, path: &Path, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serialize {
            key: key.to_owned(),
            source,
        })?;
        fs::write(path, bytes).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn read_json<T: DeserializeOwned>(&self, kind: &'static str, key: &str, path: &Path) -> Result<T, StoreError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(StoreError::not_found(kind, key)),
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            },
        };
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::{builders::DeployContractBuilder, test_address, test_store};
    use std::fs;

    #[test]
    fn abi_roundtrip_and_errors() -> anyhow::Result<()> {
        let (_dir, store) = test_store();
        let msg = DeployContractBuilder::new("abi-1").bytecode(vec![1, 2, 3]).build();
        store.write_abi("abi-1", &msg)?;
        let loaded = store.read_abi("abi-1")?;
        assert_eq!(loaded, msg);
        assert!(store.abi_modified("abi-1").is_some());

        assert!(matches!(store.read_abi("missing"), Err(StoreError::NotFound { .. })));
        assert!(matches!(store.read_abi("../escape"), Err(StoreError::NotFound { .. })));
        assert!(matches!(store.write_abi("../escape", &msg), Err(StoreError::Write { .. })));

        fs::write(store.root().join("abi_broken.deploy.json"), b"{not json")?;
        assert!(matches!(store.read_abi("broken"), Err(StoreError::Corrupt { .. })));
        Ok(())
    }

    #[test]
    fn instance_roundtrip() -> anyhow::Result<()> {
        let (_dir, store) = test_store();
        let address = test_address(1);
        let record = ContractRecord::new(address.clone(), "abi-1", "foo", "foo", "http://localhost:8080");
        store.write_instance(&record)?;
        assert_eq!(store.read_instance(&address)?, record);
        store.remove_instance(&address)?;
        assert!(matches!(store.read_instance(&address), Err(StoreError::NotFound { .. })));
        Ok(())
    }

    #[test]
    fn classifies_file_names() {
        let addr = "dead00000000000000000000000000000000beef";
        assert_eq!(
            ArtifactStore::classify(&format!("contract_{}.swagger.json", addr)),
            StoredFile::Legacy(addr.parse().unwrap())
        );
        assert_eq!(
            ArtifactStore::classify(&format!("contract_{}.instance.json", addr)),
            StoredFile::Instance(addr.parse().unwrap())
        );
        assert_eq!(
            ArtifactStore::classify("abi_0f3e-77aa.deploy.json"),
            StoredFile::Abi("0f3e-77aa".into())
        );
        assert_eq!(ArtifactStore::classify("contract_1234.instance.json"), StoredFile::Unrecognized);
        assert_eq!(ArtifactStore::classify("readme.txt"), StoredFile::Unrecognized);
    }

    #[test]
    fn abi_id_normalization() {
        assert_eq!(ArtifactStore::normalize_abi_id("Req-1").as_deref(), Some("req-1"));
        assert_eq!(ArtifactStore::normalize_abi_id("req_1").as_deref(), Some("req_1"));
        assert_eq!(
            ArtifactStore::normalize_abi_id("A1B2C3D4-0000-4000-8000-00000000ABCD").as_deref(),
            Some("a1b2c3d4-0000-4000-8000-00000000abcd")
        );
        assert_eq!(ArtifactStore::normalize_abi_id("../escape"), None);
        assert_eq!(ArtifactStore::normalize_abi_id(""), None);
    }

    #[test]
    fn lists_files() -> anyhow::Result<()> {
        let (_dir, store) = test_store();
        store.write_abi("a", &DeployContractBuilder::new("a").build())?;
        fs::write(store.root().join("other.txt"), b"")?;
        let mut files: Vec<_> = store.list_files()?.collect();
        files.sort();
        assert_eq!(files, vec!["abi_a.deploy.json".to_string(), "other.txt".to_string()]);
        Ok(())
    }
}
