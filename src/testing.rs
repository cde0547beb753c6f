//! In-memory collaborators for command tests.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    path::PathBuf,
};

use tempfile::TempDir;

use crate::{
    commands::Context,
    error::AppError,
    git::GitSettings,
    gitconfig::{FsGitConfigEditor, GitConfigEditor, IncludeChange},
    paths::AppPaths,
    profile::{AutoRule, Config, Profile},
    secrets::{CredentialCache, SecretStore},
    storage::ConfigStore,
};

#[derive(Default)]
pub struct MemoryConfigStore {
    pub config: RefCell<Config>,
    pub fail_load: Cell<bool>,
    pub fail_save: Cell<bool>,
    pub saves: Cell<usize>,
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<Config, AppError> {
        if self.fail_load.get() {
            return Err(AppError::Validation("load failed".to_string()));
        }
        Ok(self.config.borrow().clone())
    }

    fn save(&self, config: &Config) -> Result<(), AppError> {
        if self.fail_save.get() {
            return Err(std::io::Error::other("disk full").into());
        }
        *self.config.borrow_mut() = config.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

/// Git settings kept in a map; a missing key reads as a git failure
#[derive(Default)]
pub struct FakeGit {
    pub values: RefCell<BTreeMap<String, String>>,
    pub global: RefCell<BTreeMap<String, String>>,
}

impl FakeGit {
    pub fn with_value(key: &str, value: &str) -> Self {
        let git = Self::default();
        git.values.borrow_mut().insert(key.to_string(), value.to_string());
        git
    }
}

impl GitSettings for FakeGit {
    fn get(&self, key: &str) -> Result<String, AppError> {
        self.values
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::GitCommand(format!("{key} not set")))
    }

    fn set_global(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.global.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn unset_global(&self, key: &str) -> Result<(), AppError> {
        self.global.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySecretStore {
    pub tokens: RefCell<BTreeMap<String, String>>,
    pub fail: Cell<bool>,
}

impl MemorySecretStore {
    fn check(&self) -> Result<(), AppError> {
        if self.fail.get() {
            return Err(AppError::Keyring(keyring::Error::NoStorageAccess(
                std::io::Error::other("locked").into(),
            )));
        }
        Ok(())
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, profile_name: &str) -> Result<Option<String>, AppError> {
        self.check()?;
        Ok(self.tokens.borrow().get(profile_name).cloned())
    }

    fn set(&self, profile_name: &str, token: &str) -> Result<(), AppError> {
        self.check()?;
        self.tokens
            .borrow_mut()
            .insert(profile_name.to_string(), token.to_string());
        Ok(())
    }

    fn delete(&self, profile_name: &str) -> Result<(), AppError> {
        self.check()?;
        self.tokens.borrow_mut().remove(profile_name);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingCredentialCache {
    pub stored: RefCell<Vec<(String, String)>>,
}

impl CredentialCache for RecordingCredentialCache {
    fn store(&self, username: &str, token: &str) -> Result<(), AppError> {
        self.stored
            .borrow_mut()
            .push((username.to_string(), token.to_string()));
        Ok(())
    }
}

/// Real file editor under a temporary home, with switches to make steps fail
pub struct FlakyEditor {
    inner: FsGitConfigEditor,
    pub fail_write: Cell<bool>,
    pub fail_add: Cell<bool>,
    pub fail_remove: Cell<bool>,
}

impl FlakyEditor {
    fn failure(step: &str) -> AppError {
        std::io::Error::other(format!("{step} failed")).into()
    }
}

impl GitConfigEditor for FlakyEditor {
    fn write_profile_config(&self, profile_name: &str, profile: &Profile) -> Result<(), AppError> {
        if self.fail_write.get() {
            return Err(Self::failure("write"));
        }
        self.inner.write_profile_config(profile_name, profile)
    }

    fn has_profile_config(&self, profile_name: &str) -> bool {
        self.inner.has_profile_config(profile_name)
    }

    fn remove_profile_config(&self, profile_name: &str) -> Result<(), AppError> {
        self.inner.remove_profile_config(profile_name)
    }

    fn add_include(&self, dir: &str, profile_name: &str) -> Result<IncludeChange, AppError> {
        if self.fail_add.get() {
            return Err(Self::failure("add"));
        }
        self.inner.add_include(dir, profile_name)
    }

    fn remove_include(&self, profile_name: &str, dir: Option<&str>) -> Result<usize, AppError> {
        if self.fail_remove.get() {
            return Err(Self::failure("remove"));
        }
        self.inner.remove_include(profile_name, dir)
    }
}

/// A temporary home with every collaborator faked
pub struct TestEnv {
    pub home: TempDir,
    pub paths: AppPaths,
    pub current_dir: Option<PathBuf>,
    pub store: MemoryConfigStore,
    pub git: FakeGit,
    pub secrets: MemorySecretStore,
    pub credential_cache: RecordingCredentialCache,
    pub editor: FlakyEditor,
}

impl TestEnv {
    pub fn new() -> Self {
        let home = TempDir::new().unwrap();
        let paths = AppPaths::with_home(home.path());
        let editor = FlakyEditor {
            inner: FsGitConfigEditor::new(&paths),
            fail_write: Cell::new(false),
            fail_add: Cell::new(false),
            fail_remove: Cell::new(false),
        };
        Self {
            current_dir: Some(home.path().to_path_buf()),
            home,
            paths,
            store: MemoryConfigStore::default(),
            git: FakeGit::default(),
            secrets: MemorySecretStore::default(),
            credential_cache: RecordingCredentialCache::default(),
            editor,
        }
    }

    pub fn ctx(&self) -> Context<'_> {
        Context {
            paths: &self.paths,
            current_dir: self.current_dir.clone(),
            store: &self.store,
            git: &self.git,
            secrets: &self.secrets,
            credential_cache: &self.credential_cache,
            editor: &self.editor,
        }
    }

    /// Creates `rel` under the temporary home and returns its path
    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.home.path().join(rel);
        std::fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn cd(&mut self, rel: &str) {
        self.current_dir = Some(self.dir(rel));
    }

    pub fn add_profile(&self, name: &str, profile: Profile) {
        self.store
            .config
            .borrow_mut()
            .profiles
            .insert(name.to_string(), profile);
    }

    pub fn add_rule(&self, rel: &str, profile: &str) {
        let path = self.dir(rel).to_string_lossy().into_owned();
        self.store.config.borrow_mut().auto_rules.push(AutoRule {
            path,
            profile: profile.to_string(),
        });
    }

    pub fn config(&self) -> Config {
        self.store.config.borrow().clone()
    }

    pub fn global_gitconfig(&self) -> String {
        std::fs::read_to_string(&self.paths.git_config_file).unwrap_or_default()
    }
}

pub fn work_profile() -> Profile {
    let mut profile = Profile::new("Jane Doe", "jane@work.com");
    profile.username = Some("ghuser".to_string());
    profile
}

pub fn personal_profile() -> Profile {
    Profile::new("Jane", "jane@home.org")
}
