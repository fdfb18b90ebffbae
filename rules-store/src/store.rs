//! Rule set store: in-memory working copy plus atomic JSON persistence
//!
//! The store holds the active rule set behind a snapshot lock. Readers take
//! an `Arc` snapshot and keep evaluating against it while editors mutate the
//! working copy; nothing reaches disk until `save` (or `replace` /
//! `reset_to_defaults`), which validates, writes a temp file, and renames it
//! over the persisted record so no partial write is ever visible.

use crate::error::{Error, Result};
use crate::types::{EntryKind, RiskLevel, RuleSet};
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Singleton rule-set store backed by a JSON file
pub struct RulesStore {
    path: PathBuf,
    active: RwLock<Arc<RuleSet>>,
    // Serializes validate-swap-persist sequences across writers
    write_gate: Mutex<()>,
}

impl RulesStore {
    /// Open the store at `path`.
    ///
    /// Starts from the persisted rule set when one exists, otherwise from
    /// the built-in defaults. A file that exists but cannot be parsed is an
    /// error rather than silently replaced.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let rules = match Self::load_from(&path) {
            Ok(rules) => {
                info!("Loaded rule set from {}", path.display());
                rules
            }
            Err(Error::NotFound { .. }) => {
                info!(
                    "No rule set at {}, starting from defaults",
                    path.display()
                );
                RuleSet::default()
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            path,
            active: RwLock::new(Arc::new(rules)),
            write_gate: Mutex::new(()),
        })
    }

    /// Read a rule set from a specific file
    pub fn load_from(path: &Path) -> Result<RuleSet> {
        if !path.exists() {
            return Err(Error::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let rules: RuleSet = serde_json::from_str(&content)?;
        Ok(rules)
    }

    /// Re-read the persisted record, replacing the working copy.
    ///
    /// Fails with [`Error::NotFound`] when nothing has been persisted yet;
    /// callers are expected to fall back to [`RuleSet::default`].
    pub fn load(&self) -> Result<Arc<RuleSet>> {
        let rules = Arc::new(Self::load_from(&self.path)?);
        *self.active.write() = Arc::clone(&rules);
        Ok(rules)
    }

    /// Immutable snapshot of the working rule set
    pub fn current(&self) -> Arc<RuleSet> {
        Arc::clone(&self.active.read())
    }

    /// Add a classification entry to the working copy (memory only).
    ///
    /// Surfaces [`Error::Duplicate`] and [`Error::MoveCandidate`] per the
    /// confirm-then-move protocol; neither mutates state.
    pub fn add_entry(&self, level: RiskLevel, kind: EntryKind, value: &str) -> Result<()> {
        let mut active = self.active.write();
        let mut working = (**active).clone();
        working.add_entry(level, kind, value)?;
        debug!("Added {} '{}' to {} list", kind, value, level);
        *active = Arc::new(working);
        Ok(())
    }

    /// Remove a classification entry from the working copy (memory only).
    /// Idempotent; returns whether anything was removed.
    pub fn remove_entry(&self, level: RiskLevel, kind: EntryKind, value: &str) -> bool {
        let mut active = self.active.write();
        let mut working = (**active).clone();
        let removed = working.remove_entry(level, kind, value);
        if removed {
            debug!("Removed {} '{}' from {} list", kind, value, level);
            *active = Arc::new(working);
        }
        removed
    }

    /// Validate the working copy without persisting
    pub fn validate(&self) -> Result<()> {
        self.current().validate()?;
        Ok(())
    }

    /// Persist the working copy.
    ///
    /// Refused while any invariant is violated. The on-disk record is
    /// replaced atomically; concurrent savers are serialized, last writer
    /// wins.
    pub fn save(&self) -> Result<()> {
        let _gate = self.write_gate.lock();
        let snapshot = self.current();
        snapshot.validate()?;
        self.persist(&snapshot)?;
        info!("Saved rule set to {}", self.path.display());
        Ok(())
    }

    /// Validate and persist a wholesale replacement rule set
    pub fn replace(&self, rules: RuleSet) -> Result<()> {
        let _gate = self.write_gate.lock();
        rules.validate()?;
        let rules = Arc::new(rules);
        self.persist(&rules)?;
        *self.active.write() = rules;
        info!("Replaced rule set at {}", self.path.display());
        Ok(())
    }

    /// Discard all edits and restore the built-in default rule set.
    ///
    /// Bypasses validation: the defaults satisfy every invariant by
    /// construction.
    pub fn reset_to_defaults(&self) -> Result<()> {
        let _gate = self.write_gate.lock();
        let defaults = Arc::new(RuleSet::default());
        self.persist(&defaults)?;
        *self.active.write() = defaults;
        warn!("Rule set reset to defaults at {}", self.path.display());
        Ok(())
    }

    // Write temp file, then rename over the record. Readers of the file
    // never observe a partial document.
    fn persist(&self, rules: &RuleSet) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(rules)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
