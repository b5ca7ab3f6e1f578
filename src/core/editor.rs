//! Config Editor State Machine
//!
//! Uninitialized → Loading → Ready → Saving → Ready | SaveFailed
//!
//! Semua operasi di sini sinkron; network I/O dilakukan oleh pemanggil
//! (lihat `SettingPage`) memakai ticket dari `begin_load` / `begin_save`.
//! Ticket membawa generation counter: hasil network yang datang setelah
//! user berganti (atau setelah unmount) diabaikan.
//!
//! Edit selama `Saving` ditolak dengan `Busy`, tidak diantrekan.

use std::fmt;
use tracing::{debug, info, warn};

use crate::models::config::{Config, ConfigField, ListField, ScalarField};
use crate::models::errors::{AppError, AppResult, ErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorPhase {
    /// No user id known yet
    Uninitialized,
    /// Remote fetch in flight, edits not accepted
    Loading,
    /// Working config held, edits applied synchronously
    Ready,
    /// Full working config sent to the store
    Saving,
    /// Last save failed; working config kept for retry
    SaveFailed,
}

impl EditorPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "UNINITIALIZED",
            Self::Loading => "LOADING",
            Self::Ready => "READY",
            Self::Saving => "SAVING",
            Self::SaveFailed => "SAVE_FAILED",
        }
    }

    pub fn accepts_edits(&self) -> bool {
        matches!(self, Self::Ready | Self::SaveFailed)
    }
}

impl fmt::Display for EditorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user edit, as issued by an input control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Append(ListField, String),
    Remove(ListField, String),
    Set(ScalarField, String),
}

impl Edit {
    /// Parse `field+=value`, `field-=value` or `field=value`
    pub fn parse(expr: &str) -> AppResult<Edit> {
        let Some(eq) = expr.find('=') else {
            return Err(AppError::invalid_value(format!(
                "Edit '{}' must look like field+=value, field-=value or field=value",
                expr
            )));
        };
        let value = &expr[eq + 1..];
        let (name, op) = match expr[..eq].strip_suffix('+') {
            Some(name) => (name, "+="),
            None => match expr[..eq].strip_suffix('-') {
                Some(name) => (name, "-="),
                None => (&expr[..eq], "="),
            },
        };

        let field: ConfigField = name.trim().parse()?;
        match (field, op) {
            (ConfigField::List(list), "+=") => Ok(Edit::Append(list, value.to_string())),
            (ConfigField::List(list), "-=") => Ok(Edit::Remove(list, value.to_string())),
            (ConfigField::Scalar(scalar), "=") => Ok(Edit::Set(scalar, value.to_string())),
            (field, op) => Err(AppError::invalid_value(format!(
                "Operator '{}' does not apply to field {}",
                op, field
            ))),
        }
    }

    /// Apply to a config, producing the next one
    pub fn apply_to(&self, config: &Config) -> AppResult<Config> {
        match self {
            Edit::Append(field, value) => Ok(config.append_list_item(*field, value.clone())),
            Edit::Remove(field, value) => Ok(config.remove_list_item(*field, value)),
            Edit::Set(field, value) => config.set_scalar(*field, value),
        }
    }
}

/// Issued by [`ConfigEditor::begin_load`]; hand it back with the fetch result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub user_id: String,
    generation: u64,
}

/// Issued by [`ConfigEditor::begin_save`]; carries the config to send
#[derive(Debug, Clone, PartialEq)]
pub struct SaveTicket {
    pub user_id: String,
    pub snapshot: Config,
    generation: u64,
}

/// Local working copy of a user's Config
#[derive(Debug)]
pub struct ConfigEditor {
    phase: EditorPhase,
    user_id: Option<String>,
    generation: u64,
    working: Option<Config>,
    /// Last config known to match the store
    baseline: Option<Config>,
    last_error: Option<ErrorCode>,
    /// Why the working config was seeded from the default template
    load_error: Option<ErrorCode>,
}

impl Default for ConfigEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigEditor {
    pub fn new() -> Self {
        Self {
            phase: EditorPhase::Uninitialized,
            user_id: None,
            generation: 0,
            working: None,
            baseline: None,
            last_error: None,
            load_error: None,
        }
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn working(&self) -> Option<&Config> {
        self.working.as_ref()
    }

    /// Error code of the last failed load or save, cleared on success
    pub fn last_error(&self) -> Option<ErrorCode> {
        self.last_error
    }

    /// Set when the load failed and the default template was used instead
    pub fn load_error(&self) -> Option<ErrorCode> {
        self.load_error
    }

    /// A save would replace a stored config that could not be read
    pub fn may_overwrite_unread(&self) -> bool {
        matches!(self.load_error, Some(code) if code != ErrorCode::NotFound)
    }

    /// Working config differs from the last durable one
    pub fn is_dirty(&self) -> bool {
        match (&self.working, &self.baseline) {
            (Some(working), Some(baseline)) => working != baseline,
            (Some(_), None) => true,
            _ => false,
        }
    }

    /// User id became available. Supersedes any in-flight load or save.
    pub fn begin_load(&mut self, user_id: impl Into<String>) -> LoadTicket {
        let user_id = user_id.into();
        self.generation += 1;
        self.phase = EditorPhase::Loading;
        self.user_id = Some(user_id.clone());
        self.working = None;
        self.baseline = None;
        self.last_error = None;
        self.load_error = None;
        debug!("⏳ Loading config for {} (gen {})", user_id, self.generation);
        LoadTicket {
            user_id,
            generation: self.generation,
        }
    }

    /// Install the fetch result. Any load failure degrades to the default
    /// template. Returns `false` when the ticket is stale.
    pub fn complete_load(&mut self, ticket: LoadTicket, result: AppResult<Config>) -> bool {
        if ticket.generation != self.generation || self.phase != EditorPhase::Loading {
            debug!("🗑️ Ignoring stale load for {}", ticket.user_id);
            return false;
        }

        match result {
            Ok(config) => {
                self.baseline = Some(config.clone());
                self.working = Some(config);
                self.last_error = None;
            }
            Err(err) => {
                if err.code.falls_back_to_default() {
                    info!("📄 {} → default template for {}", err.code_str(), ticket.user_id);
                } else {
                    warn!(
                        "⚠️ Load for {} failed ({}), using default template",
                        ticket.user_id, err
                    );
                }
                self.working = Some(Config::default());
                self.baseline = None;
                self.last_error = Some(err.code);
                self.load_error = Some(err.code);
            }
        }
        self.phase = EditorPhase::Ready;
        true
    }

    fn ensure_editable(&self) -> AppResult<()> {
        match self.phase {
            EditorPhase::Ready | EditorPhase::SaveFailed => Ok(()),
            EditorPhase::Saving => Err(AppError::busy()),
            phase => Err(AppError::not_ready(phase.as_str())),
        }
    }

    /// Apply one edit to the working config
    pub fn apply(&mut self, edit: &Edit) -> AppResult<&Config> {
        self.ensure_editable()?;
        let current = self
            .working
            .as_ref()
            .ok_or_else(|| AppError::not_ready(self.phase.as_str()))?;
        let next = edit.apply_to(current)?;
        Ok(&*self.working.insert(next))
    }

    pub fn append_list_item(
        &mut self,
        field: ListField,
        value: impl Into<String>,
    ) -> AppResult<&Config> {
        self.apply(&Edit::Append(field, value.into()))
    }

    pub fn remove_list_item(&mut self, field: ListField, value: &str) -> AppResult<&Config> {
        self.apply(&Edit::Remove(field, value.to_string()))
    }

    pub fn set_scalar(&mut self, field: ScalarField, value: &str) -> AppResult<&Config> {
        self.apply(&Edit::Set(field, value.to_string()))
    }

    /// Explicit save action: move to `Saving` and hand out the config to send
    pub fn begin_save(&mut self) -> AppResult<SaveTicket> {
        self.ensure_editable()?;
        let (Some(user_id), Some(working)) = (&self.user_id, &self.working) else {
            return Err(AppError::not_ready(self.phase.as_str()));
        };
        let ticket = SaveTicket {
            user_id: user_id.clone(),
            snapshot: working.clone(),
            generation: self.generation,
        };
        self.phase = EditorPhase::Saving;
        debug!("💾 Saving config for {}", ticket.user_id);
        Ok(ticket)
    }

    /// Install the save outcome. On success the working config becomes the
    /// canonical one; on failure it is left as it was.
    /// Returns `false` when the ticket is stale.
    pub fn complete_save(&mut self, ticket: &SaveTicket, result: &AppResult<Config>) -> bool {
        if ticket.generation != self.generation || self.phase != EditorPhase::Saving {
            debug!("🗑️ Ignoring stale save for {}", ticket.user_id);
            return false;
        }

        match result {
            Ok(canonical) => {
                self.working = Some(canonical.clone());
                self.baseline = Some(canonical.clone());
                self.last_error = None;
                self.load_error = None;
                self.phase = EditorPhase::Ready;
            }
            Err(err) => {
                self.last_error = Some(err.code);
                self.phase = EditorPhase::SaveFailed;
            }
        }
        true
    }

    /// Owning view went away; unsaved edits are dropped
    pub fn unmount(&mut self) {
        self.generation += 1;
        self.phase = EditorPhase::Uninitialized;
        self.user_id = None;
        self.working = None;
        self.baseline = None;
        self.last_error = None;
        self.load_error = None;
    }
}
