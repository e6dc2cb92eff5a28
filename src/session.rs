use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::{
    credential::{Credential, CredentialStore},
    error::AppError,
    home::ToolHome,
    host::HostSelection,
    identity::{Identity, IdentityStore},
    settings::Settings,
    validation::{validate_input_email, validate_input_host, validate_input_username},
};

/// Result of a committed edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The backing file was rewritten
    Saved,
    /// Nothing needed writing
    Unchanged,
}

/// Last committed identity, token and host for one edit session
///
/// In-memory values only change after the matching save succeeds.
pub struct Session<S: Settings> {
    identity_store: IdentityStore,
    credential_store: CredentialStore,
    settings: S,
    identity: Identity,
    token: String,
    hosts: HostSelection,
}

impl<S: Settings> Session<S> {
    /// Loads identity, host settings and the token for the active host
    pub fn load(home: &ToolHome, settings: S) -> Self {
        let identity_store = IdentityStore::new(home.identity_path());
        let credential_store = CredentialStore::new(home.credentials_path());

        let identity = identity_store.load();
        let hosts = HostSelection::new(settings.use_default_host(), settings.current_host());
        let token = credential_store.load(hosts.active_host());
        debug!(host = hosts.active_host(), has_token = !token.is_empty(), "session loaded");

        Self {
            identity_store,
            credential_store,
            settings,
            identity,
            token,
            hosts,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn hosts(&self) -> &HostSelection {
        &self.hosts
    }

    pub fn active_host(&self) -> &str {
        self.hosts.active_host()
    }

    pub fn identity_store(&self) -> &IdentityStore {
        &self.identity_store
    }

    pub fn credential_store(&self) -> &CredentialStore {
        &self.credential_store
    }

    /// Validates and saves a new user name
    pub fn commit_username(&mut self, name: &str) -> Result<CommitOutcome, AppError> {
        validate_input_username(name)?;
        let updated = Identity::new(name, self.identity.email.clone());
        self.identity_store.save(&updated)?;
        info!(name, "username updated");
        self.identity = updated;
        Ok(CommitOutcome::Saved)
    }

    /// Validates and saves a new email address
    pub fn commit_email(&mut self, email: &str) -> Result<CommitOutcome, AppError> {
        validate_input_email(email)?;
        let updated = Identity::new(self.identity.name.clone(), email);
        self.identity_store.save(&updated)?;
        info!(email, "email updated");
        self.identity = updated;
        Ok(CommitOutcome::Saved)
    }

    /// Saves `token` for the active host; a blank token is ignored
    pub fn commit_token(&mut self, token: &str) -> Result<CommitOutcome, AppError> {
        if token.trim().is_empty() {
            debug!("blank token ignored");
            return Ok(CommitOutcome::Unchanged);
        }
        let credential = Credential::new(self.identity.name.clone(), token, self.active_host());
        self.credential_store.save(&credential)?;
        info!(host = %credential.host, "token updated");
        self.token = credential.token;
        Ok(CommitOutcome::Saved)
    }

    /// Switches between the default host and the custom host
    ///
    /// The setting is persisted before the credential moves; a failed move
    /// restores the previous setting.
    pub fn set_use_default_host(&mut self, value: bool) -> Result<CommitOutcome, AppError> {
        let previous = self.hosts.use_default_host;
        if previous == value {
            return Ok(CommitOutcome::Unchanged);
        }
        let next = HostSelection::new(value, self.hosts.custom_host.clone());

        self.settings.set_use_default_host(value)?;
        let token = match self.migrate_credential(&next) {
            Ok(token) => token,
            Err(e) => {
                if let Err(rollback) = self.settings.set_use_default_host(previous) {
                    warn!(error = %rollback, "failed to restore default host setting");
                }
                return Err(e);
            }
        };

        self.token = token;
        self.hosts = next;
        Ok(CommitOutcome::Saved)
    }

    /// Validates and stores a new custom host
    pub fn commit_custom_host(&mut self, host: &str) -> Result<CommitOutcome, AppError> {
        validate_input_host(host)?;
        if self.hosts.custom_host == host {
            return Ok(CommitOutcome::Unchanged);
        }
        let previous = self.hosts.custom_host.clone();
        let next = HostSelection::new(self.hosts.use_default_host, host);

        self.settings.set_current_host(host)?;
        let token = match self.migrate_credential(&next) {
            Ok(token) => token,
            Err(e) => {
                if let Err(rollback) = self.settings.set_current_host(&previous) {
                    warn!(error = %rollback, "failed to restore custom host setting");
                }
                return Err(e);
            }
        };

        self.token = token;
        self.hosts = next;
        Ok(CommitOutcome::Saved)
    }

    /// Returns the token for the host `next` resolves to
    ///
    /// A known token is rewritten under the new host; otherwise the token is
    /// re-read for it. Session state is left to the caller.
    fn migrate_credential(&self, next: &HostSelection) -> Result<String, AppError> {
        let from = self.active_host();
        let to = next.active_host();
        if from == to {
            return Ok(self.token.clone());
        }

        let token = if self.token.is_empty() {
            self.credential_store.load(to)
        } else {
            let credential = Credential::new(self.identity.name.clone(), self.token.clone(), to);
            self.credential_store.save(&credential)?;
            credential.token
        };
        info!(from, to, "active host changed");
        Ok(token)
    }
}

impl<S: Settings + Send + 'static> Session<S> {
    /// Opens the settings and runs [`Session::load`] on a worker thread
    pub fn spawn_load<F>(home: ToolHome, open_settings: F) -> JoinHandle<Self>
    where
        F: FnOnce(&ToolHome) -> S + Send + 'static,
    {
        thread::spawn(move || {
            let settings = open_settings(&home);
            Self::load(&home, settings)
        })
    }
}
