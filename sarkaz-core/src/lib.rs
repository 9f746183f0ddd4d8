//! Sarkaz score calculator core
//!
//! Platform-agnostic scoring and session model for the Sarkaz roguelike score
//! sheet. This crate holds the catalog, the session state, the scoring rules and
//! the save/load contract; hosts supply storage and the view.

pub mod action;
pub mod catalog;
pub mod input;
pub mod numbers;
pub mod persistence;
pub mod rules;
pub mod scoring;
pub mod session;

// Re-export commonly used types
pub use action::SessionAction;
pub use catalog::{
    BannedOperator, BossOperation, BossOperationInfo, Collectible, EmergencyOperation,
    EmergencyOperationInfo, HiddenOperation, HiddenOperationInfo, KingsCollectible, Level, Squad,
    UnknownLabel,
};
pub use input::parse_counter;
pub use numbers::{format_score, round_for_display};
pub use persistence::{
    CANCELLED_REPLY, DEFAULT_FILE_NAME, MemoryStorage, READ_COMMAND, SessionStorage,
    StorageError, StorageKind, WRITE_COMMAND, load_session, save_session,
};
pub use rules::{KingsRules, OperationRules, ScoreRules, SettlementRules};
pub use scoring::{ScoreBreakdown, total_score};
pub use session::{
    BannedOperatorRecord, BossOperationRecord, Counter, EmergencyOperationRecord,
    HiddenOperationRecord, KingsCollectibleRecord, Session,
};

/// Owns the session of the run being scored and the storage it is saved to.
pub struct Scorekeeper<S>
where
    S: SessionStorage,
{
    session: Session,
    storage: S,
    rules: ScoreRules,
}

impl<S> Scorekeeper<S>
where
    S: SessionStorage,
{
    /// Start from a fresh session with the standard rules.
    pub fn new(storage: S) -> Self {
        Self::with_rules(storage, ScoreRules::default())
    }

    pub fn with_rules(storage: S, rules: ScoreRules) -> Self {
        Self {
            session: Session::new(),
            storage,
            rules,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    #[must_use]
    pub const fn rules(&self) -> &ScoreRules {
        &self.rules
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Apply a user action. Returns whether the session changed.
    pub fn apply(&mut self, action: SessionAction) -> bool {
        self.session.apply(action)
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    #[must_use]
    pub fn breakdown(&self) -> ScoreBreakdown {
        ScoreBreakdown::compute_with_rules(&self.session, &self.rules)
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.breakdown().total()
    }

    /// Save the current session.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub async fn save(&self) -> Result<(), StorageError> {
        save_session(&self.storage, &self.session).await
    }

    /// Replace the current session with the saved one. On error the current
    /// session is kept as is.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails or the snapshot is invalid.
    pub async fn load(&mut self) -> Result<(), StorageError> {
        let loaded = load_session(&self.storage).await?;
        self.session.load(loaded);
        Ok(())
    }
}
