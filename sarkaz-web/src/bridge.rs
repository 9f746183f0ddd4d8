//! JavaScript-facing facade. A view renders from the JSON snapshots returned
//! here and reports user input back as JSON-encoded actions.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use sarkaz_core::{
    BannedOperator, BossOperation, Collectible, EmergencyOperation, HiddenOperation,
    KingsCollectible, Level, ScoreBreakdown, ScoreRules, Session, SessionAction, SessionStorage,
    Squad, StorageError, load_session, save_session,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::dom;
use crate::storage::select_storage;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("malformed action: {0}")]
    Action(serde_json::Error),
    #[error("malformed rules: {0}")]
    Rules(serde_json::Error),
    #[error("could not encode snapshot: {0}")]
    Encode(serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<BridgeError> for JsValue {
    fn from(err: BridgeError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmergencyEntry {
    operation: EmergencyOperation,
    score: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LevelGroup {
    level: Level,
    operations: Vec<EmergencyEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HiddenEntry {
    operation: HiddenOperation,
    score: u32,
    emergency_score: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BossEntry {
    operation: BossOperation,
    score: u32,
    chaos_score: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BannedEntry {
    operator: BannedOperator,
    bonus: u32,
}

/// Everything a view needs to build its pickers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogSnapshot {
    squads: &'static [Squad],
    collectibles: &'static [Collectible],
    kings_collectibles: &'static [KingsCollectible],
    emergency_by_level: Vec<LevelGroup>,
    hidden: Vec<HiddenEntry>,
    bosses: Vec<BossEntry>,
    banned_operators: Vec<BannedEntry>,
}

fn catalog_snapshot() -> CatalogSnapshot {
    CatalogSnapshot {
        squads: Squad::ALL,
        collectibles: Collectible::ALL,
        kings_collectibles: KingsCollectible::ALL,
        emergency_by_level: Level::ALL
            .iter()
            .map(|&level| LevelGroup {
                level,
                operations: EmergencyOperation::by_level(level)
                    .map(|operation| EmergencyEntry {
                        operation,
                        score: operation.info().score,
                    })
                    .collect(),
            })
            .collect(),
        hidden: HiddenOperation::ALL
            .iter()
            .map(|&operation| {
                let info = operation.info();
                HiddenEntry {
                    operation,
                    score: info.score,
                    emergency_score: info.emergency_score,
                }
            })
            .collect(),
        bosses: BossOperation::ALL
            .iter()
            .map(|&operation| {
                let info = operation.info();
                BossEntry {
                    operation,
                    score: info.score,
                    chaos_score: info.chaos_score,
                }
            })
            .collect(),
        banned_operators: BannedOperator::ALL
            .iter()
            .map(|&operator| BannedEntry {
                operator,
                bonus: operator.bonus(),
            })
            .collect(),
    }
}

/// Session plus rules, with no JavaScript types involved.
#[derive(Debug, Default)]
pub struct WebSession {
    session: Session,
    rules: ScoreRules,
}

impl WebSession {
    #[must_use]
    pub fn new(rules: ScoreRules) -> Self {
        Self {
            session: Session::new(),
            rules,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Apply a JSON-encoded [`SessionAction`].
    ///
    /// # Errors
    /// Returns an error if the action does not decode.
    pub fn apply_json(&mut self, action: &str) -> Result<bool, BridgeError> {
        let action: SessionAction = serde_json::from_str(action).map_err(BridgeError::Action)?;
        Ok(self.session.apply(action))
    }

    #[must_use]
    pub fn breakdown(&self) -> ScoreBreakdown {
        ScoreBreakdown::compute_with_rules(&self.session, &self.rules)
    }

    /// # Errors
    /// Returns an error if serialization fails.
    pub fn session_json(&self) -> Result<String, BridgeError> {
        self.session.to_json().map_err(BridgeError::Encode)
    }

    /// # Errors
    /// Returns an error if serialization fails.
    pub fn breakdown_json(&self) -> Result<String, BridgeError> {
        let breakdown = self.breakdown();
        let value = serde_json::json!({
            "subtotals": breakdown,
            "total": breakdown.total(),
            "refreshCap": self.session.refresh_cap_under(&self.rules),
        });
        serde_json::to_string(&value).map_err(BridgeError::Encode)
    }

    /// # Errors
    /// Returns an error if serialization fails.
    pub fn catalog_json() -> Result<String, BridgeError> {
        serde_json::to_string(&catalog_snapshot()).map_err(BridgeError::Encode)
    }

    pub fn replace(&mut self, loaded: Session) {
        self.session.load(loaded);
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }
}

#[wasm_bindgen]
pub struct WebScorekeeper {
    state: Rc<RefCell<WebSession>>,
    storage: Rc<dyn SessionStorage>,
}

#[wasm_bindgen]
impl WebScorekeeper {
    /// Fresh session; storage chosen by probing for the desktop host.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(WebSession::default())),
            storage: Rc::from(select_storage()),
        }
    }

    /// Fresh session scored with a JSON ruleset.
    ///
    /// # Errors
    /// Returns an error if the rules do not parse.
    #[wasm_bindgen(js_name = withRules)]
    pub fn with_rules(rules_json: &str) -> Result<WebScorekeeper, JsValue> {
        let rules = ScoreRules::from_json(rules_json).map_err(BridgeError::Rules)?;
        Ok(Self {
            state: Rc::new(RefCell::new(WebSession::new(rules))),
            storage: Rc::from(select_storage()),
        })
    }

    #[wasm_bindgen(js_name = storageKind)]
    #[must_use]
    pub fn storage_kind(&self) -> String {
        format!("{:?}", self.storage.kind())
    }

    /// # Errors
    /// Returns an error if the catalog cannot be encoded.
    #[wasm_bindgen(js_name = catalog)]
    pub fn catalog() -> Result<String, JsValue> {
        Ok(WebSession::catalog_json()?)
    }

    /// # Errors
    /// Returns an error if the session cannot be encoded.
    #[wasm_bindgen(js_name = session)]
    pub fn session(&self) -> Result<String, JsValue> {
        Ok(self.state.borrow().session_json()?)
    }

    /// # Errors
    /// Returns an error if the breakdown cannot be encoded.
    #[wasm_bindgen(js_name = breakdown)]
    pub fn breakdown(&self) -> Result<String, JsValue> {
        Ok(self.state.borrow().breakdown_json()?)
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.state.borrow().breakdown().total()
    }

    /// Apply a JSON action; resolves whether the session changed.
    ///
    /// # Errors
    /// Returns an error if the action does not decode.
    pub fn apply(&self, action_json: &str) -> Result<bool, JsValue> {
        Ok(self.state.borrow_mut().apply_json(action_json)?)
    }

    pub fn reset(&self) {
        self.state.borrow_mut().reset();
    }

    /// Save the current session. The promise rejects with the failure message.
    pub fn save(&self) -> Promise {
        let snapshot = self.state.borrow().session().clone();
        let storage = Rc::clone(&self.storage);
        future_to_promise(async move {
            save_session(storage.as_ref(), &snapshot)
                .await
                .map_err(|err| report(BridgeError::Storage(err)))?;
            Ok(JsValue::TRUE)
        })
    }

    /// Load a saved session. Resolves `true` once loaded, `false` if the user
    /// dismissed the picker; rejects on any other failure and keeps the
    /// current session.
    pub fn load(&self) -> Promise {
        let state = Rc::clone(&self.state);
        let storage = Rc::clone(&self.storage);
        future_to_promise(async move {
            match load_session(storage.as_ref()).await {
                Ok(loaded) => {
                    state.borrow_mut().replace(loaded);
                    Ok(JsValue::TRUE)
                }
                Err(StorageError::Cancelled) => Ok(JsValue::FALSE),
                Err(err) => Err(report(BridgeError::Storage(err))),
            }
        })
    }
}

impl Default for WebScorekeeper {
    fn default() -> Self {
        Self::new()
    }
}

fn report(err: BridgeError) -> JsValue {
    dom::console_error(&err.to_string());
    err.into()
}
