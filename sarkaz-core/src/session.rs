//! The session aggregate: everything recorded for one run.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::catalog::{
    BannedOperator, BossOperation, Collectible, EmergencyOperation, HiddenOperation,
    KingsCollectible, Squad, UnknownLabel,
};
use crate::input::parse_counter;

/// One cleared emergency operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyOperationRecord {
    pub operation: EmergencyOperation,
    pub refresh: bool,
    pub perfect: bool,
}

impl EmergencyOperationRecord {
    #[must_use]
    pub const fn new(operation: EmergencyOperation) -> Self {
        Self {
            operation,
            refresh: false,
            perfect: false,
        }
    }
}

/// One cleared hidden operation, normal or emergency variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenOperationRecord {
    pub operation: HiddenOperation,
    pub emergency: bool,
    pub perfect: bool,
}

impl HiddenOperationRecord {
    #[must_use]
    pub const fn new(operation: HiddenOperation, emergency: bool) -> Self {
        Self {
            operation,
            emergency,
            perfect: false,
        }
    }

    /// Whether the operation offers the chosen normal/emergency variant.
    #[must_use]
    pub const fn is_recordable(&self) -> bool {
        self.operation.can_record(self.emergency)
    }

    const fn variant_name(&self) -> &'static str {
        if self.emergency { "emergency" } else { "normal" }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossOperationRecord {
    pub operation: BossOperation,
    pub chaos: bool,
}

impl BossOperationRecord {
    #[must_use]
    pub const fn new(operation: BossOperation, chaos: bool) -> Self {
        Self { operation, chaos }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannedOperatorRecord {
    pub operator: BannedOperator,
    pub banned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KingsCollectibleRecord {
    pub collectible: KingsCollectible,
    pub owned: bool,
}

/// The hand-entered settlement counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    Collections,
    KilledHidden,
    Refresh,
    Withdraw,
    Score,
}

impl Counter {
    pub const ALL: [Self; 5] = [
        Self::Collections,
        Self::KilledHidden,
        Self::Refresh,
        Self::Withdraw,
        Self::Score,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collections => "collections",
            Self::KilledHidden => "killed_hidden",
            Self::Refresh => "refresh",
            Self::Withdraw => "withdraw",
            Self::Score => "score",
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Counter {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|counter| counter.as_str() == normalized)
            .ok_or_else(|| UnknownLabel {
                kind: "Counter",
                label: s.to_string(),
            })
    }
}

/// State of one run as entered through the calculator.
///
/// `banned_operator_records` and `kings_collectible_records` always hold one
/// entry per catalog key, in catalog order; only their flags change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    pub squad: Option<Squad>,
    pub collectible: Option<Collectible>,
    pub emergency_records: Vec<EmergencyOperationRecord>,
    pub hidden_records: Vec<HiddenOperationRecord>,
    pub boss_records: Vec<BossOperationRecord>,
    pub collections_cnt: u32,
    pub killed_hidden_cnt: u32,
    pub refresh_cnt: u32,
    pub withdraw_cnt: u32,
    pub score: u32,
    pub banned_operator_records: Vec<BannedOperatorRecord>,
    pub kings_collectible_records: Vec<KingsCollectibleRecord>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            squad: None,
            collectible: None,
            emergency_records: Vec::new(),
            hidden_records: Vec::new(),
            boss_records: Vec::new(),
            collections_cnt: 0,
            killed_hidden_cnt: 0,
            refresh_cnt: 0,
            withdraw_cnt: 0,
            score: 0,
            banned_operator_records: default_banned_records(),
            kings_collectible_records: default_kings_records(),
        }
    }
}

fn default_banned_records() -> Vec<BannedOperatorRecord> {
    BannedOperator::ALL
        .iter()
        .map(|&operator| BannedOperatorRecord {
            operator,
            banned: true,
        })
        .collect()
}

fn default_kings_records() -> Vec<KingsCollectibleRecord> {
    KingsCollectible::ALL
        .iter()
        .map(|&collectible| KingsCollectibleRecord {
            collectible,
            owned: false,
        })
        .collect()
}

fn replace_at<T: PartialEq>(list: &mut [T], index: usize, value: T) -> bool {
    match list.get_mut(index) {
        Some(slot) if *slot != value => {
            *slot = value;
            true
        }
        _ => false,
    }
}

fn remove_at<T>(list: &mut Vec<T>, index: usize) -> bool {
    if index < list.len() {
        list.remove(index);
        true
    } else {
        false
    }
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_squad(&mut self, squad: Option<Squad>) {
        debug!("squad set to {squad:?}");
        self.squad = squad;
    }

    pub fn set_collectible(&mut self, collectible: Option<Collectible>) {
        debug!("collectible set to {collectible:?}");
        self.collectible = collectible;
    }

    pub fn add_emergency_record(&mut self, record: EmergencyOperationRecord) {
        debug!("emergency record added: {}", record.operation);
        self.emergency_records.push(record);
    }

    /// Replace the record at `index`. Returns `false` when the index is out of
    /// range or the record is unchanged.
    pub fn update_emergency_record(
        &mut self,
        index: usize,
        record: EmergencyOperationRecord,
    ) -> bool {
        replace_at(&mut self.emergency_records, index, record)
    }

    /// Remove the record at `index`. Out-of-range indices are ignored.
    pub fn remove_emergency_record(&mut self, index: usize) -> bool {
        remove_at(&mut self.emergency_records, index)
    }

    /// Append a hidden record. Returns `false`, leaving the list alone, when
    /// the chosen variant does not exist for that operation.
    pub fn add_hidden_record(&mut self, record: HiddenOperationRecord) -> bool {
        if !record.is_recordable() {
            warn!(
                "{} has no {} variant; record refused",
                record.operation,
                record.variant_name()
            );
            return false;
        }
        debug!(
            "hidden record added: {} (emergency: {})",
            record.operation, record.emergency
        );
        self.hidden_records.push(record);
        true
    }

    /// Replace the record at `index`. Returns `false` when the index is out of
    /// range, the record is unchanged, or its variant does not exist.
    pub fn update_hidden_record(&mut self, index: usize, record: HiddenOperationRecord) -> bool {
        if !record.is_recordable() {
            warn!(
                "{} has no {} variant; update refused",
                record.operation,
                record.variant_name()
            );
            return false;
        }
        replace_at(&mut self.hidden_records, index, record)
    }

    pub fn remove_hidden_record(&mut self, index: usize) -> bool {
        remove_at(&mut self.hidden_records, index)
    }

    /// Boss records cannot be edited once added, only removed.
    pub fn add_boss_record(&mut self, record: BossOperationRecord) {
        debug!(
            "boss record added: {} (chaos: {})",
            record.operation, record.chaos
        );
        self.boss_records.push(record);
    }

    pub fn remove_boss_record(&mut self, index: usize) -> bool {
        remove_at(&mut self.boss_records, index)
    }

    /// Flip the ban flag of `operator`. Returns `false` if the entry is missing.
    pub fn toggle_banned_operator(&mut self, operator: BannedOperator) -> bool {
        let Some(record) = self
            .banned_operator_records
            .iter_mut()
            .find(|record| record.operator == operator)
        else {
            return false;
        };
        record.banned = !record.banned;
        debug!("{operator} banned: {}", record.banned);
        true
    }

    /// Flip the owned flag of `collectible`. Returns `false` if the entry is missing.
    pub fn toggle_kings_collectible(&mut self, collectible: KingsCollectible) -> bool {
        let Some(record) = self
            .kings_collectible_records
            .iter_mut()
            .find(|record| record.collectible == collectible)
        else {
            return false;
        };
        record.owned = !record.owned;
        debug!("{collectible} owned: {}", record.owned);
        true
    }

    #[must_use]
    pub const fn counter(&self, counter: Counter) -> u32 {
        match counter {
            Counter::Collections => self.collections_cnt,
            Counter::KilledHidden => self.killed_hidden_cnt,
            Counter::Refresh => self.refresh_cnt,
            Counter::Withdraw => self.withdraw_cnt,
            Counter::Score => self.score,
        }
    }

    pub fn set_counter(&mut self, counter: Counter, value: u32) {
        let slot = match counter {
            Counter::Collections => &mut self.collections_cnt,
            Counter::KilledHidden => &mut self.killed_hidden_cnt,
            Counter::Refresh => &mut self.refresh_cnt,
            Counter::Withdraw => &mut self.withdraw_cnt,
            Counter::Score => &mut self.score,
        };
        *slot = value;
        debug!("{counter} set to {value}");
    }

    /// Set a counter from raw field text; unparseable text counts as 0.
    pub fn set_counter_text(&mut self, counter: Counter, text: &str) {
        self.set_counter(counter, parse_counter(text));
    }

    /// Back to a fresh run.
    pub fn reset(&mut self) {
        debug!("session reset");
        *self = Self::default();
    }

    /// Replace the whole session with `other`, restoring the fixed-key lists
    /// to one entry per catalog key.
    pub fn load(&mut self, mut other: Self) {
        if other.reconcile_fixed_keys() {
            warn!("loaded session had incomplete banned/kings lists; missing entries restored");
        }
        *self = other;
    }

    #[must_use]
    pub fn is_banned(&self, operator: BannedOperator) -> bool {
        self.banned_operator_records
            .iter()
            .any(|record| record.operator == operator && record.banned)
    }

    #[must_use]
    pub fn owns_kings(&self, collectible: KingsCollectible) -> bool {
        self.kings_collectible_records
            .iter()
            .any(|record| record.collectible == collectible && record.owned)
    }

    #[must_use]
    pub fn owned_kings_count(&self) -> usize {
        self.kings_collectible_records
            .iter()
            .filter(|record| record.owned)
            .count()
    }

    /// Serialize to the saved-file format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a saved file. Unknown catalog labels are rejected; fixed-key
    /// lists are reconciled against the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or names an unknown entry.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut session: Self = serde_json::from_str(json)?;
        if session.reconcile_fixed_keys() {
            warn!("saved session had incomplete banned/kings lists; missing entries restored");
        }
        Ok(session)
    }

    /// Rebuild the fixed-key lists in catalog order: loaded flags are kept for
    /// known keys, missing keys get their default flag, duplicates keep the
    /// first occurrence. Returns whether anything had to change.
    pub fn reconcile_fixed_keys(&mut self) -> bool {
        let banned: Vec<_> = BannedOperator::ALL
            .iter()
            .map(|&operator| BannedOperatorRecord {
                operator,
                banned: self
                    .banned_operator_records
                    .iter()
                    .find(|record| record.operator == operator)
                    .is_none_or(|record| record.banned),
            })
            .collect();
        let kings: Vec<_> = KingsCollectible::ALL
            .iter()
            .map(|&collectible| KingsCollectibleRecord {
                collectible,
                owned: self
                    .kings_collectible_records
                    .iter()
                    .find(|record| record.collectible == collectible)
                    .is_some_and(|record| record.owned),
            })
            .collect();

        let changed = banned != self.banned_operator_records
            || kings != self.kings_collectible_records;
        self.banned_operator_records = banned;
        self.kings_collectible_records = kings;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_bans_everyone_and_owns_nothing() {
        let session = Session::new();
        assert_eq!(session.banned_operator_records.len(), BannedOperator::ALL.len());
        assert!(session.banned_operator_records.iter().all(|r| r.banned));
        assert_eq!(session.kings_collectible_records.len(), 4);
        assert_eq!(session.owned_kings_count(), 0);
        assert!(session.squad.is_none());
        assert!(session.collectible.is_none());
    }

    #[test]
    fn update_replaces_only_the_indexed_record() {
        let mut session = Session::new();
        session.add_emergency_record(EmergencyOperationRecord::new(EmergencyOperation::AGreatGame));
        session.add_emergency_record(EmergencyOperationRecord::new(EmergencyOperation::WitchHunt));

        let mut edited = session.emergency_records[1];
        edited.perfect = true;
        assert!(session.update_emergency_record(1, edited));
        assert!(!session.emergency_records[0].perfect);
        assert!(session.emergency_records[1].perfect);

        assert!(!session.update_emergency_record(5, edited));
        assert_eq!(session.emergency_records.len(), 2);
    }

    #[test]
    fn remove_out_of_range_is_a_no_op() {
        let mut session = Session::new();
        session.add_boss_record(BossOperationRecord::new(BossOperation::Audience, false));
        let before = session.clone();
        assert!(!session.remove_boss_record(1));
        assert!(!session.remove_hidden_record(0));
        assert_eq!(session, before);
        assert!(session.remove_boss_record(0));
        assert!(session.boss_records.is_empty());
    }

    #[test]
    fn duplicates_are_allowed_and_order_kept() {
        let mut session = Session::new();
        let record = HiddenOperationRecord::new(HiddenOperation::DuckHighway, true);
        session.add_hidden_record(record);
        session.add_hidden_record(HiddenOperationRecord::new(HiddenOperation::MirrorMaze, false));
        session.add_hidden_record(record);
        assert!(session.remove_hidden_record(0));
        assert_eq!(session.hidden_records[0].operation, HiddenOperation::MirrorMaze);
        assert_eq!(session.hidden_records[1], record);
    }

    #[test]
    fn update_hidden_replaces_only_the_indexed_record() {
        let mut session = Session::new();
        assert!(session.add_hidden_record(HiddenOperationRecord::new(HiddenOperation::DuckHighway, false)));
        assert!(session.add_hidden_record(HiddenOperationRecord::new(HiddenOperation::GoldenTrove, false)));

        let edited = HiddenOperationRecord {
            operation: HiddenOperation::MirrorMaze,
            emergency: true,
            perfect: true,
        };
        assert!(session.update_hidden_record(1, edited));
        assert_eq!(session.hidden_records[0].operation, HiddenOperation::DuckHighway);
        assert_eq!(session.hidden_records[1], edited);
        assert!(!session.update_hidden_record(1, edited));

        let before = session.hidden_records.clone();
        assert!(!session.update_hidden_record(2, edited));
        assert_eq!(session.hidden_records, before);
    }

    #[test]
    fn missing_hidden_variants_are_refused() {
        let mut session = Session::new();
        assert!(!session.add_hidden_record(HiddenOperationRecord::new(HiddenOperation::LostCaravan, false)));
        assert!(!session.add_hidden_record(HiddenOperationRecord::new(HiddenOperation::TearfulRunaway, true)));
        assert!(session.hidden_records.is_empty());

        assert!(session.add_hidden_record(HiddenOperationRecord::new(HiddenOperation::LostCaravan, true)));
        let normal_caravan = HiddenOperationRecord::new(HiddenOperation::LostCaravan, false);
        assert!(!session.update_hidden_record(0, normal_caravan));
        assert!(session.hidden_records[0].emergency);
    }

    #[test]
    fn toggles_flip_a_single_entry() {
        let mut session = Session::new();
        assert!(session.toggle_banned_operator(BannedOperator::Ling));
        assert!(!session.is_banned(BannedOperator::Ling));
        assert!(session.is_banned(BannedOperator::Logos));
        assert!(session.toggle_banned_operator(BannedOperator::Ling));
        assert!(session.is_banned(BannedOperator::Ling));

        assert!(session.toggle_kings_collectible(KingsCollectible::KingsCrown));
        assert!(session.owns_kings(KingsCollectible::KingsCrown));
        assert_eq!(session.owned_kings_count(), 1);
    }

    #[test]
    fn counter_text_is_parsed_leniently() {
        let mut session = Session::new();
        session.set_counter_text(Counter::Refresh, "12");
        session.set_counter_text(Counter::Withdraw, "lots");
        session.set_counter_text(Counter::Score, "350pts");
        assert_eq!(session.refresh_cnt, 12);
        assert_eq!(session.withdraw_cnt, 0);
        assert_eq!(session.counter(Counter::Score), 350);
    }

    #[test]
    fn counters_parse_from_cli_spellings() {
        assert_eq!("killed-hidden".parse::<Counter>().unwrap(), Counter::KilledHidden);
        assert_eq!("Score".parse::<Counter>().unwrap(), Counter::Score);
        assert!("gold".parse::<Counter>().is_err());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut session = Session::new();
        session.set_squad(Some(Squad::ResearchSquad));
        session.set_counter(Counter::Collections, 9);
        session.toggle_banned_operator(BannedOperator::Surtr);
        session.toggle_kings_collectible(KingsCollectible::KingsArmor);
        session.add_boss_record(BossOperationRecord::new(BossOperation::TheWitchKing, true));
        session.reset();
        assert_eq!(session, Session::default());
    }

    #[test]
    fn json_uses_camel_case_and_labels() {
        let mut session = Session::new();
        session.set_squad(Some(Squad::BlueprintSurveyingSquad));
        session.set_counter(Counter::KilledHidden, 2);
        let json = session.to_json().unwrap();
        assert!(json.contains("\"squad\":\"蓝图测绘分队\""));
        assert!(json.contains("\"collectible\":null"));
        assert!(json.contains("\"killedHiddenCnt\":2"));
        assert!(json.contains("\"bannedOperatorRecords\""));
        assert!(json.contains("\"kingsCollectibleRecords\""));
    }

    #[test]
    fn unknown_labels_reject_the_snapshot() {
        let json = r#"{"squad": "不存在的分队"}"#;
        assert!(Session::from_json(json).is_err());
        let json = r#"{"bossRecords": [{"operation": "观众", "chaos": false}, {"operation": "旧首领", "chaos": true}]}"#;
        assert!(Session::from_json(json).is_err());
    }

    #[test]
    fn partial_fixed_key_lists_are_reconciled() {
        let json = r#"{
            "bannedOperatorRecords": [
                {"operator": "令", "banned": false},
                {"operator": "令", "banned": true}
            ],
            "kingsCollectibleRecords": [
                {"collectible": "国王的铠甲", "owned": true}
            ]
        }"#;
        let session = Session::from_json(json).unwrap();
        assert_eq!(session.banned_operator_records.len(), BannedOperator::ALL.len());
        assert!(!session.is_banned(BannedOperator::Ling));
        assert!(session.is_banned(BannedOperator::Logos));
        assert_eq!(session.kings_collectible_records.len(), KingsCollectible::ALL.len());
        assert!(session.owns_kings(KingsCollectible::KingsArmor));
        assert_eq!(session.owned_kings_count(), 1);
    }

    #[test]
    fn complete_sessions_need_no_reconciliation() {
        let mut session = Session::new();
        assert!(!session.reconcile_fixed_keys());
    }

    #[test]
    fn load_replaces_wholesale() {
        let mut session = Session::new();
        session.add_emergency_record(EmergencyOperationRecord::new(EmergencyOperation::IronTide));
        let mut other = Session::new();
        other.set_collectible(Some(Collectible::DoodleInTheEraOfHope));
        other.kings_collectible_records.clear();
        session.load(other);
        assert!(session.emergency_records.is_empty());
        assert_eq!(session.collectible, Some(Collectible::DoodleInTheEraOfHope));
        assert_eq!(session.kings_collectible_records.len(), 4);
    }
}
