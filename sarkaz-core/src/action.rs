//! User actions as data, so front-ends can dispatch mutations without reaching
//! into the session directly.

use serde::{Deserialize, Serialize};

use crate::catalog::{BannedOperator, Collectible, KingsCollectible, Squad};
use crate::session::{
    BossOperationRecord, Counter, EmergencyOperationRecord, HiddenOperationRecord, Session,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionAction {
    SetSquad {
        squad: Option<Squad>,
    },
    SetCollectible {
        collectible: Option<Collectible>,
    },
    AddEmergencyRecord {
        record: EmergencyOperationRecord,
    },
    UpdateEmergencyRecord {
        index: usize,
        record: EmergencyOperationRecord,
    },
    RemoveEmergencyRecord {
        index: usize,
    },
    AddHiddenRecord {
        record: HiddenOperationRecord,
    },
    UpdateHiddenRecord {
        index: usize,
        record: HiddenOperationRecord,
    },
    RemoveHiddenRecord {
        index: usize,
    },
    AddBossRecord {
        record: BossOperationRecord,
    },
    RemoveBossRecord {
        index: usize,
    },
    ToggleBannedOperator {
        operator: BannedOperator,
    },
    ToggleKingsCollectible {
        collectible: KingsCollectible,
    },
    /// Raw field text; parsed leniently.
    SetCounter {
        counter: Counter,
        text: String,
    },
    Reset,
}

impl Session {
    /// Apply one action. Returns whether the session changed.
    pub fn apply(&mut self, action: SessionAction) -> bool {
        let before = self.clone();
        match action {
            SessionAction::SetSquad { squad } => self.set_squad(squad),
            SessionAction::SetCollectible { collectible } => self.set_collectible(collectible),
            SessionAction::AddEmergencyRecord { record } => self.add_emergency_record(record),
            SessionAction::UpdateEmergencyRecord { index, record } => {
                self.update_emergency_record(index, record);
            }
            SessionAction::RemoveEmergencyRecord { index } => {
                self.remove_emergency_record(index);
            }
            SessionAction::AddHiddenRecord { record } => {
                self.add_hidden_record(record);
            }
            SessionAction::UpdateHiddenRecord { index, record } => {
                self.update_hidden_record(index, record);
            }
            SessionAction::RemoveHiddenRecord { index } => {
                self.remove_hidden_record(index);
            }
            SessionAction::AddBossRecord { record } => self.add_boss_record(record),
            SessionAction::RemoveBossRecord { index } => {
                self.remove_boss_record(index);
            }
            SessionAction::ToggleBannedOperator { operator } => {
                self.toggle_banned_operator(operator);
            }
            SessionAction::ToggleKingsCollectible { collectible } => {
                self.toggle_kings_collectible(collectible);
            }
            SessionAction::SetCounter { counter, text } => self.set_counter_text(counter, &text),
            SessionAction::Reset => self.reset(),
        }
        *self != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BossOperation, EmergencyOperation, HiddenOperation};

    #[test]
    fn actions_decode_from_tagged_json() {
        let action: SessionAction = serde_json::from_str(
            r#"{"type": "add_emergency_record", "record": {"operation": "好一场大戏", "refresh": true, "perfect": false}}"#,
        )
        .unwrap();
        let mut session = Session::new();
        assert!(session.apply(action));
        assert_eq!(
            session.emergency_records[0].operation,
            EmergencyOperation::AGreatGame
        );
        assert!(session.emergency_records[0].refresh);
    }

    #[test]
    fn counter_action_parses_text() {
        let mut session = Session::new();
        let action: SessionAction =
            serde_json::from_str(r#"{"type": "set_counter", "counter": "withdraw", "text": "45"}"#)
                .unwrap();
        assert!(session.apply(action));
        assert_eq!(session.withdraw_cnt, 45);
    }

    #[test]
    fn out_of_range_actions_report_no_change() {
        let mut session = Session::new();
        session.add_boss_record(BossOperationRecord::new(BossOperation::Audience, true));
        assert!(!session.apply(SessionAction::RemoveBossRecord { index: 3 }));
        assert!(!session.apply(SessionAction::RemoveEmergencyRecord { index: 0 }));
        assert!(session.apply(SessionAction::RemoveBossRecord { index: 0 }));
    }

    #[test]
    fn hidden_actions_respect_available_variants() {
        let mut session = Session::new();
        assert!(!session.apply(SessionAction::AddHiddenRecord {
            record: HiddenOperationRecord::new(HiddenOperation::LostCaravan, false),
        }));
        assert!(session.hidden_records.is_empty());

        assert!(session.apply(SessionAction::AddHiddenRecord {
            record: HiddenOperationRecord::new(HiddenOperation::LostCaravan, true),
        }));
        assert!(session.apply(SessionAction::UpdateHiddenRecord {
            index: 0,
            record: HiddenOperationRecord::new(HiddenOperation::DuckHighway, false),
        }));
        assert!(!session.apply(SessionAction::UpdateHiddenRecord {
            index: 0,
            record: HiddenOperationRecord::new(HiddenOperation::TearfulRunaway, true),
        }));
        assert!(!session.apply(SessionAction::UpdateHiddenRecord {
            index: 4,
            record: HiddenOperationRecord::new(HiddenOperation::MirrorMaze, false),
        }));
        assert_eq!(session.hidden_records[0].operation, HiddenOperation::DuckHighway);
    }

    #[test]
    fn reset_action_clears_everything() {
        let mut session = Session::new();
        session.apply(SessionAction::ToggleKingsCollectible {
            collectible: KingsCollectible::KingsNewGun,
        });
        assert!(session.apply(SessionAction::Reset));
        assert_eq!(session, Session::default());
        assert!(!session.apply(SessionAction::Reset));
    }
}
