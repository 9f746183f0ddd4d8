//! Settlement scoring.
//!
//! Every function is a pure read of the session; nothing is cached. The plain
//! variants use [`ScoreRules::standard`], the `_with_rules` variants take an
//! explicit ruleset.

use serde::{Deserialize, Serialize};

use crate::catalog::{Collectible, KingsCollectible, Squad};
use crate::numbers::count_to_f64;
use crate::rules::ScoreRules;
use crate::session::{
    BossOperationRecord, EmergencyOperationRecord, HiddenOperationRecord, Session,
};

/// Score of one emergency record under the active starting collectible.
#[must_use]
pub fn emergency_record_score_with_rules(
    record: &EmergencyOperationRecord,
    collectible: Option<Collectible>,
    rules: &ScoreRules,
) -> f64 {
    let ops = &rules.operations;
    let perfect = if record.perfect {
        ops.perfect_multiplier
    } else {
        1.0
    };
    let refresh = if !record.refresh {
        1.0
    } else if collectible == Some(Collectible::HatredInTheEraOfDeathFeud) {
        ops.feud_refresh_multiplier
    } else {
        ops.refresh_multiplier
    };
    f64::from(record.operation.info().score) * perfect * refresh
}

#[must_use]
pub fn emergency_record_score(
    record: &EmergencyOperationRecord,
    collectible: Option<Collectible>,
) -> f64 {
    emergency_record_score_with_rules(record, collectible, ScoreRules::standard())
}

#[must_use]
pub fn hidden_record_score_with_rules(record: &HiddenOperationRecord, rules: &ScoreRules) -> f64 {
    let info = record.operation.info();
    let base = if record.emergency {
        info.emergency_score
    } else {
        info.score
    };
    let perfect = if record.perfect {
        1.0
    } else {
        rules.operations.hidden_imperfect_multiplier
    };
    f64::from(base) * perfect
}

#[must_use]
pub fn hidden_record_score(record: &HiddenOperationRecord) -> f64 {
    hidden_record_score_with_rules(record, ScoreRules::standard())
}

#[must_use]
pub fn boss_record_score(record: &BossOperationRecord) -> f64 {
    let info = record.operation.info();
    f64::from(if record.chaos {
        info.chaos_score
    } else {
        info.score
    })
}

/// Emergency and hidden operations together, as the settlement sheet groups them.
#[must_use]
pub fn emergency_and_hidden_sum_with_rules(session: &Session, rules: &ScoreRules) -> f64 {
    let emergency: f64 = session
        .emergency_records
        .iter()
        .map(|record| emergency_record_score_with_rules(record, session.collectible, rules))
        .sum();
    let hidden: f64 = session
        .hidden_records
        .iter()
        .map(|record| hidden_record_score_with_rules(record, rules))
        .sum();
    emergency + hidden
}

#[must_use]
pub fn boss_sum(session: &Session) -> f64 {
    session.boss_records.iter().map(boss_record_score).sum()
}

#[must_use]
pub fn banned_sum(session: &Session) -> f64 {
    session
        .banned_operator_records
        .iter()
        .filter(|record| record.banned)
        .map(|record| f64::from(record.operator.bonus()))
        .sum()
}

/// Penalty for king collectibles: every piece after the first, the crown at
/// three or more pieces, and the full set each cost extra. Penalties stack.
#[must_use]
pub fn kings_collectible_sum_with_rules(session: &Session, rules: &ScoreRules) -> f64 {
    let kings = &rules.kings;
    let owned = session.owned_kings_count();
    let mut score = 0.0;
    if owned > 1 {
        score += count_to_f64(owned - 1) * kings.per_extra_piece;
    }
    if owned >= kings.crown_threshold && session.owns_kings(KingsCollectible::KingsCrown) {
        score += kings.crown_penalty;
    }
    if owned == KingsCollectible::ALL.len() {
        score += kings.full_set_penalty;
    }
    score
}

#[must_use]
pub fn collections_score_with_rules(session: &Session, rules: &ScoreRules) -> f64 {
    let per_collection = if session.collectible == Some(Collectible::DoodleInTheEraOfHope) {
        rules.settlement.doodle_points_per_collection
    } else {
        0.0
    };
    f64::from(session.collections_cnt) * per_collection
}

#[must_use]
pub fn hidden_kill_score_with_rules(session: &Session, rules: &ScoreRules) -> f64 {
    f64::from(session.killed_hidden_cnt) * rules.settlement.hidden_kill_points
}

/// Free node refreshes allowed for the chosen squad.
#[must_use]
pub fn refresh_cap_with_rules(squad: Option<Squad>, rules: &ScoreRules) -> u32 {
    if squad == Some(Squad::BlueprintSurveyingSquad) {
        rules.settlement.blueprint_refresh_cap
    } else {
        rules.settlement.refresh_cap
    }
}

#[must_use]
pub fn refresh_score_with_rules(session: &Session, rules: &ScoreRules) -> f64 {
    let cap = refresh_cap_with_rules(session.squad, rules);
    if session.refresh_cnt > cap {
        f64::from(session.refresh_cnt - cap) * rules.settlement.refresh_penalty
    } else {
        0.0
    }
}

#[must_use]
pub fn withdraw_score_with_rules(session: &Session, rules: &ScoreRules) -> f64 {
    let cap = rules.settlement.withdraw_cap;
    if session.withdraw_cnt > cap {
        f64::from(session.withdraw_cnt - cap) * rules.settlement.withdraw_penalty
    } else {
        0.0
    }
}

#[must_use]
pub fn base_score_with_rules(session: &Session, rules: &ScoreRules) -> f64 {
    f64::from(session.score) * rules.settlement.base_score_weight
}

/// All nine settlement subtotals of a session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub base: f64,
    pub emergency_and_hidden: f64,
    pub boss: f64,
    pub collections: f64,
    pub hidden_kills: f64,
    pub refresh: f64,
    pub withdraw: f64,
    pub banned: f64,
    pub kings_collectibles: f64,
}

impl ScoreBreakdown {
    #[must_use]
    pub fn compute(session: &Session) -> Self {
        Self::compute_with_rules(session, ScoreRules::standard())
    }

    #[must_use]
    pub fn compute_with_rules(session: &Session, rules: &ScoreRules) -> Self {
        Self {
            base: base_score_with_rules(session, rules),
            emergency_and_hidden: emergency_and_hidden_sum_with_rules(session, rules),
            boss: boss_sum(session),
            collections: collections_score_with_rules(session, rules),
            hidden_kills: hidden_kill_score_with_rules(session, rules),
            refresh: refresh_score_with_rules(session, rules),
            withdraw: withdraw_score_with_rules(session, rules),
            banned: banned_sum(session),
            kings_collectibles: kings_collectible_sum_with_rules(session, rules),
        }
    }

    /// Subtotals in settlement-sheet order, named by their serialized keys.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, f64); 9] {
        [
            ("base", self.base),
            ("emergencyAndHidden", self.emergency_and_hidden),
            ("boss", self.boss),
            ("collections", self.collections),
            ("hiddenKills", self.hidden_kills),
            ("refresh", self.refresh),
            ("withdraw", self.withdraw),
            ("banned", self.banned),
            ("kingsCollectibles", self.kings_collectibles),
        ]
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.base
            + self.emergency_and_hidden
            + self.boss
            + self.collections
            + self.hidden_kills
            + self.refresh
            + self.withdraw
            + self.banned
            + self.kings_collectibles
    }
}

/// Grand total of a session under the standard rules.
#[must_use]
pub fn total_score(session: &Session) -> f64 {
    ScoreBreakdown::compute(session).total()
}

impl Session {
    /// Free node refreshes under the standard rules.
    #[must_use]
    pub fn refresh_cap(&self) -> u32 {
        self.refresh_cap_under(ScoreRules::standard())
    }

    /// Free node refreshes for this session's squad under `rules`.
    #[must_use]
    pub fn refresh_cap_under(&self, rules: &ScoreRules) -> u32 {
        refresh_cap_with_rules(self.squad, rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BannedOperator, BossOperation, EmergencyOperation, HiddenOperation};
    use crate::session::Counter;

    fn approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn unban_everyone(session: &mut Session) {
        for operator in BannedOperator::ALL {
            session.toggle_banned_operator(*operator);
        }
    }

    #[test]
    fn emergency_perfect_and_refresh_multipliers() {
        let base = f64::from(EmergencyOperation::ThroneOfAsh.info().score);
        let mut record = EmergencyOperationRecord::new(EmergencyOperation::ThroneOfAsh);
        approx(emergency_record_score(&record, None), base);

        record.perfect = true;
        approx(emergency_record_score(&record, None), base * 1.2);

        record.perfect = false;
        record.refresh = true;
        approx(emergency_record_score(&record, None), base * 0.3);
        approx(
            emergency_record_score(&record, Some(Collectible::HatredInTheEraOfDeathFeud)),
            base * 0.1,
        );

        record.perfect = true;
        approx(
            emergency_record_score(&record, Some(Collectible::DoodleInTheEraOfHope)),
            base * 1.2 * 0.3,
        );
    }

    #[test]
    fn hidden_imperfect_halves_and_emergency_uses_its_column() {
        let info = HiddenOperation::DuckHighway.info();
        let mut record = HiddenOperationRecord::new(HiddenOperation::DuckHighway, false);
        approx(hidden_record_score(&record), f64::from(info.score) * 0.5);
        record.perfect = true;
        approx(hidden_record_score(&record), f64::from(info.score));
        record.emergency = true;
        approx(hidden_record_score(&record), f64::from(info.emergency_score));
    }

    #[test]
    fn boss_chaos_uses_chaos_score() {
        let info = BossOperation::CivitasSancta.info();
        approx(
            boss_record_score(&BossOperationRecord::new(BossOperation::CivitasSancta, false)),
            f64::from(info.score),
        );
        approx(
            boss_record_score(&BossOperationRecord::new(BossOperation::CivitasSancta, true)),
            f64::from(info.chaos_score),
        );
    }

    #[test]
    fn banned_sum_counts_only_banned_entries() {
        let mut session = Session::new();
        let everyone: u32 = BannedOperator::ALL.iter().map(|op| op.bonus()).sum();
        approx(banned_sum(&session), f64::from(everyone));
        session.toggle_banned_operator(BannedOperator::Logos);
        approx(
            banned_sum(&session),
            f64::from(everyone - BannedOperator::Logos.bonus()),
        );
        unban_everyone(&mut session);
        session.toggle_banned_operator(BannedOperator::Logos);
        approx(banned_sum(&session), 0.0);
    }

    #[test]
    fn kings_penalties_stack() {
        let rules = ScoreRules::standard();
        let mut session = Session::new();
        approx(kings_collectible_sum_with_rules(&session, rules), 0.0);

        session.toggle_kings_collectible(KingsCollectible::KingsNewGun);
        approx(kings_collectible_sum_with_rules(&session, rules), 0.0);

        session.toggle_kings_collectible(KingsCollectible::KingsArmor);
        approx(kings_collectible_sum_with_rules(&session, rules), -20.0);

        session.toggle_kings_collectible(KingsCollectible::KingsExtension);
        approx(kings_collectible_sum_with_rules(&session, rules), -40.0);

        session.toggle_kings_collectible(KingsCollectible::KingsExtension);
        session.toggle_kings_collectible(KingsCollectible::KingsCrown);
        approx(kings_collectible_sum_with_rules(&session, rules), -80.0);

        session.toggle_kings_collectible(KingsCollectible::KingsExtension);
        approx(kings_collectible_sum_with_rules(&session, rules), -120.0);
    }

    #[test]
    fn crown_alone_with_one_other_only_pays_per_piece() {
        let mut session = Session::new();
        session.toggle_kings_collectible(KingsCollectible::KingsCrown);
        session.toggle_kings_collectible(KingsCollectible::KingsArmor);
        approx(
            kings_collectible_sum_with_rules(&session, ScoreRules::standard()),
            -20.0,
        );
    }

    #[test]
    fn collections_need_the_doodle() {
        let rules = ScoreRules::standard();
        let mut session = Session::new();
        session.set_counter(Counter::Collections, 7);
        approx(collections_score_with_rules(&session, rules), 0.0);
        session.set_collectible(Some(Collectible::DoodleInTheEraOfHope));
        approx(collections_score_with_rules(&session, rules), 21.0);
    }

    #[test]
    fn refresh_cap_depends_on_squad() {
        let rules = ScoreRules::standard();
        let mut session = Session::new();
        session.set_counter(Counter::Refresh, 8);
        assert_eq!(session.refresh_cap(), 8);
        approx(refresh_score_with_rules(&session, rules), 0.0);
        session.set_counter(Counter::Refresh, 10);
        approx(refresh_score_with_rules(&session, rules), -100.0);

        session.set_squad(Some(Squad::BlueprintSurveyingSquad));
        assert_eq!(session.refresh_cap(), 15);

        let mut wider = ScoreRules::default();
        wider.settlement.blueprint_refresh_cap = 20;
        assert_eq!(session.refresh_cap_under(&wider), 20);
        approx(refresh_score_with_rules(&session, rules), 0.0);
        session.set_counter(Counter::Refresh, 16);
        approx(refresh_score_with_rules(&session, rules), -50.0);
    }

    #[test]
    fn withdraw_penalty_past_forty() {
        let rules = ScoreRules::standard();
        let mut session = Session::new();
        session.set_counter(Counter::Withdraw, 40);
        approx(withdraw_score_with_rules(&session, rules), 0.0);
        session.set_counter(Counter::Withdraw, 50);
        approx(withdraw_score_with_rules(&session, rules), -500.0);

        // The literal `(40 - withdrawCnt) * -50` would credit +500 here.
        let literal = (40.0 - f64::from(session.withdraw_cnt)) * -50.0;
        approx(literal, 500.0);
        approx(withdraw_score_with_rules(&session, rules), -literal);
    }

    #[test]
    fn custom_rules_change_the_arithmetic() {
        let mut rules = ScoreRules::default();
        rules.settlement.base_score_weight = 1.0;
        rules.settlement.hidden_kill_points = 5.0;
        let mut session = Session::new();
        unban_everyone(&mut session);
        session.set_counter(Counter::Score, 100);
        session.set_counter(Counter::KilledHidden, 2);
        let breakdown = ScoreBreakdown::compute_with_rules(&session, &rules);
        approx(breakdown.total(), 110.0);
    }

    #[test]
    fn entries_follow_sheet_order() {
        let breakdown = ScoreBreakdown::compute(&Session::new());
        let names: Vec<_> = breakdown.entries().iter().map(|(name, _)| *name).collect();
        assert_eq!(names.first(), Some(&"base"));
        assert_eq!(names.last(), Some(&"kingsCollectibles"));
        let json = serde_json::to_value(breakdown).unwrap();
        for name in &names {
            assert!(json.get(name).is_some(), "{name} is not a serialized key");
        }
        let sum: f64 = breakdown.entries().iter().map(|(_, value)| value).sum();
        approx(sum, breakdown.total());
    }
}
