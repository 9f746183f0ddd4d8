//! Console rendering of a session and its settlement.

use std::fmt::Display;
use std::io::{self, Write};

use colored::Colorize;
use sarkaz_core::scoring::{
    boss_record_score, emergency_record_score_with_rules, hidden_record_score_with_rules,
};
use sarkaz_core::{
    BannedOperator, BossOperation, Collectible, Counter, EmergencyOperation, HiddenOperation,
    KingsCollectible, Level, ScoreBreakdown, ScoreRules, Session, Squad, format_score,
};
use serde_json::{Value, json};

fn signed(value: f64) -> colored::ColoredString {
    let text = format_score(value);
    if value > 0.0 {
        text.green()
    } else if value < 0.0 {
        text.red()
    } else {
        text.dimmed()
    }
}

fn flag(on: bool) -> &'static str {
    if on { "x" } else { " " }
}

/// Print the nine subtotals and the total.
///
/// # Errors
/// Returns an error if writing fails.
pub fn write_breakdown(
    out: &mut dyn Write,
    session: &Session,
    rules: &ScoreRules,
) -> io::Result<()> {
    let breakdown = ScoreBreakdown::compute_with_rules(session, rules);
    writeln!(out, "{}", "Settlement".bright_cyan().bold())?;
    for (name, value) in breakdown.entries() {
        writeln!(out, "  {name:22} {}", signed(value))?;
    }
    writeln!(
        out,
        "  {:22} {}",
        "total".bold(),
        format_score(breakdown.total()).bold()
    )?;
    Ok(())
}

/// Print everything entered for the run, with list indexes for editing.
///
/// # Errors
/// Returns an error if writing fails.
pub fn write_session(out: &mut dyn Write, session: &Session, rules: &ScoreRules) -> io::Result<()> {
    let unset = || "-".dimmed().to_string();
    writeln!(out, "{}", "Run".bright_cyan().bold())?;
    writeln!(
        out,
        "  squad        {}",
        session.squad.map_or_else(unset, |s| s.to_string())
    )?;
    writeln!(
        out,
        "  collectible  {}",
        session.collectible.map_or_else(unset, |c| c.to_string())
    )?;

    writeln!(out, "{}", "Emergency operations".cyan())?;
    for (index, record) in session.emergency_records.iter().enumerate() {
        let score = emergency_record_score_with_rules(record, session.collectible, rules);
        writeln!(
            out,
            "  [{index}] {} perfect[{}] refresh[{}] {}",
            record.operation,
            flag(record.perfect),
            flag(record.refresh),
            signed(score)
        )?;
    }
    writeln!(out, "{}", "Hidden operations".cyan())?;
    for (index, record) in session.hidden_records.iter().enumerate() {
        let score = hidden_record_score_with_rules(record, rules);
        writeln!(
            out,
            "  [{index}] {} emergency[{}] perfect[{}] {}",
            record.operation,
            flag(record.emergency),
            flag(record.perfect),
            signed(score)
        )?;
    }
    writeln!(out, "{}", "Boss operations".cyan())?;
    for (index, record) in session.boss_records.iter().enumerate() {
        writeln!(
            out,
            "  [{index}] {} chaos[{}] {}",
            record.operation,
            flag(record.chaos),
            signed(boss_record_score(record))
        )?;
    }

    writeln!(out, "{}", "Counters".cyan())?;
    for counter in Counter::ALL {
        writeln!(out, "  {:14} {}", counter.as_str(), session.counter(counter))?;
    }
    writeln!(
        out,
        "  free refreshes {}",
        session.refresh_cap_under(rules)
    )?;

    writeln!(out, "{}", "Banned operators".cyan())?;
    for record in &session.banned_operator_records {
        writeln!(out, "  [{}] {}", flag(record.banned), record.operator)?;
    }
    writeln!(out, "{}", "Kings collectibles".cyan())?;
    for record in &session.kings_collectible_records {
        writeln!(out, "  [{}] {}", flag(record.owned), record.collectible)?;
    }
    Ok(())
}

fn write_labels<T: Display>(out: &mut dyn Write, title: &str, entries: &[T]) -> io::Result<()> {
    writeln!(out, "{}", title.cyan())?;
    for entry in entries {
        writeln!(out, "  {entry}")?;
    }
    Ok(())
}

/// Print every selectable catalog entry with its scoring data.
///
/// # Errors
/// Returns an error if writing fails.
pub fn write_catalog(out: &mut dyn Write) -> io::Result<()> {
    write_labels(out, "Squads", Squad::ALL)?;
    write_labels(out, "Collectibles", Collectible::ALL)?;
    write_labels(out, "Kings collectibles", KingsCollectible::ALL)?;

    writeln!(out, "{}", "Emergency operations".cyan())?;
    for &level in Level::ALL {
        writeln!(out, "  {}", level.to_string().bold())?;
        for operation in EmergencyOperation::by_level(level) {
            writeln!(out, "    {operation:12} {}", operation.info().score)?;
        }
    }
    writeln!(out, "{}", "Hidden operations (normal / emergency)".cyan())?;
    for operation in HiddenOperation::ALL {
        let info = operation.info();
        writeln!(
            out,
            "  {operation:12} {} / {}",
            info.score, info.emergency_score
        )?;
    }
    writeln!(out, "{}", "Boss operations (normal / chaos)".cyan())?;
    for operation in BossOperation::ALL {
        let info = operation.info();
        writeln!(out, "  {operation:12} {} / {}", info.score, info.chaos_score)?;
    }
    writeln!(out, "{}", "Banned operators (bonus)".cyan())?;
    for operator in BannedOperator::ALL {
        writeln!(out, "  {operator:12} {}", operator.bonus())?;
    }
    Ok(())
}

/// Machine-readable summary: the session, its subtotals and total.
#[must_use]
pub fn summary_json(session: &Session, rules: &ScoreRules) -> Value {
    let breakdown = ScoreBreakdown::compute_with_rules(session, rules);
    json!({
        "session": session,
        "breakdown": breakdown,
        "total": breakdown.total(),
        "refreshCap": session.refresh_cap_under(rules),
    })
}
