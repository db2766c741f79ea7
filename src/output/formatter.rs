use std::io::IsTerminal;
use chrono::{DateTime, Duration, Utc};
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::analysis::{format_eur, AnalysisResult, InputMode};
use crate::store::StoredAnalysis;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a 0-100 score as "72/100"
pub fn format_score(score: u8) -> String {
    format!("{}/100", score)
}

/// Color a score by band: green from 70, yellow from 40, red below
fn paint_score(text: &str, score: f64, use_colors: bool) -> String {
    if !use_colors {
        text.to_string()
    } else if score >= 70.0 {
        text.green().bold().to_string()
    } else if score >= 40.0 {
        text.yellow().bold().to_string()
    } else {
        text.red().bold().to_string()
    }
}

fn heading(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().underline().to_string()
    } else {
        text.to_string()
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn mode_label(mode: InputMode) -> &'static str {
    match mode {
        InputMode::Document => "document",
        InputMode::Questionnaire => "questionnaire",
    }
}

/// Format a full analysis as a multi-section report
pub fn format_report(result: &AnalysisResult, use_colors: bool) -> String {
    let mut out = Vec::new();
    let overall = f64::from(result.overall_score);

    let title = if use_colors {
        result.project_name.bold().to_string()
    } else {
        result.project_name.clone()
    };
    out.push(format!("{} ({})", title, mode_label(result.mode)));
    out.push(format!(
        "Overall score: {}",
        paint_score(&format_score(result.overall_score), overall, use_colors)
    ));
    let range = &result.valuation_range;
    out.push(format!(
        "Valuation: {} (range {} - {})",
        format_eur(range.recommended),
        format_eur(range.min),
        format_eur(range.max)
    ));
    out.push(String::new());

    out.push(heading("Scores", use_colors));
    let rows = [
        ("Market", result.market.score, &result.market.reasoning),
        ("Team", result.team.score, &result.team.reasoning),
        ("Product", result.product.score, &result.product.reasoning),
        ("Financial", result.financial.score, &result.financial.reasoning),
        ("Competitive", result.competitive.score, &result.competitive.reasoning),
        ("Berkus", result.berkus.score, &result.berkus.reasoning),
        ("Scorecard", result.scorecard.score, &result.scorecard.reasoning),
        ("Risk", result.risk.score, &result.risk.reasoning),
    ];
    for (label, score, reasoning) in rows {
        let score_str = format!("{:>3.0}", score);
        out.push(format!(
            "  {:<12} {}  {}",
            label,
            paint_score(&score_str, score, use_colors),
            reasoning
        ));
    }
    out.push(String::new());

    if !result.missing_areas.is_empty() {
        let names: Vec<String> = result.missing_areas.iter().map(|a| a.to_string()).collect();
        out.push(format!("Missing: {}", names.join(", ")));
        out.push(String::new());
    }

    out.push(heading("Recommendations", use_colors));
    for (i, rec) in result.recommendations.iter().enumerate() {
        out.push(format!("  {:>2}. {}", i + 1, rec));
    }
    out.push(String::new());

    out.push(heading("Next steps", use_colors));
    let steps = &result.next_steps;
    for (label, items) in [
        ("Next 30 days", &steps.immediate),
        ("Next 3 months", &steps.short_term),
        ("Next 12 months", &steps.long_term),
    ] {
        out.push(format!("  {}:", label));
        for item in items {
            out.push(format!("    - {}", item));
        }
    }
    out.push(format!("  Funding strategy: {}", steps.funding_strategy));
    out.push(String::new());

    out.push(heading("Executive summary", use_colors));
    out.push(result.executive_summary.clone());

    out.join("\n")
}

/// Format saved analyses as a table with columns: Index, Score, Name, Id, Age
/// No headers; the index is what `show` and `delete` accept
pub fn format_analysis_table(records: &[StoredAnalysis], use_colors: bool) -> String {
    format_analysis_table_at(records, use_colors, Utc::now(), get_terminal_width())
}

fn format_analysis_table_at(
    records: &[StoredAnalysis],
    use_colors: bool,
    now: DateTime<Utc>,
    term_width: Option<usize>,
) -> String {
    if records.is_empty() {
        return "No saved analyses.".to_string();
    }

    // Index 3 + space, score 7, two separators, id ~23, age ~4
    let separator = "  ";
    let score_width = 7;

    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format!(
                "{:>width$}",
                format_score(record.result.overall_score),
                width = score_width
            );
            let age = format_age(now - record.created_at);
            let fixed_width = 4 + score_width + separator.len() * 3 + record.id.len() + age.len();

            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&record.project_name, width - fixed_width)
                }
                Some(_) => truncate_name(&record.project_name, 20),
                None => record.project_name.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    paint_score(&score_str, f64::from(record.result.overall_score), true),
                    separator,
                    name,
                    separator,
                    record.id.dimmed(),
                    separator,
                    age
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, score_str, separator, name, separator, record.id, separator, age
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{QuestionnaireData, StartupAnalyzer};

    fn sample_result(name: &str) -> AnalysisResult {
        let data = QuestionnaireData {
            project_name: name.to_string(),
            target_market: "PMI italiane".to_string(),
            ..Default::default()
        };
        StartupAnalyzer::default().analyze_from_questionnaire(&data)
    }

    fn sample_record(id: &str, name: &str, created_at: DateTime<Utc>) -> StoredAnalysis {
        StoredAnalysis::new(id.to_string(), created_at, sample_result(name))
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(72), "72/100");
        assert_eq!(format_score(0), "0/100");
    }

    #[test]
    fn test_format_report_sections() {
        let result = sample_result("GreenBox");
        let report = format_report(&result, false);
        assert!(report.starts_with("GreenBox (questionnaire)"));
        assert!(report.contains(&format!("Overall score: {}/100", result.overall_score)));
        assert!(report.contains("Valuation: €"));
        assert!(report.contains("  Market        30  "));
        assert!(report.contains("Missing: competitive analysis"));
        assert!(report.contains("Recommendations\n   1. "));
        assert!(report.contains("  Next 30 days:"));
        assert!(report.ends_with(&result.executive_summary));
    }

    #[test]
    fn test_format_report_no_colors_has_no_escapes() {
        let report = format_report(&sample_result("X"), false);
        assert!(!report.contains('\u{1b}'));
    }

    #[test]
    fn test_format_age_hours() {
        assert_eq!(format_age(Duration::hours(3)), "3h");
    }

    #[test]
    fn test_format_age_days() {
        assert_eq!(format_age(Duration::days(2)), "2d");
    }

    #[test]
    fn test_format_age_weeks() {
        assert_eq!(format_age(Duration::weeks(2)), "2w");
    }

    #[test]
    fn test_format_age_now() {
        assert_eq!(format_age(Duration::seconds(30)), "now");
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Short", 20), "Short");
        assert_eq!(truncate_name("This is a very long name", 15), "This is a ve...");
        assert_eq!(truncate_name("Hello world", 3), "Hel");
    }

    #[test]
    fn test_format_analysis_table_empty() {
        assert_eq!(format_analysis_table(&[], false), "No saved analyses.");
    }

    #[test]
    fn test_format_analysis_table_rows() {
        let now = Utc::now();
        let records = vec![
            sample_record("analysis_2", "GreenBox", now - Duration::hours(5)),
            sample_record("analysis_1", "BlueBox", now - Duration::days(3)),
        ];
        let table = format_analysis_table_at(&records, false, now, None);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1."));
        assert!(lines[0].contains("GreenBox"));
        assert!(lines[0].contains("analysis_2"));
        assert!(lines[0].ends_with("5h"));
        assert!(lines[1].starts_with(" 2."));
        assert!(lines[1].ends_with("3d"));
    }

    #[test]
    fn test_format_analysis_table_truncates_to_terminal() {
        let now = Utc::now();
        let records = vec![sample_record(
            "analysis_1",
            "A very long project name that will not fit",
            now,
        )];
        let table = format_analysis_table_at(&records, false, now, Some(60));
        assert!(table.contains("..."));
    }
}
