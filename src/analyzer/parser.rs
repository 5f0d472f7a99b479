//! Model-output parsing
//!
//! The model is told to answer with a bare JSON array, but real responses
//! arrive wrapped in markdown fences, prose, or not as JSON at all. Parsing
//! is therefore lenient: extract the widest `[...]` span and parse it as
//! JSON; if that fails, fall back to scraping one subtask per line.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use super::ProposedSubtask;

const UNKNOWN_TASK: &str = "Unknown task";
const DEFAULT_PARENT: &str = "Main Task";

fn date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap())
}

fn parent_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)parent:\s*([^,]+)").unwrap())
}

/// Parse a model response into proposed subtasks.
///
/// Dates in the past are floored to `today`; unparsable or missing dates
/// default to `today`. Ids are 1-based positions as strings. An empty JSON
/// array yields an empty result without falling back to line scraping.
pub fn parse_subtasks(text: &str, today: NaiveDate) -> Vec<ProposedSubtask> {
    if let Some(tasks) = parse_json_span(text, today) {
        return tasks;
    }
    parse_lines(text, today)
}

/// Try the widest `[...]` span as a JSON array. `None` means "not JSON",
/// which sends the caller to the line fallback; `Some(vec![])` means the
/// model answered with a valid but empty array.
fn parse_json_span(text: &str, today: NaiveDate) -> Option<Vec<ProposedSubtask>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }

    let parsed: serde_json::Value = serde_json::from_str(&text[start..=end]).ok()?;
    let items = parsed.as_array()?;

    let tasks = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let name = non_empty_str(item, "name")
                .or_else(|| non_empty_str(item, "task"))
                .unwrap_or(UNKNOWN_TASK)
                .to_string();
            let date = item
                .get("date")
                .and_then(|v| v.as_str())
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                .unwrap_or(today);
            let parent = non_empty_str(item, "parent")
                .unwrap_or(DEFAULT_PARENT)
                .to_string();

            ProposedSubtask {
                id: (index + 1).to_string(),
                name,
                date: floor_to_today(date, today),
                parent,
            }
        })
        .collect();

    Some(tasks)
}

/// Scrape one subtask per non-empty line, skipping lines that look like
/// JSON or markdown fences.
fn parse_lines(text: &str, today: NaiveDate) -> Vec<ProposedSubtask> {
    let mut subtasks = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty()
            || line.starts_with('[')
            || line.starts_with('{')
            || line.starts_with("```")
        {
            continue;
        }

        let date = date_pattern()
            .find(line)
            .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok())
            .unwrap_or(today);

        let parent = parent_pattern()
            .captures(line)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_else(|| DEFAULT_PARENT.to_string());

        let name = parent_pattern()
            .replace(&date_pattern().replace(line, ""), "")
            .replace("```json", "")
            .replace("```", "")
            .trim()
            .to_string();

        if name.is_empty() {
            continue;
        }

        subtasks.push(ProposedSubtask {
            id: (subtasks.len() + 1).to_string(),
            name,
            date: floor_to_today(date, today),
            parent,
        });
    }

    subtasks
}

fn floor_to_today(date: NaiveDate, today: NaiveDate) -> NaiveDate {
    date.max(today)
}

fn non_empty_str<'a>(item: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    item.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_plain_json_array() {
        let response = r#"[
            {"name": "Draft outline", "date": "2026-03-12", "parent": "Report"},
            {"name": "Write body", "date": "2026-03-14", "parent": "Report"}
        ]"#;

        let tasks = parse_subtasks(response, today());

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, "1");
        assert_eq!(tasks[0].name, "Draft outline");
        assert_eq!(tasks[0].date, date(2026, 3, 12));
        assert_eq!(tasks[0].parent, "Report");
        assert_eq!(tasks[1].id, "2");
    }

    #[test]
    fn extracts_json_from_markdown_fence() {
        let response = "Here you go:\n```json\n[{\"name\": \"Step one\", \"date\": \"2026-03-11\", \"parent\": \"Plan\"}]\n```";
        let tasks = parse_subtasks(response, today());
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "Step one");
    }

    #[test]
    fn accepts_task_key_as_name_alias() {
        let response = r#"[{"task": "Pack bags", "date": "2026-03-11"}]"#;
        let tasks = parse_subtasks(response, today());
        assert_eq!(tasks[0].name, "Pack bags");
        assert_eq!(tasks[0].parent, "Main Task");
    }

    #[test]
    fn missing_name_becomes_unknown_task() {
        let response = r#"[{"date": "2026-03-11"}]"#;
        let tasks = parse_subtasks(response, today());
        assert_eq!(tasks[0].name, "Unknown task");
    }

    #[test]
    fn past_dates_are_floored_to_today() {
        let response = r#"[{"name": "Old", "date": "2020-01-01", "parent": "P"}]"#;
        let tasks = parse_subtasks(response, today());
        assert_eq!(tasks[0].date, today());
    }

    #[test]
    fn invalid_date_defaults_to_today() {
        let response = r#"[{"name": "Soon", "date": "next tuesday", "parent": "P"}]"#;
        let tasks = parse_subtasks(response, today());
        assert_eq!(tasks[0].date, today());
    }

    #[test]
    fn empty_json_array_yields_no_tasks_without_fallback() {
        let response = "Nothing to do here.\n[]";
        let tasks = parse_subtasks(response, today());
        assert!(tasks.is_empty());
    }

    #[test]
    fn falls_back_to_line_scraping_for_non_json() {
        let response = "- Buy paint 2026-03-15, parent: Redecorate\n- Sand walls, parent: Redecorate\n";
        let tasks = parse_subtasks(response, today());

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].name, "- Buy paint ,");
        assert_eq!(tasks[0].date, date(2026, 3, 15));
        assert_eq!(tasks[0].parent, "Redecorate");
        assert_eq!(tasks[1].date, today());
    }

    #[test]
    fn line_fallback_skips_fences_and_braces() {
        let response = "```\n{ not json\nReal task 2026-03-20\n```";
        let tasks = parse_subtasks(response, today());
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "Real task");
    }

    #[test]
    fn returns_empty_for_blank_input() {
        assert!(parse_subtasks("", today()).is_empty());
        assert!(parse_subtasks("\n\n", today()).is_empty());
    }
}
