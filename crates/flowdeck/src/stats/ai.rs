use super::ratio;
use crate::domain::{AiTool, AiTrackingEvent, Issue};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Today's AI activity and the overall AI share of issues
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiStats {
    /// Events recorded since the start of the UTC day
    pub today_interactions: usize,

    /// Tokens used by those events
    pub today_tokens: u64,

    /// Tool with the most events today
    pub most_used_tool: Option<AiTool>,

    /// Percentage of all issues flagged AI-generated
    pub ai_generation_rate: f64,
}

impl AiStats {
    /// Compute from all events and issues as of `now`.
    ///
    /// Ties for most used tool go to the tool seen first.
    #[allow(clippy::cast_precision_loss)]
    pub fn compute<'a, E, I>(events: E, issues: I, now: DateTime<Utc>) -> Self
    where
        E: IntoIterator<Item = &'a AiTrackingEvent>,
        I: IntoIterator<Item = &'a Issue>,
    {
        let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();

        let mut stats = Self::default();
        let mut per_tool: HashMap<AiTool, (usize, usize)> = HashMap::new();
        for event in events.into_iter().filter(|e| e.timestamp >= day_start) {
            stats.today_interactions += 1;
            stats.today_tokens += event.tokens_used;
            let seen = per_tool.len();
            per_tool.entry(event.tool()).or_insert((0, seen)).0 += 1;
        }
        stats.most_used_tool = per_tool
            .into_iter()
            .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
                count_a.cmp(count_b).then(first_b.cmp(first_a))
            })
            .map(|(tool, _)| tool);

        let (total, generated) = issues.into_iter().fold((0usize, 0usize), |(t, g), issue| {
            (t + 1, g + usize::from(issue.is_ai_generated))
        });
        stats.ai_generation_rate = ratio(generated as f64, total as f64) * 100.0;
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewAiEvent, NewIssue};
    use chrono::{Duration, TimeZone};

    fn event(tool: &str, tokens: u64, at: DateTime<Utc>) -> AiTrackingEvent {
        NewAiEvent {
            event_type: "generate".into(),
            ai_tool: tool.into(),
            prompt_summary: String::new(),
            files_changed: vec![],
            tokens_used: tokens,
            issue: None,
        }
        .build(at)
        .unwrap()
    }

    #[test]
    fn only_today_counts() {
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 15, 0, 0).unwrap();
        let events = [
            event("cursor", 100, now - Duration::days(1)),
            event("claude_code", 300, now - Duration::hours(2)),
            event("claude_code", 200, now - Duration::hours(1)),
            event("cursor", 50, now),
        ];
        let stats = AiStats::compute(&events, [], now);

        assert_eq!(stats.today_interactions, 3);
        assert_eq!(stats.today_tokens, 550);
        assert_eq!(stats.most_used_tool, Some(AiTool::ClaudeCode));
        assert!(stats.ai_generation_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn tool_tie_goes_to_first_seen() {
        let now = Utc::now();
        let events = [event("cursor", 1, now), event("codex_cli", 1, now)];
        let stats = AiStats::compute(&events, [], now);
        assert_eq!(stats.most_used_tool, Some(AiTool::Cursor));
    }

    #[test]
    fn generation_rate_over_all_issues() {
        let mut ai = NewIssue::titled("ai");
        ai.is_ai_generated = true;
        let issues = [
            ai.build(1, Utc::now()).unwrap(),
            NewIssue::titled("human").build(2, Utc::now()).unwrap(),
        ];
        let stats = AiStats::compute([], &issues, Utc::now());
        assert!((stats.ai_generation_rate - 50.0).abs() < 1e-9);
        assert_eq!(stats.most_used_tool, None);
    }
}
