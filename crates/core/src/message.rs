//! Chat message rendering for change records.

use crate::dates::format_day;
use crate::model::ChangeRecord;

const HEADLINE: &str = "## New reply to an inquiry";
const SEPARATOR: &str = "--------------------------------";

/// Render one change record as a Markdown chat message.
///
/// Optional lines (submitters, authors, dates, latency, prolongation) are
/// left out when there is nothing to show. Mentions go last, after the
/// separator, so the chat client pings the right people.
pub fn format_message(change: &ChangeRecord) -> String {
    let mut out = String::new();

    out.push_str(&format!("{HEADLINE}\n\n"));
    out.push_str(&format!(
        "#### {} {} ({})\n",
        change.title, change.key.kind, change.key.id
    ));

    if !change.submitter_names.is_empty() {
        out.push_str(&format!("**Submitted by:** {}\n", change.submitter_names));
    }

    out.push_str(&format!(
        "Replies: {} → {} (+{})\n",
        change.previous_replies, change.current_replies, change.new_count
    ));

    if !change.reply_authors.is_empty() {
        out.push_str(&format!(
            "**Answered by:** {}\n",
            change.reply_authors.join(", ")
        ));
    }

    if let Some(submitted) = change.submission_date.as_deref() {
        let shown = format_day(submitted).unwrap_or_else(|| submitted.to_string());
        out.push_str(&format!("**Submitted on:** {shown}\n"));
    }

    if let Some(days) = change.days_to_response {
        out.push_str(&format!("**Days to reply:** {days}\n"));
    }

    if change.has_prolongation {
        out.push_str("⏰ **Reply deadline extended**\n");
    }

    out.push_str(&format!("{}\n\n{SEPARATOR}\n\n", change.url));

    if !change.mentions.is_empty() {
        out.push_str(&change.mentions.join(" "));
        out.push('\n');
    }

    out
}
