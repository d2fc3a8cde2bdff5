use scout_core::{AppViewModel, DisplayRecord, SearchPhase};

const NAME_WIDTH: usize = 28;

/// Renders the whole view as terminal lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(error) = &view.error {
        lines.push(format!("error: {error}"));
    }
    if let Some(status) = view.status_line() {
        lines.push(status);
    }
    if let (SearchPhase::Searching, Some(progress)) = (view.phase, view.progress) {
        lines.push(format!(
            "  status check {}/{}",
            progress.attempt, progress.max_attempts
        ));
    }

    if !view.searching && !view.records.is_empty() {
        lines.push(format!(
            "    {:<4}{:<NAME_WIDTH$}{:<16}{:<16}{:>12}{:>8}  {}",
            "#", "Channel", "Nationality", "Joined On", "Subscribers", "Videos", "Total Views"
        ));
        let selected_id = view.selected.as_ref().map(|record| record.id.as_str());
        for (index, record) in view.records.iter().enumerate() {
            let marker = if Some(record.id.as_str()) == selected_id {
                ">"
            } else {
                " "
            };
            lines.push(format!(
                "  {marker} {:<4}{:<NAME_WIDTH$}{:<16}{:<16}{:>12}{:>8}  {}",
                index + 1,
                truncate(&record.name, NAME_WIDTH - 1),
                truncate(&record.nationality, 15),
                truncate(&record.joined_on, 15),
                record.subscribers,
                record.videos,
                record.total_views
            ));
        }
        if let Some(selected) = &view.selected {
            lines.extend(render_details(selected));
        }
    }

    if let Some(notice) = &view.notice {
        lines.push(notice.clone());
    }
    lines
}

pub fn render_details(record: &DisplayRecord) -> Vec<String> {
    vec![
        String::new(),
        format!("  {}", record.name),
        format!("    url:         {}", record.id),
        format!("    nationality: {}", record.nationality),
        format!("    joined on:   {}", record.joined_on),
        format!("    subscribers: {}", record.subscribers),
        format!("    videos:      {}", record.videos),
        format!("    total views: {}", record.total_views),
    ]
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
