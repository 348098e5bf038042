use std::fmt::Write;

use ats_core::{AppViewModel, CandidateCardView, CandidateDetailView, ToastLevel, ToastView};

/// Cards listed under each kanban column before eliding the rest.
const CARDS_PER_COLUMN: usize = 5;

pub(crate) fn render_board(view: &AppViewModel) -> String {
    if !view.candidates_loaded {
        return "Loading candidates...".to_string();
    }
    let mut out = String::new();
    for column in &view.columns {
        let _ = writeln!(out, "{} ({})", column.label, column.cards.len());
        for card in column.cards.iter().take(CARDS_PER_COLUMN) {
            let _ = writeln!(out, "  {}", card_line(card));
        }
        if column.cards.len() > CARDS_PER_COLUMN {
            let _ = writeln!(out, "  ... {} more", column.cards.len() - CARDS_PER_COLUMN);
        }
    }
    out
}

pub(crate) fn render_jobs(view: &AppViewModel) -> String {
    if view.jobs.is_empty() {
        return "No jobs.".to_string();
    }
    let mut out = String::new();
    for (position, job) in view.jobs.iter().enumerate() {
        let _ = write!(
            out,
            "{:>3}. {} [{}]",
            position + 1,
            job.title,
            job.status.as_str()
        );
        if !job.tags.is_empty() {
            let _ = write!(out, " #{}", job.tags.join(" #"));
        }
        if job.pending {
            out.push_str(" (saving)");
        }
        out.push('\n');
    }
    out
}

pub(crate) fn render_list(view: &AppViewModel) -> String {
    let list = &view.list;
    let mut out = String::new();
    let stage = list.stage.map(|stage| stage.label()).unwrap_or("all stages");
    let _ = write!(out, "Candidates in {stage}");
    if let Some(search) = &list.search {
        let _ = write!(out, " matching \"{search}\"");
    }
    let _ = writeln!(
        out,
        ": {} (page {}/{})",
        list.total,
        list.page,
        list.total_pages.max(1)
    );
    for card in &list.rows {
        let _ = writeln!(out, "  {} <{}> {}", card_line(card), card.email, card.stage.label());
    }
    out
}

pub(crate) fn render_detail(detail: Option<&CandidateDetailView>) -> String {
    let Some(detail) = detail else {
        return "No candidate selected.".to_string();
    };
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", detail.name, detail.id);
    let _ = writeln!(out, "  email: {}", detail.email);
    if let Some(phone) = &detail.phone {
        let _ = writeln!(out, "  phone: {phone}");
    }
    let _ = writeln!(out, "  stage: {}", detail.stage_label);
    if let Some(job) = &detail.job_title {
        let _ = writeln!(out, "  job:   {job}");
    }

    out.push_str("  timeline:\n");
    for entry in &detail.timeline {
        match entry.from {
            Some(from) => {
                let _ = writeln!(out, "    {} {} -> {}", entry.at, from, entry.to);
            }
            None => {
                let _ = writeln!(out, "    {} entered {}", entry.at, entry.to);
            }
        }
    }

    if detail.notes.is_empty() {
        out.push_str("  no notes\n");
    } else {
        out.push_str("  notes:\n");
        for note in &detail.notes {
            let _ = writeln!(out, "    {} {}: {}", note.created_at, note.author, note.content);
        }
    }
    out
}

pub(crate) fn render_toast(toast: &ToastView) -> String {
    let tag = match toast.level {
        ToastLevel::Success => "ok",
        ToastLevel::Error => "error",
        ToastLevel::Info => "info",
    };
    format!("[{tag} #{}] {}: {}", toast.id, toast.title, toast.description)
}

fn card_line(card: &CandidateCardView) -> String {
    if card.pending {
        format!("{} {} (saving)", card.id, card.name)
    } else {
        format!("{} {}", card.id, card.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ats_core::{update, AppState, Candidate, CandidateStage, Msg};
    use chrono::Utc;

    fn candidate(n: usize, stage: CandidateStage) -> Candidate {
        let now = Utc::now();
        Candidate {
            id: format!("cand-{n}"),
            name: format!("Person {n}"),
            email: format!("p{n}@example.com"),
            phone: None,
            stage,
            job_id: "job-1".into(),
            notes: Vec::new(),
            timeline: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn view_with(candidates: Vec<Candidate>) -> AppViewModel {
        let (state, _) = update(AppState::new(), Msg::CandidatesLoaded(candidates));
        state.view()
    }

    #[test]
    fn board_shows_counts_and_elides_long_columns() {
        let candidates = (1..=7)
            .map(|n| candidate(n, CandidateStage::Applied))
            .chain([candidate(8, CandidateStage::Tech)])
            .collect();
        let text = render_board(&view_with(candidates));

        assert!(text.contains("Applied (7)"));
        assert!(text.contains("  ... 2 more"));
        assert!(text.contains("Technical Interview (1)"));
        assert!(text.contains("Hired (0)"));
    }

    #[test]
    fn board_waits_for_first_load() {
        assert_eq!(render_board(&AppState::new().view()), "Loading candidates...");
    }

    #[test]
    fn pending_card_is_marked() {
        let (state, _) = update(
            AppState::new(),
            Msg::CandidatesLoaded(vec![candidate(1, CandidateStage::Applied)]),
        );
        let (state, _) = update(
            state,
            Msg::CandidateDropped {
                candidate_id: "cand-1".into(),
                stage: CandidateStage::Offer,
            },
        );
        let text = render_board(&state.view());
        assert!(text.contains("Offer (1)\n  cand-1 Person 1 (saving)"));
    }

    #[test]
    fn toast_line_names_level_and_id() {
        let toast = ToastView {
            id: 4,
            level: ToastLevel::Error,
            title: "Reorder failed".into(),
            description: "Network error".into(),
        };
        assert_eq!(render_toast(&toast), "[error #4] Reorder failed: Network error");
    }

    #[test]
    fn missing_detail_is_explained() {
        assert_eq!(render_detail(None), "No candidate selected.");
    }
}
