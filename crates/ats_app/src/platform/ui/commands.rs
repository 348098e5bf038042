use ats_core::{CandidateStage, Msg, ParseStageError};
use thiserror::Error;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Board,
    Jobs,
    List {
        stage: Option<CandidateStage>,
        search: Option<String>,
    },
    Page(usize),
    Move {
        candidate_id: String,
        stage: CandidateStage,
    },
    /// Positions as shown by `jobs`, starting at 1.
    Reorder {
        from: usize,
        to: usize,
    },
    Note {
        candidate_id: String,
        author: String,
        content: String,
    },
    Show(String),
    Close,
    Dismiss(u64),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum CommandError {
    #[error("unknown command `{0}`; type `help`")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("`{0}` is not a positive number")]
    BadNumber(String),
    #[error(transparent)]
    Stage(#[from] ParseStageError),
}

pub(crate) const HELP: &str = "\
commands:
  board                           kanban columns with counts
  jobs                            jobs in display order
  list [stage|all] [search]       filter the candidate list
  page <n>                        switch candidate list page
  move <candidate> <stage>        move a candidate to a stage
  reorder <from> <to>             move a job between positions
  note <candidate> <author> <text>
  show <candidate>                candidate details, notes and timeline
  close                           close the detail panel
  dismiss <toast>                 dismiss a notification
  help
  quit";

/// `Ok(None)` for a blank line.
pub(crate) fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "board" => Command::Board,
        "jobs" => Command::Jobs,
        "list" => parse_list(&rest)?,
        "page" => match rest.as_slice() {
            [page] => Command::Page(positive(page)?),
            _ => return Err(CommandError::Usage("page <n>")),
        },
        "move" => match rest.as_slice() {
            [candidate, stage @ ..] if !stage.is_empty() => Command::Move {
                candidate_id: candidate.to_string(),
                stage: stage.join(" ").parse()?,
            },
            _ => return Err(CommandError::Usage("move <candidate> <stage>")),
        },
        "reorder" => match rest.as_slice() {
            [from, to] => Command::Reorder {
                from: positive(from)?,
                to: positive(to)?,
            },
            _ => return Err(CommandError::Usage("reorder <from> <to>")),
        },
        "note" => match rest.as_slice() {
            [candidate, author, text @ ..] if !text.is_empty() => Command::Note {
                candidate_id: candidate.to_string(),
                author: author.to_string(),
                content: text.join(" "),
            },
            _ => return Err(CommandError::Usage("note <candidate> <author> <text>")),
        },
        "show" => match rest.as_slice() {
            [candidate] => Command::Show(candidate.to_string()),
            _ => return Err(CommandError::Usage("show <candidate>")),
        },
        "close" => Command::Close,
        "dismiss" => match rest.as_slice() {
            [id] => Command::Dismiss(
                id.parse()
                    .map_err(|_| CommandError::BadNumber(id.to_string()))?,
            ),
            _ => return Err(CommandError::Usage("dismiss <toast>")),
        },
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_list(rest: &[&str]) -> Result<Command, CommandError> {
    let (stage, search_words) = match rest.split_first() {
        Some((first, tail)) if first.eq_ignore_ascii_case("all") => (None, tail),
        Some((first, tail)) => match first.parse::<CandidateStage>() {
            Ok(stage) => (Some(stage), tail),
            Err(_) => (None, rest),
        },
        None => (None, rest),
    };
    let search = (!search_words.is_empty()).then(|| search_words.join(" "));
    Ok(Command::List { stage, search })
}

fn positive(word: &str) -> Result<usize, CommandError> {
    match word.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::BadNumber(word.to_string())),
    }
}

impl Command {
    /// Messages this command feeds into the state machine, in order.
    pub fn messages(&self) -> Vec<Msg> {
        match self {
            Command::List { stage, search } => vec![Msg::FilterChanged {
                search: search.clone(),
                stage: *stage,
            }],
            Command::Page(page) => vec![Msg::PageChanged(*page)],
            Command::Move {
                candidate_id,
                stage,
            } => vec![Msg::CandidateDropped {
                candidate_id: candidate_id.clone(),
                stage: *stage,
            }],
            Command::Reorder { from, to } => vec![Msg::JobDragged {
                from_index: from - 1,
                to_index: to - 1,
            }],
            Command::Note {
                candidate_id,
                author,
                content,
            } => vec![Msg::NoteSubmitted {
                candidate_id: candidate_id.clone(),
                author: author.clone(),
                content: content.clone(),
            }],
            Command::Show(candidate_id) => vec![Msg::CandidateSelected(Some(candidate_id.clone()))],
            Command::Close => vec![Msg::CandidateSelected(None)],
            Command::Dismiss(id) => vec![Msg::ToastDismissed(*id)],
            Command::Board | Command::Jobs | Command::Help | Command::Quit => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(parse("   "), Ok(None));
    }

    #[test]
    fn move_accepts_wire_name_or_label() {
        assert_eq!(
            parse("move cand-12 technical interview"),
            Ok(Some(Command::Move {
                candidate_id: "cand-12".into(),
                stage: CandidateStage::Tech,
            }))
        );
        assert_eq!(
            parse("MOVE cand-12 offer").unwrap(),
            Some(Command::Move {
                candidate_id: "cand-12".into(),
                stage: CandidateStage::Offer,
            })
        );
        assert!(matches!(
            parse("move cand-12 limbo"),
            Err(CommandError::Stage(_))
        ));
    }

    #[test]
    fn list_splits_stage_from_search() {
        assert_eq!(
            parse("list screen ada"),
            Ok(Some(Command::List {
                stage: Some(CandidateStage::Screen),
                search: Some("ada".into()),
            }))
        );
        assert_eq!(
            parse("list grace hopper"),
            Ok(Some(Command::List {
                stage: None,
                search: Some("grace hopper".into()),
            }))
        );
        assert_eq!(
            parse("list all"),
            Ok(Some(Command::List {
                stage: None,
                search: None,
            }))
        );
    }

    #[test]
    fn reorder_positions_become_zero_based_indices() {
        let command = parse("reorder 1 3").unwrap().unwrap();
        assert_eq!(
            command.messages(),
            vec![Msg::JobDragged {
                from_index: 0,
                to_index: 2,
            }]
        );
        assert_eq!(
            parse("reorder 0 3"),
            Err(CommandError::BadNumber("0".into()))
        );
    }

    #[test]
    fn note_keeps_full_text() {
        let command = parse("note cand-2 sam Great call, loop in @priya").unwrap();
        assert_eq!(
            command,
            Some(Command::Note {
                candidate_id: "cand-2".into(),
                author: "sam".into(),
                content: "Great call, loop in @priya".into(),
            })
        );
    }

    #[test]
    fn unknown_verb_and_bad_usage_are_reported() {
        assert_eq!(
            parse("teleport cand-1"),
            Err(CommandError::Unknown("teleport".into()))
        );
        assert_eq!(
            parse("show"),
            Err(CommandError::Usage("show <candidate>"))
        );
    }
}
