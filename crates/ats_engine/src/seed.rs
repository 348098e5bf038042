use std::collections::BTreeSet;

use ats_core::{
    Assessment, CandidateStage, Job, JobStatus, NewCandidate, NewJob, Question, QuestionKind,
    SalaryRange, Section,
};
use ats_logging::ats_info;
use chrono::Utc;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::{EntityStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedSettings {
    pub jobs: usize,
    pub candidates: usize,
    pub assessments: usize,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            jobs: 25,
            candidates: 1000,
            assessments: 3,
        }
    }
}

const ROLES: &[&str] = &[
    "Backend Engineer",
    "Frontend Engineer",
    "Full Stack Developer",
    "Data Engineer",
    "DevOps Engineer",
    "Product Designer",
    "Product Manager",
    "QA Engineer",
    "Mobile Developer",
    "Security Engineer",
    "Site Reliability Engineer",
    "Technical Writer",
];
const LEVELS: &[&str] = &["Junior", "Mid-level", "Senior", "Staff", "Lead"];
const TAGS: &[&str] = &[
    "remote", "onsite", "hybrid", "rust", "react", "python", "cloud", "urgent", "contract",
    "full-time",
];
const LOCATIONS: &[&str] = &["Berlin", "Lisbon", "Toronto", "Bangalore", "Austin", "Remote"];
const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Grace", "Linus", "Margaret", "Dennis", "Barbara", "Ken", "Radia", "Edsger",
    "Frances", "Donald", "Katherine", "Tim", "Hedy", "Guido", "Annie", "Bjarne", "Sophie", "Niklaus",
];
const LAST_NAMES: &[&str] = &[
    "Lovelace", "Turing", "Hopper", "Torvalds", "Hamilton", "Ritchie", "Liskov", "Thompson",
    "Perlman", "Dijkstra", "Allen", "Knuth", "Johnson", "Berners-Lee", "Lamarr", "van Rossum",
    "Easley", "Stroustrup", "Wilson", "Wirth",
];

/// Fills an empty store with generated jobs, candidates and assessments.
pub fn seed_store(
    store: &EntityStore,
    settings: &SeedSettings,
    rng: &mut ChaCha8Rng,
) -> Result<(), StoreError> {
    let jobs: Vec<Job> = (0..settings.jobs)
        .map(|n| store.create_job(random_job(n, rng)))
        .collect();
    if jobs.is_empty() {
        return Ok(());
    }

    for n in 0..settings.candidates {
        let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Alex");
        let last = LAST_NAMES.choose(rng).copied().unwrap_or("Doe");
        let job = &jobs[rng.random_range(0..jobs.len())];
        let stage = CandidateStage::ALL[rng.random_range(0..CandidateStage::ALL.len())];
        store.create_candidate(NewCandidate {
            name: format!("{first} {last}"),
            email: format!(
                "{}.{}{}@example.com",
                first.to_lowercase(),
                last.to_lowercase().replace([' ', '-'], ""),
                n + 1
            ),
            phone: rng
                .random_bool(0.7)
                .then(|| format!("+1-555-{:04}", rng.random_range(0..10_000))),
            job_id: job.id.clone(),
            stage: Some(stage),
        })?;
    }

    for job in jobs.iter().take(settings.assessments) {
        store.save_assessment(sample_assessment(job))?;
    }

    ats_info!(
        "seeded {} jobs, {} candidates, {} assessments",
        jobs.len(),
        settings.candidates,
        settings.assessments.min(jobs.len())
    );
    Ok(())
}

fn random_job(n: usize, rng: &mut ChaCha8Rng) -> NewJob {
    let role = ROLES[n % ROLES.len()];
    let level = LEVELS.choose(rng).copied().unwrap_or("Senior");
    let tag_count = rng.random_range(1..=3);
    let tags: BTreeSet<String> = TAGS
        .choose_multiple(rng, tag_count)
        .map(|tag| tag.to_string())
        .collect();
    let status = if rng.random_bool(0.2) {
        JobStatus::Archived
    } else {
        JobStatus::Active
    };
    let min = rng.random_range(40..=120) * 1000;
    NewJob {
        title: format!("{level} {role}"),
        status: Some(status),
        tags,
        salary_range: Some(SalaryRange {
            min,
            max: min + rng.random_range(10..=60) * 1000,
            currency: "USD".to_string(),
        }),
        location: LOCATIONS.choose(rng).map(|loc| loc.to_string()),
        description: format!("We are hiring a {level} {role} to join the team."),
    }
}

fn choice(options: &[&str]) -> Vec<String> {
    options.iter().map(|o| o.to_string()).collect()
}

/// A three-section assessment using every question kind.
pub fn sample_assessment(job: &Job) -> Assessment {
    let now = Utc::now();
    let background = Section::new("background", "Background")
        .with_question(
            Question::new(
                "years",
                "Years of professional experience",
                QuestionKind::Numeric {
                    min: Some(0.0),
                    max: Some(50.0),
                },
            )
            .required(),
        )
        .with_question(
            Question::new(
                "relocate",
                "Are you willing to relocate?",
                QuestionKind::SingleChoice {
                    options: choice(&["Yes", "No"]),
                },
            )
            .required(),
        )
        .with_question(
            Question::new(
                "relocate_where",
                "Which cities would you consider?",
                QuestionKind::ShortText {
                    max_length: Some(120),
                },
            )
            .shown_if("relocate", "Yes"),
        )
        .with_question(Question::new(
            "resume",
            "Upload your resume",
            QuestionKind::FileUpload {
                accepted_types: choice(&[".pdf", ".docx"]),
                max_size_mb: Some(5),
            },
        ));

    let technical = Section::new("technical", "Technical")
        .with_question(
            Question::new(
                "languages",
                "Which languages have you used in production?",
                QuestionKind::MultiChoice {
                    options: choice(&["Rust", "Go", "TypeScript", "Python", "Java"]),
                },
            )
            .required(),
        )
        .with_question(Question::new(
            "system_design",
            "Describe a system you designed end to end",
            QuestionKind::LongText {
                max_length: Some(2000),
            },
        ))
        .with_question(Question::new(
            "testing",
            "Preferred testing approach",
            QuestionKind::SingleChoice {
                options: choice(&["Unit first", "Integration first", "Property based"]),
            },
        ))
        .with_question(Question::new(
            "oncall",
            "Hours of on-call per month you are comfortable with",
            QuestionKind::Numeric {
                min: Some(0.0),
                max: Some(200.0),
            },
        ));

    let culture = Section::new("culture", "Working style")
        .with_question(Question::new(
            "remote",
            "Preferred working arrangement",
            QuestionKind::SingleChoice {
                options: choice(&["Remote", "Hybrid", "Onsite"]),
            },
        ))
        .with_question(Question::new(
            "motivation",
            "Why this role?",
            QuestionKind::LongText {
                max_length: Some(1000),
            },
        ))
        .with_question(Question::new(
            "portfolio",
            "Link to a portfolio or repository",
            QuestionKind::ShortText {
                max_length: Some(200),
            },
        ));

    Assessment {
        id: String::new(),
        job_id: job.id.clone(),
        title: format!("{} assessment", job.title),
        description: format!("Screening questions for {}", job.title),
        sections: vec![background, technical, culture],
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ats_core::{CandidateQuery, JobQuery};
    use rand_chacha::rand_core::SeedableRng;

    #[test]
    fn seeds_requested_volume() {
        let store = EntityStore::new();
        let settings = SeedSettings {
            jobs: 5,
            candidates: 40,
            assessments: 2,
        };
        seed_store(&store, &settings, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();

        assert_eq!(store.job_count(), 5);
        assert_eq!(store.candidate_count(), 40);
        let jobs = store.list_jobs(&JobQuery::all()).items;
        let first = store.assessment_for_job(&jobs[0].id).unwrap();
        assert!(first.question_count() >= 10);
        assert!(first.dangling_conditions().is_empty());
        assert!(store.assessment_for_job(&jobs[4].id).is_none());
        let candidates = store.list_candidates(&CandidateQuery::all()).items;
        assert!(candidates
            .iter()
            .all(|c| jobs.iter().any(|j| j.id == c.job_id)));
    }

    #[test]
    fn same_seed_gives_same_data() {
        let settings = SeedSettings {
            jobs: 3,
            candidates: 10,
            assessments: 0,
        };
        let titles = |seed| {
            let store = EntityStore::new();
            seed_store(&store, &settings, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
            store
                .list_candidates(&CandidateQuery::all())
                .items
                .into_iter()
                .map(|c| (c.name, c.stage))
                .collect::<Vec<_>>()
        };
        assert_eq!(titles(9), titles(9));
    }
}
