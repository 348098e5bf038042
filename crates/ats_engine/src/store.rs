use std::sync::{Mutex, MutexGuard, PoisonError};

use ats_core::{
    extract_mentions, paginate, renumber, unique_slug, Assessment, Candidate, CandidatePatch,
    CandidateQuery, CandidateStage, Job, JobPatch, JobQuery, JobStatus, NewCandidate, NewJob,
    Note, Page, StageEvent,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Everything the store holds, in a form that can be written to disk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub jobs: Vec<Job>,
    pub candidates: Vec<Candidate>,
    pub assessments: Vec<Assessment>,
    pub next_id: u64,
}

/// In-process entity store. The single source of truth; only the gateway
/// should mutate it.
#[derive(Debug, Default)]
pub struct EntityStore {
    inner: Mutex<StoreSnapshot>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a snapshot, re-sorting jobs by `order` and closing any gaps.
    pub fn from_snapshot(mut snapshot: StoreSnapshot) -> Self {
        snapshot.jobs.sort_by_key(|job| job.order);
        renumber(&mut snapshot.jobs);
        Self {
            inner: Mutex::new(snapshot),
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.lock().clone()
    }

    pub fn job_count(&self) -> usize {
        self.lock().jobs.len()
    }

    pub fn candidate_count(&self) -> usize {
        self.lock().candidates.len()
    }

    /// Jobs matching `query`, in display order.
    pub fn list_jobs(&self, query: &JobQuery) -> Page<Job> {
        let data = self.lock();
        let matching = data
            .jobs
            .iter()
            .filter(|job| query.matches(job))
            .cloned()
            .collect();
        paginate(matching, query.page, query.page_size)
    }

    pub fn get_job(&self, job_id: &str) -> Result<Job, StoreError> {
        self.lock()
            .jobs
            .iter()
            .find(|job| job.id == job_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("job", job_id))
    }

    /// Appends a job at the end of the display order.
    pub fn create_job(&self, new_job: NewJob) -> Job {
        let mut data = self.lock();
        let now = Utc::now();
        let id = next_id(&mut data, "job");
        let slug = unique_slug(&new_job.title, |slug| {
            data.jobs.iter().any(|job| job.slug == slug)
        });
        let job = Job {
            id,
            title: new_job.title,
            slug,
            status: new_job.status.unwrap_or(JobStatus::Active),
            tags: new_job.tags,
            order: data.jobs.len() as u32 + 1,
            salary_range: new_job.salary_range,
            location: new_job.location,
            description: new_job.description,
            created_at: now,
            updated_at: now,
        };
        data.jobs.push(job.clone());
        job
    }

    /// Applies a patch; a new title regenerates the slug.
    pub fn update_job(&self, job_id: &str, patch: JobPatch) -> Result<Job, StoreError> {
        let mut data = self.lock();
        let index = data
            .jobs
            .iter()
            .position(|job| job.id == job_id)
            .ok_or_else(|| StoreError::not_found("job", job_id))?;

        let new_slug = match &patch.title {
            Some(title) if *title != data.jobs[index].title => Some(unique_slug(title, |slug| {
                data.jobs
                    .iter()
                    .any(|job| job.id != job_id && job.slug == slug)
            })),
            _ => None,
        };

        let job = &mut data.jobs[index];
        if let Some(title) = patch.title {
            job.title = title;
        }
        if let Some(slug) = new_slug {
            job.slug = slug;
        }
        if let Some(status) = patch.status {
            job.status = status;
        }
        if let Some(tags) = patch.tags {
            job.tags = tags;
        }
        if let Some(salary_range) = patch.salary_range {
            job.salary_range = salary_range;
        }
        if let Some(location) = patch.location {
            job.location = location;
        }
        if let Some(description) = patch.description {
            job.description = description;
        }
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    /// Moves the job ranked `from_order` to `to_order`, shifting the jobs in
    /// between by one so orders stay dense.
    pub fn reorder_job(&self, job_id: &str, from_order: u32, to_order: u32) -> Result<(), StoreError> {
        let mut data = self.lock();
        let len = data.jobs.len();
        for order in [from_order, to_order] {
            if order == 0 || order as usize > len {
                return Err(StoreError::InvalidOrder { order, len });
            }
        }
        let index = data
            .jobs
            .iter()
            .position(|job| job.id == job_id)
            .ok_or_else(|| StoreError::not_found("job", job_id))?;
        let actual = data.jobs[index].order;
        if actual != from_order {
            return Err(StoreError::OrderMismatch {
                job_id: job_id.to_string(),
                expected: from_order,
                actual,
            });
        }
        if from_order == to_order {
            return Ok(());
        }

        let mut job = data.jobs.remove(index);
        job.updated_at = Utc::now();
        data.jobs.insert(to_order as usize - 1, job);
        renumber(&mut data.jobs);
        Ok(())
    }

    /// Candidates matching `query`, in creation order.
    pub fn list_candidates(&self, query: &CandidateQuery) -> Page<Candidate> {
        let data = self.lock();
        let matching = data
            .candidates
            .iter()
            .filter(|candidate| query.matches(candidate))
            .cloned()
            .collect();
        paginate(matching, query.page, query.page_size)
    }

    pub fn get_candidate(&self, candidate_id: &str) -> Result<Candidate, StoreError> {
        self.lock()
            .candidates
            .iter()
            .find(|candidate| candidate.id == candidate_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("candidate", candidate_id))
    }

    pub fn create_candidate(&self, new_candidate: NewCandidate) -> Result<Candidate, StoreError> {
        let mut data = self.lock();
        if !data.jobs.iter().any(|job| job.id == new_candidate.job_id) {
            return Err(StoreError::not_found("job", &new_candidate.job_id));
        }
        let now = Utc::now();
        let stage = new_candidate.stage.unwrap_or(CandidateStage::Applied);
        let candidate = Candidate {
            id: next_id(&mut data, "cand"),
            name: new_candidate.name,
            email: new_candidate.email,
            phone: new_candidate.phone,
            stage,
            job_id: new_candidate.job_id,
            notes: Vec::new(),
            timeline: vec![StageEvent {
                from: None,
                to: stage,
                at: now,
            }],
            created_at: now,
            updated_at: now,
        };
        data.candidates.push(candidate.clone());
        Ok(candidate)
    }

    /// Applies a patch; an actual stage change is appended to the timeline.
    pub fn update_candidate(
        &self,
        candidate_id: &str,
        patch: CandidatePatch,
    ) -> Result<Candidate, StoreError> {
        let mut data = self.lock();
        if let Some(job_id) = &patch.job_id {
            if !data.jobs.iter().any(|job| &job.id == job_id) {
                return Err(StoreError::not_found("job", job_id));
            }
        }
        let candidate = data
            .candidates
            .iter_mut()
            .find(|candidate| candidate.id == candidate_id)
            .ok_or_else(|| StoreError::not_found("candidate", candidate_id))?;

        let now = Utc::now();
        if let Some(name) = patch.name {
            candidate.name = name;
        }
        if let Some(email) = patch.email {
            candidate.email = email;
        }
        if let Some(phone) = patch.phone {
            candidate.phone = phone;
        }
        if let Some(job_id) = patch.job_id {
            candidate.job_id = job_id;
        }
        if let Some(stage) = patch.stage {
            if stage != candidate.stage {
                candidate.timeline.push(StageEvent {
                    from: Some(candidate.stage),
                    to: stage,
                    at: now,
                });
                candidate.stage = stage;
            }
        }
        candidate.updated_at = now;
        Ok(candidate.clone())
    }

    /// Appends an immutable note; mentions are extracted from the content.
    pub fn add_note(
        &self,
        candidate_id: &str,
        author: &str,
        content: &str,
    ) -> Result<Note, StoreError> {
        let mut data = self.lock();
        let index = data
            .candidates
            .iter()
            .position(|candidate| candidate.id == candidate_id)
            .ok_or_else(|| StoreError::not_found("candidate", candidate_id))?;
        let note = Note {
            id: next_id(&mut data, "note"),
            content: content.to_string(),
            author: author.to_string(),
            mentions: extract_mentions(content),
            created_at: Utc::now(),
        };
        data.candidates[index].notes.push(note.clone());
        Ok(note)
    }

    pub fn assessment_for_job(&self, job_id: &str) -> Option<Assessment> {
        self.lock()
            .assessments
            .iter()
            .find(|assessment| assessment.job_id == job_id)
            .cloned()
    }

    /// Replaces the job's assessment tree wholesale. The job must exist.
    pub fn save_assessment(&self, mut assessment: Assessment) -> Result<Assessment, StoreError> {
        let mut data = self.lock();
        if !data.jobs.iter().any(|job| job.id == assessment.job_id) {
            return Err(StoreError::not_found("job", &assessment.job_id));
        }
        let now = Utc::now();
        assessment.updated_at = now;
        let existing = data
            .assessments
            .iter()
            .position(|existing| existing.job_id == assessment.job_id);
        match existing {
            Some(index) => {
                let existing = &mut data.assessments[index];
                assessment.id = existing.id.clone();
                assessment.created_at = existing.created_at;
                *existing = assessment.clone();
            }
            None => {
                if assessment.id.is_empty() {
                    assessment.id = next_id(&mut data, "asmt");
                }
                assessment.created_at = now;
                data.assessments.push(assessment.clone());
            }
        }
        Ok(assessment)
    }

    fn lock(&self) -> MutexGuard<'_, StoreSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn next_id(data: &mut StoreSnapshot, prefix: &str) -> String {
    data.next_id += 1;
    format!("{prefix}-{}", data.next_id)
}
