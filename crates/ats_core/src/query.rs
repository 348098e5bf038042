use serde::{Deserialize, Serialize};

use crate::{Candidate, CandidateStage, Job, JobStatus};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually returned.
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }
}

/// Cuts one page out of `items`. Page numbers start at 1; page 0 is read as 1,
/// a zero page size as [`DEFAULT_PAGE_SIZE`].
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let page_size = if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    };
    let total = items.len();
    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .collect();
    Page {
        items,
        page,
        page_size,
        total,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobQuery {
    pub search: Option<String>,
    pub status: Option<JobStatus>,
    pub tag: Option<String>,
    pub page: usize,
    pub page_size: usize,
}

impl Default for JobQuery {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            tag: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl JobQuery {
    /// Every job on a single page, used when loading the reorderable list.
    pub fn all() -> Self {
        Self {
            page_size: usize::MAX,
            ..Self::default()
        }
    }

    pub fn matches(&self, job: &Job) -> bool {
        if self.status.is_some_and(|status| job.status != status) {
            return false;
        }
        if let Some(tag) = &self.tag {
            if !job.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                return false;
            }
        }
        match normalized(self.search.as_deref()) {
            Some(needle) => {
                contains_folded(&job.title, &needle)
                    || job.tags.iter().any(|t| contains_folded(t, &needle))
            }
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateQuery {
    pub search: Option<String>,
    pub stage: Option<CandidateStage>,
    pub job_id: Option<String>,
    pub page: usize,
    pub page_size: usize,
}

impl Default for CandidateQuery {
    fn default() -> Self {
        Self {
            search: None,
            stage: None,
            job_id: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CandidateQuery {
    pub fn all() -> Self {
        Self {
            page_size: usize::MAX,
            ..Self::default()
        }
    }

    pub fn matches(&self, candidate: &Candidate) -> bool {
        if self.stage.is_some_and(|stage| candidate.stage != stage) {
            return false;
        }
        if self
            .job_id
            .as_deref()
            .is_some_and(|job_id| candidate.job_id != job_id)
        {
            return false;
        }
        match normalized(self.search.as_deref()) {
            Some(needle) => {
                contains_folded(&candidate.name, &needle)
                    || contains_folded(&candidate.email, &needle)
            }
            None => true,
        }
    }
}

fn normalized(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

fn contains_folded(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_clamps_page_and_reports_totals() {
        let page = paginate((1..=23).collect::<Vec<_>>(), 3, 10);
        assert_eq!(page.items, vec![21, 22, 23]);
        assert_eq!(page.total, 23);
        assert_eq!(page.total_pages(), 3);

        let first = paginate(vec![1, 2, 3], 0, 0);
        assert_eq!(first.page, 1);
        assert_eq!(first.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(first.items, vec![1, 2, 3]);
    }

    #[test]
    fn page_past_end_is_empty() {
        let page = paginate(vec!['a', 'b'], 5, 2);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 2);
    }

    #[test]
    fn all_query_does_not_overflow_offset() {
        let page = paginate(vec![1, 2], JobQuery::all().page, JobQuery::all().page_size);
        assert_eq!(page.items, vec![1, 2]);
    }
}
