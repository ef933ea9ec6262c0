//! Project query facade: paged reads against the contract.

use tracing::{debug, info};

use crate::models::{Project, ProjectScope};
use crate::store::{ActionOutcome, DAppStore};

impl DAppStore {
    /// Loads one page of all projects. Without a connected contract this is a
    /// no-op; on failure the current page is kept.
    pub async fn load_all_projects(&self, page: usize) -> ActionOutcome {
        if page == 0 {
            debug!("ignoring request for page 0");
            return ActionOutcome::Skipped;
        }
        let Some(contract) = self.contract().await else {
            return ActionOutcome::Skipped;
        };
        match contract.get_projects(page, self.page_size()).await {
            Ok(items) => {
                self.apply_page(ProjectScope::All, page, items).await;
                ActionOutcome::Completed
            }
            Err(e) => {
                self.record_failure("Error loading projects", &e).await;
                ActionOutcome::Failed
            }
        }
    }

    /// Loads one page of the projects owned by the connected account.
    pub async fn load_my_projects(&self, page: usize) -> ActionOutcome {
        let page_size = self.page_size();
        let Some(start_index) = page.checked_sub(1).and_then(|p| p.checked_mul(page_size)) else {
            debug!(page, "ignoring request for page outside the index range");
            return ActionOutcome::Skipped;
        };
        let Some((account, contract)) = self.connected().await else {
            return ActionOutcome::Skipped;
        };
        match contract.get_projects_by_owner(account, start_index, page_size).await {
            Ok(items) => {
                self.apply_page(ProjectScope::Mine, page, items).await;
                ActionOutcome::Completed
            }
            Err(e) => {
                self.record_failure("Error loading projects", &e).await;
                ActionOutcome::Failed
            }
        }
    }

    pub async fn next_page(&self) -> ActionOutcome {
        let (scope, current, in_range) = {
            let state = self.state.read().await;
            let p = &state.projects;
            (p.scope, p.current_page, p.contains_page(p.current_page.saturating_add(1)))
        };
        if !in_range {
            return ActionOutcome::Skipped;
        }
        self.load_scope(scope, current + 1).await
    }

    pub async fn prev_page(&self) -> ActionOutcome {
        let (scope, current, in_range) = {
            let state = self.state.read().await;
            let p = &state.projects;
            (p.scope, p.current_page, p.current_page > 1 && p.contains_page(p.current_page - 1))
        };
        if !in_range {
            return ActionOutcome::Skipped;
        }
        self.load_scope(scope, current - 1).await
    }

    /// Re-runs the query that filled the current page.
    pub async fn refresh(&self) -> ActionOutcome {
        let (scope, current) = {
            let state = self.state.read().await;
            (state.projects.scope, state.projects.current_page)
        };
        self.load_scope(scope, current).await
    }

    async fn load_scope(&self, scope: ProjectScope, page: usize) -> ActionOutcome {
        match scope {
            ProjectScope::All => self.load_all_projects(page).await,
            ProjectScope::Mine => self.load_my_projects(page).await,
        }
    }

    async fn apply_page(&self, scope: ProjectScope, page: usize, items: Vec<Project>) {
        let total_pages = total_pages_after(page, items.len(), self.page_size());
        info!(page, total_pages, count = items.len(), ?scope, "projects loaded");
        let mut state = self.state.write().await;
        let projects = &mut state.projects;
        projects.items = items;
        projects.current_page = page;
        projects.total_pages = total_pages;
        projects.scope = scope;
    }
}

/// The contract reports no total, so a full page means another may follow.
pub fn total_pages_after(page: usize, returned: usize, page_size: usize) -> usize {
    if returned >= page_size {
        page.saturating_add(1)
    } else {
        page.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_page_opens_the_next_one() {
        assert_eq!(total_pages_after(1, 10, 10), 2);
        assert_eq!(total_pages_after(3, 10, 10), 4);
        assert_eq!(total_pages_after(usize::MAX, 10, 10), usize::MAX);
    }

    #[test]
    fn short_page_is_the_last() {
        assert_eq!(total_pages_after(1, 0, 10), 1);
        assert_eq!(total_pages_after(2, 4, 10), 2);
    }
}
