//! Project checklist, rebuilt on every dynamic-filter response

use std::collections::HashSet;

use crate::wire::ProjectEntry;

/// Placeholder shown when the filters match no project
pub const NO_MATCHING_PROJECTS: &str = "No matching projects";

/// Checklist of projects matching the current facet selection
#[derive(Debug, Clone, Default)]
pub struct ProjectList {
    projects: Vec<ProjectEntry>,
    checked: HashSet<String>,
    search: String,
}

impl ProjectList {
    pub fn new(projects: Vec<ProjectEntry>) -> Self {
        let mut list = Self::default();
        list.rebuild(projects);
        list
    }

    /// Full replace; every project starts checked
    pub fn rebuild(&mut self, projects: Vec<ProjectEntry>) {
        self.checked = projects.iter().map(|p| p.id.clone()).collect();
        self.projects = projects;
    }

    pub fn projects(&self) -> &[ProjectEntry] {
        &self.projects
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn is_checked(&self, id: &str) -> bool {
        self.checked.contains(id)
    }

    pub fn set_checked(&mut self, id: &str, checked: bool) -> bool {
        if !self.projects.iter().any(|p| p.id == id) {
            return false;
        }
        if checked {
            self.checked.insert(id.to_string())
        } else {
            self.checked.remove(id)
        }
    }

    /// Checked ids in list order
    pub fn checked_ids(&self) -> Vec<String> {
        self.projects
            .iter()
            .filter(|p| self.checked.contains(&p.id))
            .map(|p| p.id.clone())
            .collect()
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Projects whose name contains the search text (case-insensitive)
    pub fn visible(&self) -> impl Iterator<Item = &ProjectEntry> {
        let needle = self.search.to_lowercase();
        self.projects
            .iter()
            .filter(move |p| needle.is_empty() || p.project_name.to_lowercase().contains(&needle))
    }

    /// Select-all applies to the projects currently visible only
    pub fn set_all_visible(&mut self, checked: bool) {
        let visible: Vec<String> = self.visible().map(|p| p.id.clone()).collect();
        for id in visible {
            if checked {
                self.checked.insert(id);
            } else {
                self.checked.remove(&id);
            }
        }
    }

    /// Whether the select-all box should read checked
    pub fn all_visible_checked(&self) -> bool {
        let mut visible = self.visible().peekable();
        visible.peek().is_some() && visible.all(|p| self.checked.contains(&p.id))
    }
}
