/// Issue type queried when none is configured.
pub const DEFAULT_ISSUE_TYPE: &str = "Story";

/// Newest-first query for all issues of one type in a project.
pub fn story_query(project_key: &str, issue_type: &str) -> String {
    format!("project={project_key} AND issuetype={issue_type} ORDER BY created DESC")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_story_query() {
        assert_eq!(
            story_query("QA", DEFAULT_ISSUE_TYPE),
            "project=QA AND issuetype=Story ORDER BY created DESC"
        );
    }
}
