use serde::Deserialize;
use sqa_core::{Service, StageError, Story};

/// One page of `/rest/api/3/search`. Only the fields the pipeline reads are modelled.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub total: Option<u32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Issue {
    pub key: String,
    pub fields: IssueFields,
}

#[derive(Clone, Debug, Deserialize)]
pub struct IssueFields {
    pub summary: String,
}

impl From<Issue> for Story {
    fn from(issue: Issue) -> Self {
        Story {
            id: issue.key,
            summary: issue.fields.summary,
        }
    }
}

impl SearchPage {
    pub fn into_stories(self) -> Vec<Story> {
        self.issues.into_iter().map(Story::from).collect()
    }
}

/// Maps a raw tracker response to a page. Non-2xx yields a request error carrying status and body.
pub fn parse_search_response(status: u16, body: &str) -> Result<SearchPage, StageError> {
    if !(200..300).contains(&status) {
        return Err(StageError::Request {
            service: Service::Tracker,
            status,
            body: body.to_string(),
        });
    }
    serde_json::from_str(body).map_err(|e| StageError::DataShape {
        service: Service::Tracker,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqa_core::ErrorCategory;

    #[test]
    fn maps_issues_in_response_order() {
        let body = r#"{
            "startAt": 0, "maxResults": 50, "total": 3,
            "issues": [
                {"key": "QA-9", "fields": {"summary": "newest"}},
                {"key": "QA-2", "fields": {"summary": "middle"}},
                {"key": "QA-5", "fields": {"summary": "oldest"}}
            ]
        }"#;
        let stories = parse_search_response(200, body).unwrap().into_stories();
        let ids: Vec<_> = stories.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["QA-9", "QA-2", "QA-5"]);
        assert_eq!(stories[1].summary, "middle");
    }

    #[test]
    fn missing_issues_is_empty() {
        let page = parse_search_response(200, "{}").unwrap();
        assert!(page.issues.is_empty());
        assert_eq!(page.total, None);
    }

    #[test]
    fn unauthorized_is_request_error() {
        let err = parse_search_response(401, "Client must be authenticated").unwrap_err();
        match &err {
            StageError::Request { status, body, .. } => {
                assert_eq!(*status, 401);
                assert_eq!(body, "Client must be authenticated");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.category(), ErrorCategory::Tracker);
    }

    #[test]
    fn missing_summary_is_data_shape() {
        let body = r#"{"issues": [{"key": "QA-1", "fields": {}}]}"#;
        let err = parse_search_response(200, body).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::DataShape);
    }

    #[test]
    fn non_json_body_is_data_shape() {
        let err = parse_search_response(200, "<html>login</html>").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::DataShape);
    }
}
