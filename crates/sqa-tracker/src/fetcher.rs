use async_trait::async_trait;
use sqa_core::{StageError, Story, StoryFetcher};
use tracing::{info, warn};

use crate::client::JiraClient;

/// Fetches stories with a single JQL search. Pagination is opt-in.
pub struct JiraStoryFetcher {
    client: JiraClient,
    jql: String,
    paginate: bool,
    max_pages: u32,
}

impl JiraStoryFetcher {
    pub fn new(client: JiraClient, jql: impl Into<String>) -> Self {
        Self {
            client,
            jql: jql.into(),
            paginate: false,
            max_pages: 1,
        }
    }

    /// Follow `startAt`/`total` for at most `max_pages` requests.
    pub fn with_pagination(mut self, max_pages: u32) -> Self {
        self.paginate = true;
        self.max_pages = max_pages.max(1);
        self
    }
}

#[async_trait]
impl StoryFetcher for JiraStoryFetcher {
    async fn fetch_stories(&self) -> Result<Vec<Story>, StageError> {
        let first = self.client.search(&self.jql, None).await?;
        let total = first.total.map(|t| t as usize);
        let mut stories = first.into_stories();

        if self.paginate {
            let mut pages = 1;
            while let Some(total) = total {
                if stories.len() >= total {
                    break;
                }
                if pages >= self.max_pages {
                    warn!("stopping after {pages} pages with {} of {total} issues read", stories.len());
                    break;
                }
                let page = self.client.search(&self.jql, Some(stories.len() as u32)).await?;
                if page.issues.is_empty() {
                    break;
                }
                stories.extend(page.into_stories());
                pages += 1;
            }
        } else if let Some(total) = total {
            if total > stories.len() {
                warn!("tracker reports {total} issues but only the first {} were fetched", stories.len());
            }
        }

        info!("fetched {} user stories", stories.len());
        Ok(stories)
    }
}
