//! Task analyzer
//!
//! Takes a free-text task description (typed in or uploaded as a file) and
//! asks the model to break it into dated subtasks under one parent label.
//! The proposals are transient; nothing is persisted until the user
//! confirms them.

mod llm;
pub mod parser;

pub use llm::{CompletionClient, OpenAiClient};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::Error;

/// A subtask proposed by the analyzer, not yet saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedSubtask {
    /// 1-based position as a string; assigned by the parser, optional on
    /// the way back in from clients
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    /// Parent task label shared by all subtasks of one analysis
    pub parent: String,
}

pub struct TaskAnalyzer {
    client: Arc<dyn CompletionClient>,
}

impl TaskAnalyzer {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Arc::new(OpenAiClient::new(config)),
        }
    }

    pub fn with_client(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Decompose a task description into proposed subtasks.
    ///
    /// When both a typed description and a file are supplied, the file
    /// content wins. Whitespace-only input counts as empty.
    pub async fn decompose(
        &self,
        text: Option<&str>,
        file_content: Option<&str>,
    ) -> Result<Vec<ProposedSubtask>, Error> {
        let input = file_content
            .or(text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(Error::EmptyInput)?;

        let response = self.client.complete(&build_prompt(input)).await?;
        let today = Utc::now().date_naive();
        let subtasks = parser::parse_subtasks(&response, today);

        if subtasks.is_empty() {
            return Err(Error::NoSubtasksExtracted);
        }

        tracing::debug!(count = subtasks.len(), "extracted subtasks");
        Ok(subtasks)
    }
}

fn build_prompt(task: &str) -> String {
    format!(
        r#"Break down the following task into subtasks with specific dates. You must respond with ONLY a valid JSON array, nothing else. No explanations, no markdown, just the JSON.

Task: {task}

Required JSON format:
[
  {{
    "name": "Write the introduction section",
    "date": "2025-04-20",
    "parent": "Final Project Report"
  }},
  {{
    "name": "Document the implementation details",
    "date": "2025-04-22",
    "parent": "Final Project Report"
  }}
]

Remember:
1. Respond with ONLY the JSON array
2. Use double quotes for all strings
3. Follow the exact format shown above
4. Include at least 3 subtasks
5. Dates must be in YYYY-MM-DD format
6. Keep all subtasks under the same parent task
7. When setting dates, consider:
   - Task complexity (how difficult the task is)
   - Time requirements (how long the task will take)
   - Dependencies (tasks that need to be completed before others)
   - Realistic workload (don't schedule too many tasks on the same day)
8. Make dates realistic and sequential
9. Ensure each task has enough time allocated based on its complexity
10. Start with the most complex or time-consuming tasks first"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    struct CannedClient {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedClient {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for CannedClient {
        async fn complete(&self, prompt: &str) -> Result<String, Error> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    struct FailingClient;

    #[async_trait]
    impl CompletionClient for FailingClient {
        async fn complete(&self, _prompt: &str) -> Result<String, Error> {
            Err(Error::ModelUnavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn empty_input_is_rejected_without_calling_the_model() {
        let client = Arc::new(CannedClient::new("[]"));
        let analyzer = TaskAnalyzer::with_client(client.clone());

        let err = analyzer.decompose(None, None).await.unwrap_err();
        assert!(matches!(err, Error::EmptyInput));

        let err = analyzer.decompose(Some("   "), None).await.unwrap_err();
        assert!(matches!(err, Error::EmptyInput));

        assert!(client.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_content_takes_precedence_over_text() {
        let reply = r#"[{"name": "Step", "date": "2099-01-01", "parent": "P"}]"#;
        let client = Arc::new(CannedClient::new(reply));
        let analyzer = TaskAnalyzer::with_client(client.clone());

        analyzer
            .decompose(Some("typed task"), Some("uploaded task"))
            .await
            .unwrap();

        let prompts = client.prompts.lock().unwrap();
        assert!(prompts[0].contains("uploaded task"));
        assert!(!prompts[0].contains("typed task"));
    }

    #[tokio::test]
    async fn valid_reply_produces_subtasks() {
        let reply = r#"[
            {"name": "Research venues", "date": "2099-06-01", "parent": "Plan offsite"},
            {"name": "Book venue", "date": "2099-06-03", "parent": "Plan offsite"}
        ]"#;
        let analyzer = TaskAnalyzer::with_client(Arc::new(CannedClient::new(reply)));

        let tasks = analyzer.decompose(Some("plan offsite"), None).await.unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].name, "Research venues");
        assert_eq!(tasks[0].parent, "Plan offsite");
    }

    #[tokio::test]
    async fn unusable_reply_maps_to_no_subtasks_extracted() {
        let analyzer = TaskAnalyzer::with_client(Arc::new(CannedClient::new("[]")));
        let err = analyzer.decompose(Some("task"), None).await.unwrap_err();
        assert!(matches!(err, Error::NoSubtasksExtracted));
    }

    #[test]
    fn proposal_deserializes_without_an_id() {
        let subtask: ProposedSubtask = serde_json::from_value(serde_json::json!({
            "name": "Draft outline",
            "date": "2099-04-01",
            "parent": "Write report",
        }))
        .expect("id is optional on incoming proposals");

        assert_eq!(subtask.id, "");
        assert_eq!(subtask.name, "Draft outline");
    }

    #[tokio::test]
    async fn model_failure_propagates() {
        let analyzer = TaskAnalyzer::with_client(Arc::new(FailingClient));
        let err = analyzer.decompose(Some("task"), None).await.unwrap_err();
        assert!(matches!(err, Error::ModelUnavailable(_)));
    }
}
