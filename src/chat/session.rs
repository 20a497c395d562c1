//! Chat session state and the interaction step.
//!
//! A session is an explicit value owned by the caller, not process-wide
//! state: the pipeline takes a mutable session per step, so the core logic
//! is testable without any UI host. One step is strictly blocking - there is
//! at most one agent request in flight per session, and a failure always
//! returns the session to an accepting state.

use crate::agent::SqlAgent;
use crate::chat::parser::SqlResponse;
use crate::models::ChatTurn;
use std::sync::Arc;
use tracing::{debug, warn};

/// Prefix for the assistant turn recorded when the agent call fails.
const ERROR_PREFIX: &str = "⚠️ Policy Query Error";

/// The ordered history of one interactive session. Turns are append-only.
#[derive(Debug, Default, Clone)]
pub struct ChatSession {
    transcript: Vec<ChatTurn>,
}

impl ChatSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full transcript, oldest turn first.
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Number of turns recorded so far.
    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    /// True when no interaction has happened yet.
    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    fn push(&mut self, turn: ChatTurn) {
        self.transcript.push(turn);
    }
}

/// The NL-to-SQL pipeline: a fixed instruction plus the agent to send it to.
pub struct ChatPipeline {
    agent: Arc<dyn SqlAgent>,
    instruction: String,
}

impl ChatPipeline {
    /// Create a pipeline with a rendered system instruction.
    pub fn new(agent: Arc<dyn SqlAgent>, instruction: impl Into<String>) -> Self {
        Self {
            agent,
            instruction: instruction.into(),
        }
    }

    /// The instruction text sent with every request.
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Run one interaction: append the utterance as a user turn, call the
    /// agent, and append exactly one assistant turn whether the call
    /// succeeded or failed. Returns the assistant turn, or `None` for an
    /// empty utterance (in which case the transcript is untouched).
    pub async fn step(&self, session: &mut ChatSession, utterance: &str) -> Option<ChatTurn> {
        if utterance.trim().is_empty() {
            return None;
        }

        session.push(ChatTurn::user(utterance));

        let body = match self.agent.generate(&self.instruction, utterance).await {
            Ok(response) => {
                let parsed = SqlResponse::parse(&response);
                if parsed.is_bare() {
                    debug!("Agent response carried no fenced SQL block");
                }
                parsed.render()
            }
            Err(e) => {
                warn!(error = %e, "Agent request failed");
                format!("{}: {}", ERROR_PREFIX, e)
            }
        };

        let turn = ChatTurn::assistant(body);
        session.push(turn.clone());
        Some(turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AgentError, AgentResult};
    use crate::models::Role;
    use async_trait::async_trait;

    struct FixedAgent(String);

    #[async_trait]
    impl SqlAgent for FixedAgent {
        async fn generate(&self, _instruction: &str, _utterance: &str) -> AgentResult<String> {
            Ok(self.0.clone())
        }
    }

    struct FailingAgent;

    #[async_trait]
    impl SqlAgent for FailingAgent {
        async fn generate(&self, _instruction: &str, _utterance: &str) -> AgentResult<String> {
            Err(AgentError::http("connection refused"))
        }
    }

    fn pipeline(agent: impl SqlAgent + 'static) -> ChatPipeline {
        ChatPipeline::new(Arc::new(agent), "instruction")
    }

    #[tokio::test]
    async fn test_step_appends_two_turns_on_success() {
        let pipeline = pipeline(FixedAgent("```sql\nSELECT 1\n```\nOne.".to_string()));
        let mut session = ChatSession::new();

        let reply = pipeline.step(&mut session, "give me one").await.unwrap();
        assert_eq!(session.len(), 2);
        assert_eq!(session.transcript()[0].role, Role::User);
        assert_eq!(session.transcript()[0].body, "give me one");
        assert_eq!(reply.role, Role::Assistant);
        assert!(reply.body.contains("SELECT 1"));
        assert!(reply.body.contains("One."));
    }

    #[tokio::test]
    async fn test_step_appends_two_turns_on_failure() {
        let pipeline = pipeline(FailingAgent);
        let mut session = ChatSession::new();

        let reply = pipeline.step(&mut session, "anything").await.unwrap();
        assert_eq!(session.len(), 2);
        assert!(reply.body.starts_with("⚠️ Policy Query Error"));
        assert!(reply.body.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_failure_does_not_wedge_the_session() {
        let failing = pipeline(FailingAgent);
        let mut session = ChatSession::new();
        failing.step(&mut session, "first").await.unwrap();

        let working = pipeline(FixedAgent("SELECT 2".to_string()));
        let reply = working.step(&mut session, "second").await.unwrap();
        assert_eq!(session.len(), 4);
        assert!(reply.body.contains("SELECT 2"));
    }

    #[tokio::test]
    async fn test_empty_utterance_is_ignored() {
        let pipeline = pipeline(FixedAgent("SELECT 1".to_string()));
        let mut session = ChatSession::new();

        assert!(pipeline.step(&mut session, "").await.is_none());
        assert!(pipeline.step(&mut session, "   \n").await.is_none());
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_bare_response_is_wrapped() {
        let pipeline = pipeline(FixedAgent("SELECT * FROM policies".to_string()));
        let mut session = ChatSession::new();

        let reply = pipeline.step(&mut session, "all policies").await.unwrap();
        assert_eq!(reply.body, "```sql\nSELECT * FROM policies\n```");
    }
}
