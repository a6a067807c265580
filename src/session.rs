//! Chat session state.
//!
//! An explicit state object for one open chat: its title, its messages, the
//! pending highlight action, and the pending uploaded file. Incoming
//! assistant messages are cleaned of their title block here; outgoing user
//! messages are assembled here.

use crate::annotation::{
    AnnotatedMessage, Annotation, AnnotationTask, MessageRef, read_annotated_message_with,
};
use crate::compose::compose_outgoing;
use crate::dispatch::payload::RagItemPayload;
use crate::error::{Error, Result};
use crate::extract::extract_title_with;
use crate::parser::Parser;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Title of a chat the assistant has not named yet.
pub const DEFAULT_TITLE: &str = "New Chat";

/// Message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The user.
    User,
    /// The assistant.
    Assistant,
}

/// A message in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Session-local id.
    pub id: i64,
    /// Author.
    pub role: Role,
    /// Annotated content.
    pub content: String,
}

/// Pending highlight action chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTask {
    /// Tag or Explain.
    pub action: AnnotationTask,
    /// Highlighted text.
    pub selected_content: String,
    /// Full text of the highlighted message.
    pub parent_message: String,
    /// Id of the highlighted message.
    pub message_id: i64,
}

/// State of one open chat.
#[derive(Debug, Clone)]
pub struct ChatSession {
    chat_id: Option<i64>,
    title: String,
    messages: Vec<ChatMessage>,
    active_task: Option<ActiveTask>,
    rag_item: Option<RagItemPayload>,
    parser: Parser,
    next_id: i64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(Parser::new())
    }
}

impl ChatSession {
    /// Creates an empty session.
    #[must_use]
    pub fn new(parser: Parser) -> Self {
        Self {
            chat_id: None,
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            active_task: None,
            rag_item: None,
            parser,
            next_id: 1,
        }
    }

    /// Sets the backend chat id.
    #[must_use]
    pub const fn with_chat_id(mut self, chat_id: i64) -> Self {
        self.chat_id = Some(chat_id);
        self
    }

    /// Backend chat id, once known.
    #[must_use]
    pub const fn chat_id(&self) -> Option<i64> {
        self.chat_id
    }

    /// Current title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Messages in arrival order.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Pending highlight action.
    #[must_use]
    pub const fn active_task(&self) -> Option<&ActiveTask> {
        self.active_task.as_ref()
    }

    /// Pending uploaded file.
    #[must_use]
    pub const fn rag_item(&self) -> Option<&RagItemPayload> {
        self.rag_item.as_ref()
    }

    /// Looks up a message by id.
    #[must_use]
    pub fn message(&self, id: i64) -> Option<&ChatMessage> {
        self.messages.iter().find(|message| message.id == id)
    }

    fn push(&mut self, role: Role, content: String) -> &ChatMessage {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage { id, role, content });
        &self.messages[self.messages.len() - 1]
    }

    /// Records an assistant message.
    ///
    /// A `title` block renames the chat and is removed from the stored
    /// content.
    pub fn receive_assistant(&mut self, content: &str) -> &ChatMessage {
        let extraction = extract_title_with(&self.parser, content);
        if let Some(title) = extraction.title {
            debug!(title = %title, "chat renamed");
            self.title = title;
        }
        self.push(Role::Assistant, extraction.cleaned)
    }

    /// Starts a highlight action on part of an existing message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the message does not exist or the
    /// selection is blank.
    pub fn select_text(&mut self, action: AnnotationTask, message_id: i64, selected: &str) -> Result<()> {
        let selected = selected.trim();
        if selected.is_empty() {
            return Err(Error::InvalidState {
                message: "empty selection".to_string(),
            });
        }
        let parent = self.message(message_id).ok_or_else(|| Error::InvalidState {
            message: format!("no message with id {message_id}"),
        })?;

        self.active_task = Some(ActiveTask {
            action,
            selected_content: selected.to_string(),
            parent_message: parent.content.clone(),
            message_id,
        });
        Ok(())
    }

    /// Attaches an uploaded file to the next outgoing message.
    pub fn attach_rag_item(&mut self, item: RagItemPayload) {
        self.rag_item = Some(item);
    }

    /// Drops the pending highlight action.
    pub fn clear_action(&mut self) {
        self.active_task = None;
    }

    /// Assembles the next outgoing message from the pending state and the
    /// typed text, then clears the pending state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if there is nothing to send, or a
    /// block error if a block cannot be written.
    pub fn prepare_outgoing(&mut self, message: &str) -> Result<String> {
        if message.trim().is_empty() && self.active_task.is_none() && self.rag_item.is_none() {
            return Err(Error::InvalidState {
                message: "nothing to send".to_string(),
            });
        }

        let annotation = self.active_task.as_ref().map(|task| Annotation {
            task: task.action,
            specific_part: task.selected_content.clone(),
            complete_message: task.parent_message.clone(),
            parent_message_id: Some(MessageRef::Id(task.message_id)),
        });
        let outgoing = compose_outgoing(message, self.rag_item.as_ref(), annotation.as_ref())?;

        self.active_task = None;
        self.rag_item = None;
        Ok(outgoing)
    }

    /// Assembles and records a user message.
    ///
    /// # Errors
    ///
    /// See [`ChatSession::prepare_outgoing`].
    pub fn send(&mut self, message: &str) -> Result<&ChatMessage> {
        let outgoing = self.prepare_outgoing(message)?;
        Ok(self.push(Role::User, outgoing))
    }

    /// Reads back a user message with its annotation lifted out.
    #[must_use]
    pub fn annotated(&self, id: i64) -> Option<AnnotatedMessage> {
        self.message(id)
            .filter(|message| message.role == Role::User)
            .map(|message| read_annotated_message_with(&self.parser, &message.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assistant_title_renames_chat() {
        let mut session = ChatSession::default().with_chat_id(9);
        assert_eq!(session.title(), DEFAULT_TITLE);

        let message = session
            .receive_assistant(r#"[BLOCK:{"type":"title","lang":"eng"}]Borrowing[/BLOCK] Sure."#)
            .clone();
        assert_eq!(message.content, "Sure.");
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(session.title(), "Borrowing");
        assert_eq!(session.chat_id(), Some(9));
    }

    #[test]
    fn test_title_kept_without_block() {
        let mut session = ChatSession::default();
        session.receive_assistant("no title here");
        assert_eq!(session.title(), DEFAULT_TITLE);
    }

    #[test]
    fn test_select_unknown_message() {
        let mut session = ChatSession::default();
        let err = session.select_text(AnnotationTask::Tag, 5, "x").unwrap_err();
        assert!(matches!(err, Error::InvalidState { .. }));
    }

    #[test]
    fn test_send_with_annotation_round_trip() {
        let mut session = ChatSession::default();
        let id = session.receive_assistant("Lifetimes bound references.").id;
        session
            .select_text(AnnotationTask::Explain, id, "bound references")
            .unwrap();

        let sent_id = session.send("why?").unwrap().id;
        assert!(session.active_task().is_none());

        let read = session.annotated(sent_id).unwrap();
        let annotation = read.annotation.unwrap();
        assert_eq!(annotation.task, AnnotationTask::Explain);
        assert_eq!(annotation.complete_message, "Lifetimes bound references.");
        assert_eq!(annotation.parent_message_id, Some(MessageRef::Id(id)));
        assert_eq!(read.indicator.as_deref(), Some("Explained: bound references"));
        assert_eq!(read.segments[0].content, "why?");
    }

    #[test]
    fn test_send_with_rag_item() {
        let mut session = ChatSession::default();
        session.attach_rag_item(RagItemPayload {
            filename: "a.pdf".to_string(),
            extension: "application/pdf".to_string(),
            title: "a".to_string(),
        });
        let outgoing = session.prepare_outgoing("summarize").unwrap();
        assert!(outgoing.starts_with(r#"[BLOCK:{"type":"RAGItem","lang":"null"}]"#));
        assert!(outgoing.ends_with("summarize"));
        assert!(session.rag_item().is_none());
    }

    #[test]
    fn test_nothing_to_send() {
        let mut session = ChatSession::default();
        assert!(session.prepare_outgoing("   ").is_err());
    }

    #[test]
    fn test_clear_action() {
        let mut session = ChatSession::default();
        let id = session.receive_assistant("text").id;
        session.select_text(AnnotationTask::Tag, id, "text").unwrap();
        session.clear_action();
        assert!(session.active_task().is_none());
        assert_eq!(session.prepare_outgoing("hi").unwrap(), "hi");
    }
}
