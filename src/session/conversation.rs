use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationEntry {
    question: String,
    pub answer: String,
}

impl ConversationEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }
}

/// Question/answer log, newest entry first.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    entries: VecDeque<ConversationEntry>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts at the front and returns the new entry.
    pub fn append(
        &mut self,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> &ConversationEntry {
        self.entries
            .push_front(ConversationEntry::new(question, answer));
        &self.entries[0]
    }

    pub fn newest(&self) -> Option<&ConversationEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversationEntry> {
        self.entries.iter()
    }

    /// Answers may be rewritten in place; questions stay as asked.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ConversationEntry> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
