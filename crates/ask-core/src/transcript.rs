//! Transcript controller.
//!
//! Owns the question/answer exchanges of a session and the text the user is
//! currently typing. The lifecycle of one exchange is
//! `Pending -> Resolved | Failed`. With [`AnswerRouting::Exchange`] it moves
//! exactly once; with [`AnswerRouting::LastExchange`] every settle rewrites
//! the newest answer.
//!
//! The controller never performs I/O itself. [`Controller::submit`] returns a
//! [`Query`] describing the outbound call; the caller runs it through [`ask`]
//! (possibly concurrently with other queries) and hands the resulting
//! [`Settled`] back to [`Controller::settle`].

use serde::{Deserialize, Serialize};

use crate::providers::{AnswerProvider, ProviderResult};

/// Answer text shown while a call is in flight.
pub const PENDING_PLACEHOLDER: &str = "⏳ Thinking...";

/// Answer text shown when a call fails, whatever the cause.
pub const ERROR_SENTINEL: &str =
    "❌ Something went wrong. Please check your API key or model name.";

/// Stable identity of an exchange, assigned in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExchangeId(pub u64);

impl std::fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// State of an exchange's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Pending,
    Resolved(String),
    Failed,
}

impl Answer {
    pub fn is_pending(&self) -> bool {
        matches!(self, Answer::Pending)
    }

    /// Text to display for this answer.
    pub fn text(&self) -> &str {
        match self {
            Answer::Pending => PENDING_PLACEHOLDER,
            Answer::Resolved(text) => text,
            Answer::Failed => ERROR_SENTINEL,
        }
    }
}

/// One question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    id: ExchangeId,
    question: String,
    answer: Answer,
}

impl Exchange {
    pub fn id(&self) -> ExchangeId {
        self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &Answer {
        &self.answer
    }
}

/// Which exchange a settled call is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerRouting {
    /// The exchange that issued the call.
    #[default]
    Exchange,
    /// Whatever exchange is newest when the call settles, overwriting any
    /// answer already there. With overlapping calls an early answer can land
    /// on a later question, and the last call to finish wins.
    LastExchange,
}

/// Ordered, append-only list of exchanges.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    exchanges: Vec<Exchange>,
    next_id: u64,
}

impl Transcript {
    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn last(&self) -> Option<&Exchange> {
        self.exchanges.last()
    }

    pub fn get(&self, id: ExchangeId) -> Option<&Exchange> {
        self.position(id).map(|idx| &self.exchanges[idx])
    }

    /// Number of exchanges still waiting for an answer.
    pub fn pending_count(&self) -> usize {
        self.exchanges
            .iter()
            .filter(|exchange| exchange.answer.is_pending())
            .count()
    }

    fn append(&mut self, question: String) -> ExchangeId {
        let id = ExchangeId(self.next_id);
        self.next_id += 1;
        self.exchanges.push(Exchange {
            id,
            question,
            answer: Answer::Pending,
        });
        id
    }

    // Ids are strictly increasing in push order, so the vec is sorted by id.
    fn position(&self, id: ExchangeId) -> Option<usize> {
        self.exchanges
            .binary_search_by_key(&id, |exchange| exchange.id)
            .ok()
    }
}

/// An outbound call the controller wants made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Exchange created for this question.
    pub exchange: ExchangeId,
    /// Question text, exactly as typed.
    pub prompt: String,
}

/// Result of running a [`Query`].
#[derive(Debug, Clone)]
pub struct Settled {
    pub exchange: ExchangeId,
    pub outcome: ProviderResult<String>,
}

/// Runs a query against the provider. One call, no retry.
pub async fn ask(provider: &dyn AnswerProvider, query: Query) -> Settled {
    let outcome = provider.generate(&query.prompt).await;
    Settled {
        exchange: query.exchange,
        outcome,
    }
}

/// Transcript plus the input line that feeds it.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    input: String,
    transcript: Transcript,
    routing: AnswerRouting,
}

impl Controller {
    pub fn new(routing: AnswerRouting) -> Self {
        Self {
            routing,
            ..Self::default()
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Mutable access to the input line, for keystroke editing.
    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn routing(&self) -> AnswerRouting {
        self.routing
    }

    /// Commits the current input as a new question.
    ///
    /// Blank input (empty or whitespace only) is ignored and left in place.
    /// Otherwise the input is cleared, a pending exchange is appended and the
    /// query to run is returned.
    pub fn submit(&mut self) -> Option<Query> {
        if self.input.trim().is_empty() {
            return None;
        }

        let prompt = std::mem::take(&mut self.input);
        let exchange = self.transcript.append(prompt.clone());
        tracing::debug!(%exchange, chars = prompt.chars().count(), "question submitted");

        Some(Query { exchange, prompt })
    }

    /// Applies a finished call to the transcript.
    ///
    /// Returns the id of the exchange that changed, or `None` when there is
    /// no target (or, with [`AnswerRouting::Exchange`], it is already settled).
    pub fn settle(&mut self, settled: Settled) -> Option<ExchangeId> {
        let Settled { exchange, outcome } = settled;

        let target = match self.routing {
            AnswerRouting::Exchange => self.transcript.position(exchange),
            AnswerRouting::LastExchange => self.transcript.len().checked_sub(1),
        };

        let answer = match outcome {
            Ok(text) => Answer::Resolved(text),
            Err(e) => {
                tracing::error!(
                    %exchange,
                    kind = %e.kind,
                    error = %e.message,
                    "answer retrieval failed"
                );
                Answer::Failed
            }
        };

        let Some(slot) = target.and_then(|idx| self.transcript.exchanges.get_mut(idx)) else {
            tracing::warn!(%exchange, "settled call has no matching exchange");
            return None;
        };

        // Positional routing overwrites whatever the newest exchange shows, so
        // the last call to finish wins there.
        if self.routing == AnswerRouting::Exchange && !slot.answer.is_pending() {
            tracing::warn!(
                %exchange,
                target = %slot.id,
                "exchange already settled, dropping answer"
            );
            return None;
        }

        if slot.id != exchange {
            tracing::warn!(%exchange, target = %slot.id, "answer routed to newest exchange");
        }

        tracing::debug!(exchange = %slot.id, failed = matches!(answer, Answer::Failed), "exchange settled");
        slot.answer = answer;
        Some(slot.id)
    }
}
