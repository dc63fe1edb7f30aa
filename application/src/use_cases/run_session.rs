//! Run Session use case
//!
//! Drives one question through the participant roster: after every turn the
//! router picks the next speaker until the session ends.

use crate::config::SessionParams;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::participant_gateway::{GatewayError, ParticipantGateway, ParticipantReply};
use crate::ports::progress::{NoSessionProgress, SessionProgressNotifier};
use crate::ports::tabular_store::TabularStore;
use crate::use_cases::execute_query::ExecuteQueryUseCase;
use crate::use_cases::resolve_values::ResolveValuesUseCase;
use council_domain::{
    Attachment, DomainError, EndReason, LimitReason, Message, Participant, QueryDraft, Question,
    Role, Roster, Route, SessionOutcome, ToolRequest, Transcript,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during a session
#[derive(Error, Debug)]
pub enum RunSessionError {
    #[error("Router selected {0}, which cannot be dispatched")]
    UnroutableSpeaker(Role),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Input for the RunSession use case
#[derive(Debug, Clone)]
pub struct RunSessionInput {
    /// The user's question
    pub question: Question,
    /// Session loop parameters
    pub params: SessionParams,
}

impl RunSessionInput {
    pub fn new(question: Question) -> Self {
        Self {
            question,
            params: SessionParams::default(),
        }
    }

    pub fn with_params(mut self, params: SessionParams) -> Self {
        self.params = params;
        self
    }
}

/// Everything a finished session produced
#[derive(Debug, Clone)]
pub struct RunSessionOutput {
    pub outcome: SessionOutcome,
    pub transcript: Transcript,
}

/// Use case for running one council session
pub struct RunSessionUseCase<G: ParticipantGateway + 'static, S: TabularStore + 'static> {
    gateway: Arc<G>,
    store: Arc<S>,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: ParticipantGateway + 'static, S: TabularStore + 'static> RunSessionUseCase<G, S> {
    pub fn new(gateway: Arc<G>, store: Arc<S>) -> Self {
        Self {
            gateway,
            store,
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunSessionInput) -> Result<RunSessionOutput, RunSessionError> {
        self.execute_with_progress(input, &NoSessionProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunSessionInput,
        progress: &dyn SessionProgressNotifier,
    ) -> Result<RunSessionOutput, RunSessionError> {
        let params = &input.params;
        let router = params.router();
        let executor = ExecuteQueryUseCase::new(Arc::clone(&self.store), params.row_cap, params.timeout);
        let resolver =
            ResolveValuesUseCase::new(Arc::clone(&self.store), params.resolver(), params.timeout);

        let roster = Roster::standard();
        let mut transcript =
            Transcript::start(roster.participant(Role::Proxy), input.question.content());
        self.logger
            .log(ConversationEvent::message_appended(transcript.last()));

        info!("Starting session: {}", input.question);

        let end = loop {
            let route = router.next(&transcript);
            debug!("Round {}: {}", transcript.len(), route);
            self.logger
                .log(ConversationEvent::route_decided(transcript.len(), &route));

            let (role, limit) = match route {
                Route::End(reason) => break reason,
                Route::Limit(reason) => (Role::Limiter, Some(reason)),
                Route::Speak(role) => (role, None),
            };
            let round = transcript.len();
            progress.on_turn_start(role, round);

            match (role, limit) {
                (_, Some(reason)) => {
                    self.append(&mut transcript, limiter_message(&roster, reason));
                }
                (Role::Executor, None) => {
                    let message = executor
                        .executor_message(roster.participant(Role::Executor), &transcript)
                        .await;
                    self.append(&mut transcript, message);
                }
                (role, None) if role.is_reasoning() => {
                    self.participant_turn(
                        roster.participant(role),
                        &roster,
                        &mut transcript,
                        &executor,
                        &resolver,
                        params,
                        progress,
                    )
                    .await;
                }
                (role, None) => return Err(RunSessionError::UnroutableSpeaker(role)),
            }

            progress.on_turn_complete(role, round);
        };

        let outcome = SessionOutcome::from_transcript(&transcript, end)?;
        info!(
            "Session finished after {} rounds: {:?}",
            outcome.rounds, outcome.termination
        );
        if end == EndReason::RoundCeiling {
            warn!("Round ceiling of {} reached", params.max_rounds);
        }
        self.logger.log(ConversationEvent::session_finished(&outcome));
        progress.on_session_end(&outcome.termination);

        Ok(RunSessionOutput {
            outcome,
            transcript,
        })
    }

    /// One reasoning turn: a text reply, or a tool call and its result.
    ///
    /// A failed or timed-out call hands the session to the limiter.
    #[allow(clippy::too_many_arguments)]
    async fn participant_turn(
        &self,
        participant: &Participant,
        roster: &Roster,
        transcript: &mut Transcript,
        executor: &ExecuteQueryUseCase<S>,
        resolver: &ResolveValuesUseCase<S>,
        params: &SessionParams,
        progress: &dyn SessionProgressNotifier,
    ) {
        let reply = match tokio::time::timeout(
            params.timeout,
            self.gateway.respond(participant, transcript),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout),
        };

        match reply {
            Ok(ParticipantReply::Text(text)) => {
                let mut message = Message::utterance(participant, text);
                if participant.role == Role::Author {
                    if let Ok(draft) = QueryDraft::parse(message.content()) {
                        message = message.with_attachment(Attachment::Draft(draft));
                    }
                }
                self.append(transcript, message);
            }
            Ok(ParticipantReply::Tool(request)) if participant.may_request_tools => {
                progress.on_tool_invoked(request.kind());
                self.append(transcript, Message::tool_call(participant, &request));

                let output = match &request {
                    ToolRequest::RunQuery { query } => executor.probe(query).await,
                    ToolRequest::FetchDistinctValues {
                        lookup,
                        table,
                        column,
                    } => resolver.tool_output(lookup, table, column).await,
                };
                self.logger
                    .log(ConversationEvent::tool_invoked(&request, &output));
                self.append(
                    transcript,
                    Message::tool_result(participant, request.kind(), output),
                );
            }
            Ok(ParticipantReply::Tool(request)) => {
                warn!(
                    "{} requested {} without tool capability",
                    participant.name,
                    request.kind()
                );
                let reason = LimitReason::ParticipantFailed(participant.role);
                self.append(transcript, limiter_message(roster, reason));
            }
            Err(e) => {
                warn!("{} failed: {}", participant.name, e);
                let reason = LimitReason::ParticipantFailed(participant.role);
                self.append(transcript, limiter_message(roster, reason));
            }
        }
    }

    fn append(&self, transcript: &mut Transcript, message: Message) {
        let appended = transcript.append(message);
        self.logger.log(ConversationEvent::message_appended(appended));
    }
}

fn limiter_message(roster: &Roster, reason: LimitReason) -> Message {
    Message::utterance(
        roster.participant(Role::Limiter),
        format!("limit reached: {}", reason),
    )
    .with_attachment(Attachment::Limit(reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::execute_query::tests::MockStore;
    use async_trait::async_trait;
    use council_domain::outcome::GENERIC_FAILURE;
    use council_domain::{Activity, ResultClassification, Termination, ToolKind};
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;

    // ==================== Test Mocks ====================

    type Scripted = Result<ParticipantReply, GatewayError>;

    /// Gateway replaying a per-role script; an exhausted script fails
    struct ScriptedGateway {
        scripts: Mutex<HashMap<Role, VecDeque<Scripted>>>,
    }

    impl ScriptedGateway {
        fn new() -> Self {
            Self {
                scripts: Mutex::new(HashMap::new()),
            }
        }

        fn push(self, role: Role, reply: Scripted) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .entry(role)
                .or_default()
                .push_back(reply);
            self
        }

        fn say(self, role: Role, text: &str) -> Self {
            self.push(role, Ok(ParticipantReply::Text(text.to_string())))
        }

        fn tool(self, role: Role, request: ToolRequest) -> Self {
            self.push(role, Ok(ParticipantReply::Tool(request)))
        }
    }

    #[async_trait]
    impl ParticipantGateway for ScriptedGateway {
        async fn respond(
            &self,
            participant: &Participant,
            _transcript: &Transcript,
        ) -> Result<ParticipantReply, GatewayError> {
            self.scripts
                .lock()
                .unwrap()
                .get_mut(&participant.role)
                .and_then(|script| script.pop_front())
                .unwrap_or_else(|| Err(GatewayError::Other("No more responses".to_string())))
        }
    }

    struct SlowGateway;

    #[async_trait]
    impl ParticipantGateway for SlowGateway {
        async fn respond(
            &self,
            _participant: &Participant,
            _transcript: &Transcript,
        ) -> Result<ParticipantReply, GatewayError> {
            tokio::time::sleep(Duration::from_secs(600)).await;
            Ok(ParticipantReply::Text("too late".to_string()))
        }
    }

    struct MemoryLogger {
        events: Mutex<Vec<&'static str>>,
    }

    impl ConversationLogger for MemoryLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    // ==================== Helpers ====================

    fn draft(query: &str) -> String {
        format!(
            "user_question: Which units sold most?\ngenerated_sql_query: {}\nchecklist: - order by units\nTERMINATE-AGENT",
            query
        )
    }

    fn store() -> MockStore {
        MockStore::new()
            .with_rows("SELECT Units FROM sales LIMIT 3", 3)
            .with_rows("few", 7)
            .with_rows("zero", 0)
            .with_rows("one", 1)
            .with_rows("many", 40)
            .with_distinct(&["Pune", "Mumbai"])
    }

    fn input() -> RunSessionInput {
        RunSessionInput::new(Question::try_new("Which units sold most?").unwrap())
    }

    async fn run<G: ParticipantGateway + 'static>(
        gateway: G,
        input: RunSessionInput,
    ) -> RunSessionOutput {
        RunSessionUseCase::new(Arc::new(gateway), Arc::new(store()))
            .execute(input)
            .await
            .unwrap()
    }

    fn roles(transcript: &Transcript) -> Vec<Role> {
        transcript.messages().iter().map(|m| m.role()).collect()
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_completed_session() {
        let gateway = ScriptedGateway::new()
            .say(Role::Planner, "- sum units\nTERMINATE-AGENT")
            .tool(
                Role::Author,
                ToolRequest::RunQuery {
                    query: "SELECT Units FROM sales LIMIT 3".to_string(),
                },
            )
            .say(Role::Author, &draft("few"))
            .say(Role::Critic, "Score 1. ALL-GOOD")
            .say(Role::Summarizer, "Units peak at six.\nALL-GOOD-COMPLETED");

        let output = run(gateway, input()).await;
        let outcome = &output.outcome;
        assert_eq!(outcome.termination, Termination::Completed);
        assert_eq!(outcome.classification, Some(ResultClassification::Bounded));
        assert_eq!(outcome.query.as_deref(), Some("few"));
        assert_eq!(outcome.narrative, "Units peak at six.");
        assert_eq!(outcome.rounds, 8);

        assert_eq!(
            roles(&output.transcript),
            vec![
                Role::Proxy,
                Role::Planner,
                Role::Author,
                Role::Author,
                Role::Author,
                Role::Critic,
                Role::Executor,
                Role::Summarizer,
            ]
        );
        let probe = &output.transcript.messages()[3];
        assert_eq!(probe.activity(), Activity::ToolResult(ToolKind::RunQuery));
        assert!(probe.content().starts_with("[{\"Units\""));
        assert!(output.transcript.messages()[4].draft().is_some());
    }

    #[tokio::test]
    async fn test_clarification_ends_without_query() {
        let gateway =
            ScriptedGateway::new().say(Role::Planner, "TERMINATE-FLOW: please specify a region");

        let outcome = run(gateway, input()).await.outcome;
        assert_eq!(
            outcome.termination,
            Termination::Limited(LimitReason::ClarificationNeeded)
        );
        assert_eq!(outcome.classification, None);
        assert_eq!(outcome.query, None);
        assert_eq!(outcome.narrative, "please specify a region");
    }

    #[tokio::test]
    async fn test_empty_result_reaches_limiter() {
        let gateway = ScriptedGateway::new()
            .say(Role::Planner, "TERMINATE-AGENT")
            .say(Role::Author, &draft("zero"))
            .say(Role::Critic, "ALL-GOOD");

        let output = run(gateway, input()).await;
        let messages = output.transcript.messages();
        assert_eq!(messages[messages.len() - 2].role(), Role::Executor);
        assert_eq!(
            output.transcript.last().limit_reason(),
            Some(&LimitReason::ResultEmpty)
        );
        assert_eq!(
            output.outcome.classification,
            Some(ResultClassification::Empty)
        );
        assert_eq!(output.outcome.narrative, GENERIC_FAILURE);
        assert!(
            output
                .outcome
                .narrative
                .contains("could not generate a correct query")
        );
    }

    #[tokio::test]
    async fn test_store_fault_reaches_limiter_as_empty() {
        let gateway = ScriptedGateway::new()
            .say(Role::Planner, "TERMINATE-AGENT")
            .say(Role::Author, &draft("SELECT nothing FROM nowhere"))
            .say(Role::Critic, "ALL-GOOD");

        let outcome = run(gateway, input()).await.outcome;
        assert_eq!(
            outcome.termination,
            Termination::Limited(LimitReason::ResultEmpty)
        );
    }

    #[tokio::test]
    async fn test_overflow_and_singleton() {
        for (query, reason) in [
            ("many", LimitReason::ResultOverflow),
            ("one", LimitReason::ResultSingleton),
        ] {
            let gateway = ScriptedGateway::new()
                .say(Role::Planner, "TERMINATE-AGENT")
                .say(Role::Author, &draft(query))
                .say(Role::Critic, "ALL-GOOD");
            let outcome = run(gateway, input()).await.outcome;
            assert_eq!(outcome.termination, Termination::Limited(reason), "{query}");
        }
    }

    #[tokio::test]
    async fn test_author_query_cap() {
        let mut gateway = ScriptedGateway::new().say(Role::Planner, "TERMINATE-AGENT");
        for i in 0..5 {
            gateway = gateway.tool(
                Role::Author,
                ToolRequest::RunQuery {
                    query: format!("SELECT {i}"),
                },
            );
        }

        let output = run(gateway, input()).await;
        assert_eq!(
            output.outcome.termination,
            Termination::Limited(LimitReason::AuthorRetriesExhausted)
        );
        // proxy, planner, 5 x (call, result), limiter
        assert_eq!(output.outcome.rounds, 13);
    }

    #[tokio::test]
    async fn test_critic_rejection_cap() {
        let mut gateway = ScriptedGateway::new().say(Role::Planner, "TERMINATE-AGENT");
        for _ in 0..3 {
            gateway = gateway
                .say(Role::Author, &draft("few"))
                .say(Role::Critic, "The filter is missing. Score 0");
        }

        let outcome = run(gateway, input()).await.outcome;
        assert_eq!(
            outcome.termination,
            Termination::Limited(LimitReason::CriticRejectionsExhausted)
        );
        assert_eq!(outcome.query.as_deref(), Some("few"));
        assert_eq!(outcome.classification, None);
    }

    #[tokio::test]
    async fn test_distinct_value_tool() {
        let gateway = ScriptedGateway::new()
            .say(Role::Planner, "TERMINATE-AGENT")
            .tool(
                Role::Author,
                ToolRequest::FetchDistinctValues {
                    lookup: "pune city".to_string(),
                    table: "sales".to_string(),
                    column: "City".to_string(),
                },
            );

        let output = run(gateway, input()).await;
        let result = output
            .transcript
            .messages()
            .iter()
            .find(|m| m.activity() == Activity::ToolResult(ToolKind::FetchDistinctValues))
            .unwrap();
        assert_eq!(result.content(), r#"{"City":["Pune","Mumbai"]}"#);
        // the author's script then runs dry
        assert_eq!(
            output.outcome.termination,
            Termination::Limited(LimitReason::ParticipantFailed(Role::Author))
        );
    }

    #[tokio::test]
    async fn test_participant_failure_reaches_limiter() {
        let outcome = run(ScriptedGateway::new(), input()).await.outcome;
        assert_eq!(
            outcome.termination,
            Termination::Limited(LimitReason::ParticipantFailed(Role::Planner))
        );
        assert_eq!(outcome.narrative, GENERIC_FAILURE);
        assert_eq!(outcome.rounds, 2);
    }

    #[tokio::test]
    async fn test_tool_request_without_capability() {
        let gateway = ScriptedGateway::new().tool(
            Role::Planner,
            ToolRequest::RunQuery {
                query: "few".to_string(),
            },
        );
        let outcome = run(gateway, input()).await.outcome;
        assert_eq!(
            outcome.termination,
            Termination::Limited(LimitReason::ParticipantFailed(Role::Planner))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_participant_timeout() {
        let params = SessionParams::default().with_timeout(Duration::from_secs(120));
        let outcome = run(SlowGateway, input().with_params(params)).await.outcome;
        assert_eq!(
            outcome.termination,
            Termination::Limited(LimitReason::ParticipantFailed(Role::Planner))
        );
    }

    #[tokio::test]
    async fn test_round_ceiling() {
        let mut gateway = ScriptedGateway::new();
        for _ in 0..10 {
            gateway = gateway.say(Role::Planner, "still thinking");
        }
        let params = SessionParams::default().with_max_rounds(6);

        let outcome = run(gateway, input().with_params(params)).await.outcome;
        assert_eq!(outcome.termination, Termination::RoundCeiling);
        assert_eq!(outcome.rounds, 6);
        assert_eq!(
            outcome.narrative,
            council_domain::outcome::ROUND_CEILING_NOTICE
        );
    }

    #[tokio::test]
    async fn test_events_are_logged() {
        let logger = Arc::new(MemoryLogger {
            events: Mutex::new(Vec::new()),
        });
        let gateway = ScriptedGateway::new().say(Role::Planner, "TERMINATE-FLOW: which year?");
        RunSessionUseCase::new(Arc::new(gateway), Arc::new(store()))
            .with_logger(logger.clone())
            .execute(input())
            .await
            .unwrap();

        let events = logger.events.lock().unwrap();
        assert_eq!(events.first(), Some(&"message_appended"));
        assert_eq!(events.last(), Some(&"session_finished"));
        assert_eq!(events.iter().filter(|e| **e == "route_decided").count(), 3);
    }
}
