//! The conversation-routing state machine

use super::governor::{RetryGovernor, RetryLimits};
use super::route::{EndReason, LimitReason, Route};
use super::token::ControlToken;
use crate::conversation::{Message, Role, Transcript};
use crate::result::ResultClassification;

/// Hard backstop on transcript length
pub const DEFAULT_MAX_ROUNDS: usize = 50;

/// Decides who speaks next.
///
/// [`ConversationRouter::next`] is a pure function of the transcript: the
/// last message's role and content plus counts derived from history.
#[derive(Debug, Clone, Copy)]
pub struct ConversationRouter {
    max_rounds: usize,
    governor: RetryGovernor,
}

impl Default for ConversationRouter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ROUNDS, RetryLimits::default())
    }
}

impl ConversationRouter {
    pub fn new(max_rounds: usize, limits: RetryLimits) -> Self {
        Self {
            max_rounds,
            governor: RetryGovernor::new(limits),
        }
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    pub fn governor(&self) -> &RetryGovernor {
        &self.governor
    }

    /// Pick the next route for `transcript`.
    ///
    /// Once the transcript holds `max_rounds` messages the session ends,
    /// unless the table below already ends it for a more specific reason.
    pub fn next(&self, transcript: &Transcript) -> Route {
        let route = self.transition(transcript);
        if !route.is_end() && transcript.len() >= self.max_rounds {
            return Route::End(EndReason::RoundCeiling);
        }
        route
    }

    fn transition(&self, transcript: &Transcript) -> Route {
        let last = transcript.last();
        match last.role() {
            Role::Proxy => {
                if transcript.len() == 1 {
                    Route::Speak(Role::Planner)
                } else if last.is_tool_result() {
                    Route::Speak(Role::Executor)
                } else {
                    Route::Speak(Role::Author)
                }
            }
            Role::Planner => {
                let tokens = [ControlToken::TerminateAgent, ControlToken::TerminateFlow];
                match spoken_token(last, &tokens) {
                    Some(ControlToken::TerminateAgent) => Route::Speak(Role::Author),
                    Some(_) => Route::Limit(LimitReason::ClarificationNeeded),
                    None => Route::Speak(Role::Planner),
                }
            }
            Role::Author => {
                if spoken_token(last, &[ControlToken::TerminateAgent]).is_some() {
                    Route::Speak(Role::Critic)
                } else if self.governor.author_exhausted(transcript) {
                    Route::Limit(LimitReason::AuthorRetriesExhausted)
                } else {
                    Route::Speak(Role::Author)
                }
            }
            Role::Critic => {
                if spoken_token(last, &[ControlToken::AllGood]).is_some() {
                    Route::Speak(Role::Executor)
                } else if self.governor.critic_exhausted(transcript) {
                    Route::Limit(LimitReason::CriticRejectionsExhausted)
                } else {
                    Route::Speak(Role::Author)
                }
            }
            Role::Executor => match executor_classification(last) {
                Some(classification) => match LimitReason::for_classification(classification) {
                    Some(reason) => Route::Limit(reason),
                    None => Route::Speak(Role::Summarizer),
                },
                None => Route::Limit(LimitReason::ExtractionFailed),
            },
            Role::Summarizer => {
                if spoken_token(last, &[ControlToken::AllGoodCompleted]).is_some() {
                    Route::End(EndReason::Completed)
                } else {
                    Route::Limit(LimitReason::SummaryIncomplete)
                }
            }
            Role::Limiter => Route::End(EndReason::Limited),
        }
    }
}

/// Tokens are only read from ordinary utterances, never from tool output
fn spoken_token(message: &Message, candidates: &[ControlToken]) -> Option<ControlToken> {
    if !message.is_utterance() {
        return None;
    }
    ControlToken::first_in(message.content(), candidates)
}

fn executor_classification(message: &Message) -> Option<ResultClassification> {
    message
        .query_result()
        .map(|execution| execution.classification)
        .or_else(|| ResultClassification::from_message_text(message.content()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{Attachment, Roster, ToolKind, ToolRequest};
    use crate::result::{Cell, QueryExecution, Table};

    struct Script {
        roster: Roster,
        transcript: Transcript,
    }

    impl Script {
        fn new(question: &str) -> Self {
            let roster = Roster::standard();
            let transcript = Transcript::start(roster.participant(Role::Proxy), question);
            Self { roster, transcript }
        }

        fn say(&mut self, role: Role, text: &str) -> &mut Self {
            let message = Message::utterance(self.roster.participant(role), text);
            self.transcript.append(message);
            self
        }

        fn author_query(&mut self, query: &str) -> &mut Self {
            let author = self.roster.participant(Role::Author);
            self.transcript.append(Message::tool_call(
                author,
                &ToolRequest::RunQuery {
                    query: query.to_string(),
                },
            ));
            self.transcript
                .append(Message::tool_result(author, ToolKind::RunQuery, "[]"));
            self
        }

        fn execute(&mut self, rows: usize) -> &mut Self {
            let table = Table::new(
                vec!["n".into()],
                (0..rows).map(|i| vec![Cell::Integer(i as i64)]).collect(),
            )
            .unwrap();
            let execution = QueryExecution::from_table("q", "SELECT n FROM t", table, 20);
            let message = Message::utterance(self.roster.participant(Role::Executor), execution.render())
                .with_attachment(Attachment::QueryResult(execution));
            self.transcript.append(message);
            self
        }

        fn next(&self) -> Route {
            ConversationRouter::default().next(&self.transcript)
        }
    }

    #[test]
    fn test_proxy_opens_with_planner() {
        assert_eq!(Script::new("q").next(), Route::Speak(Role::Planner));
    }

    #[test]
    fn test_proxy_routes_tool_results_to_executor() {
        let mut script = Script::new("q");
        script.say(Role::Planner, "plan");
        let proxy = script.roster.participant(Role::Proxy).clone();
        script
            .transcript
            .append(Message::tool_result(&proxy, ToolKind::RunQuery, "[]"));
        assert_eq!(script.next(), Route::Speak(Role::Executor));

        script.transcript.append(Message::utterance(&proxy, "more"));
        assert_eq!(script.next(), Route::Speak(Role::Author));
    }

    #[test]
    fn test_planner_transitions() {
        let mut script = Script::new("q");
        script.say(Role::Planner, "thinking");
        assert_eq!(script.next(), Route::Speak(Role::Planner));
        script.say(Role::Planner, "checklist ready. Terminate-Agent");
        assert_eq!(script.next(), Route::Speak(Role::Author));

        let mut script = Script::new("q");
        script.say(Role::Planner, "TERMINATE-FLOW: please specify a region");
        assert_eq!(
            script.next(),
            Route::Limit(LimitReason::ClarificationNeeded)
        );
    }

    #[test]
    fn test_planner_with_both_tokens_hands_off() {
        let mut script = Script::new("q");
        script.say(Role::Planner, "TERMINATE-FLOW ... TERMINATE-AGENT");
        assert_eq!(script.next(), Route::Speak(Role::Author));
    }

    #[test]
    fn test_author_handoff_and_continue() {
        let mut script = Script::new("q");
        script.say(Role::Planner, "TERMINATE-AGENT");
        script.author_query("SELECT 1");
        assert_eq!(script.next(), Route::Speak(Role::Author));
        script.say(Role::Author, "user_question: q generated_sql_query: x checklist: TERMINATE-AGENT");
        assert_eq!(script.next(), Route::Speak(Role::Critic));
    }

    #[test]
    fn test_tool_output_tokens_are_ignored() {
        let mut script = Script::new("q");
        let author = script.roster.participant(Role::Author).clone();
        script.transcript.append(Message::tool_result(
            &author,
            ToolKind::RunQuery,
            r#"[{"note":"terminate-agent"}]"#,
        ));
        assert_eq!(script.next(), Route::Speak(Role::Author));
    }

    #[test]
    fn test_five_author_queries_reach_limiter() {
        let mut script = Script::new("q");
        script.say(Role::Planner, "TERMINATE-AGENT");
        for i in 0..4 {
            script.author_query(&format!("SELECT {i}"));
            assert_eq!(script.next(), Route::Speak(Role::Author));
        }
        script.author_query("SELECT 5");
        assert_eq!(
            script.next(),
            Route::Limit(LimitReason::AuthorRetriesExhausted)
        );

        script.say(Role::Author, "let me try yet another approach");
        assert_eq!(
            script.next(),
            Route::Limit(LimitReason::AuthorRetriesExhausted)
        );
    }

    #[test]
    fn test_third_critic_rejection_reaches_limiter() {
        let mut script = Script::new("q");
        script.say(Role::Planner, "TERMINATE-AGENT");
        for _ in 0..2 {
            script.say(Role::Author, "draft TERMINATE-AGENT");
            script.say(Role::Critic, "missing a filter, score 0");
            assert_eq!(script.next(), Route::Speak(Role::Author));
        }
        script.say(Role::Author, "draft TERMINATE-AGENT");
        script.say(Role::Critic, "still missing a filter, score 0");
        assert_eq!(
            script.next(),
            Route::Limit(LimitReason::CriticRejectionsExhausted)
        );
    }

    #[test]
    fn test_critic_approval() {
        let mut script = Script::new("q");
        script.say(Role::Critic, "score 1. ALL-GOOD");
        assert_eq!(script.next(), Route::Speak(Role::Executor));
    }

    #[test]
    fn test_executor_classifications() {
        let cases = [
            (0, Route::Limit(LimitReason::ResultEmpty)),
            (1, Route::Limit(LimitReason::ResultSingleton)),
            (2, Route::Speak(Role::Summarizer)),
            (20, Route::Speak(Role::Summarizer)),
            (21, Route::Limit(LimitReason::ResultOverflow)),
        ];
        for (rows, expected) in cases {
            let mut script = Script::new("q");
            script.execute(rows);
            assert_eq!(script.next(), expected, "rows = {rows}");
        }
    }

    #[test]
    fn test_executor_flag_text_without_attachment() {
        let mut script = Script::new("q");
        script.say(Role::Executor, "data_size_flag: within-limit");
        assert_eq!(script.next(), Route::Speak(Role::Summarizer));

        script.say(Role::Executor, "could not read a query");
        assert_eq!(script.next(), Route::Limit(LimitReason::ExtractionFailed));
    }

    #[test]
    fn test_summarizer_and_limiter_end() {
        let mut script = Script::new("q");
        script.say(Role::Summarizer, "Sales peaked in March. ALL-GOOD-COMPLETED");
        assert_eq!(script.next(), Route::End(EndReason::Completed));

        script.say(Role::Summarizer, "partial ALL-GOOD");
        assert_eq!(script.next(), Route::Limit(LimitReason::SummaryIncomplete));

        script.say(Role::Limiter, "limit reached");
        assert_eq!(script.next(), Route::End(EndReason::Limited));
    }

    #[test]
    fn test_round_ceiling() {
        let mut script = Script::new("q");
        for _ in 0..(DEFAULT_MAX_ROUNDS - 1) {
            script.say(Role::Planner, "still thinking");
        }
        assert_eq!(script.transcript.len(), DEFAULT_MAX_ROUNDS);
        assert_eq!(script.next(), Route::End(EndReason::RoundCeiling));

        let router = ConversationRouter::new(3, RetryLimits::default());
        let mut script = Script::new("q");
        script.say(Role::Planner, "a");
        assert_eq!(router.next(&script.transcript), Route::Speak(Role::Planner));
        script.say(Role::Planner, "b");
        assert_eq!(router.next(&script.transcript), Route::End(EndReason::RoundCeiling));
    }

    #[test]
    fn test_structurally_identical_transcripts_route_identically() {
        let build = |question: &str, note: &str| {
            let mut script = Script::new(question);
            script.say(Role::Planner, &format!("{note} TERMINATE-AGENT"));
            script.author_query("SELECT a");
            script.say(Role::Author, &format!("{note} terminate-agent"));
            script.say(Role::Critic, note);
            script
        };
        let a = build("first question", "alpha");
        let b = build("second question", "beta");
        assert_eq!(a.next(), b.next());
        assert_eq!(a.next(), a.next());
    }
}
