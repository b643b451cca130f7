//! GraphQL-over-HTTPS adapter for the remote slot service.

pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

use slotwatch_models::{
    AnswerHandle, CourseId, Goal, GoalId, GoalStatus, Identity, Slot, StudentId, TaskHandle,
    UserId,
};

use crate::error::{ClientError, Result};
use crate::service::SlotService;
use crate::token::TokenProvider;

use self::queries::*;

/// Default GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://edu.21-school.ru/services/graphql";

/// Default overall timeout for a single HTTP exchange.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const PRODUCT_ID: &str = "96098f4b-5708-4c42-a62c-6893419169b3";
const ROUTE_INFO: &str = "v1";
const USER_ROLE: &str = "STUDENT";

/// Remote slot service client speaking GraphQL.
#[derive(Clone)]
pub struct GraphqlClient {
    client: reqwest::Client,
    endpoint: String,
    tokens: Arc<dyn TokenProvider>,
    headers: Vec<(&'static str, String)>,
}

impl GraphqlClient {
    /// Create a client for the default endpoint.
    pub fn new(tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        Self::with_timeout(tokens, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a client whose HTTP exchanges are bounded by `timeout`.
    pub fn with_timeout(tokens: Arc<dyn TokenProvider>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            tokens,
            headers: vec![
                ("X-EDU-PRODUCT-ID", PRODUCT_ID.to_string()),
                ("X-EDU-ROUTE-INFO", ROUTE_INFO.to_string()),
                ("userrole", USER_ROLE.to_string()),
            ],
        })
    }

    /// Point the client at another endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Scope every request to a school.
    pub fn with_school(mut self, school_id: impl Into<String>) -> Self {
        let school_id = school_id.into();
        self.headers.push(("X-EDU-SCHOOL-ID", school_id.clone()));
        self.headers.push(("X-Edu-Org-Unit-Id", school_id.clone()));
        self.headers.push(("schoolid", school_id));
        self
    }

    /// Returns the configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute one GraphQL operation and decode its `data` member.
    async fn request<V, T>(&self, operation: &str, query: &str, variables: V) -> Result<T>
    where
        V: Serialize + Send,
        T: DeserializeOwned,
    {
        let token = self.tokens.token().await?;

        let body = GraphqlRequest {
            operation_name: operation,
            query,
            variables,
        };

        trace!(operation = %operation, "sending graphql request");

        let mut request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .header("Content-Type", "application/json");
        for (name, value) in &self.headers {
            request = request.header(*name, value);
        }

        let response = request.json(&body).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ClientError::Status(status.as_u16()));
        }

        let envelope: GraphqlResponse<T> = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(format!("decoding response: {}", e)))?;

        decode_envelope(envelope)
    }
}

impl std::fmt::Debug for GraphqlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphqlClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[async_trait]
impl SlotService for GraphqlClient {
    async fn resolve_identity(&self, username: &str) -> Result<Identity> {
        let data: CredentialsData = self
            .request(
                GET_CREDENTIALS_BY_LOGIN,
                GET_CREDENTIALS_BY_LOGIN_QUERY,
                LoginVars { login: username },
            )
            .await?;

        let student = data.school21.get_student_by_login;
        debug!(user_id = %student.user_id, "resolved identity");
        Ok(Identity::new(student.user_id, student.student_id))
    }

    async fn list_goals(&self, user_id: &UserId) -> Result<Vec<Goal>> {
        let data: CurrentProjectsData = self
            .request(
                GET_STUDENT_CURRENT_PROJECTS,
                GET_STUDENT_CURRENT_PROJECTS_QUERY,
                UserVars {
                    user_id: user_id.as_str(),
                },
            )
            .await?;

        Ok(goals_from_projects(data.student.get_student_current_projects))
    }

    async fn list_sub_goals(&self, course_id: &CourseId) -> Result<Vec<Goal>> {
        let data: CourseGoalsData = self
            .request(
                GET_LOCAL_COURSE_GOALS,
                GET_LOCAL_COURSE_GOALS_QUERY,
                CourseVars {
                    local_course_id: course_id.as_str(),
                },
            )
            .await?;

        Ok(goals_from_course(
            data.course.get_local_course_goals.local_course_goals,
        ))
    }

    async fn resolve_handles(
        &self,
        goal_id: &GoalId,
        student_id: &StudentId,
    ) -> Result<(TaskHandle, AnswerHandle)> {
        let vars = || GoalStudentVars {
            goal_id: goal_id.as_str(),
            student_id: student_id.as_str(),
        };

        let info: ProjectInfoData = self
            .request(
                GET_PROJECT_INFO_BY_STUDENT,
                GET_PROJECT_INFO_BY_STUDENT_QUERY,
                vars(),
            )
            .await?;
        let task = task_from_module(info.school21.get_module_by_id)?;

        let attempts: AttemptsData = self
            .request(
                GET_PROJECT_ATTEMPT_EVALUATIONS_INFO,
                GET_PROJECT_ATTEMPT_EVALUATIONS_INFO_QUERY,
                vars(),
            )
            .await?;
        let answer = select_answer(
            goal_id,
            attempts.school21.get_project_attempt_evaluations_info,
        )?;

        Ok((task, answer))
    }

    async fn list_slots(
        &self,
        task: &TaskHandle,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Slot>> {
        let data: TimeslotsData = self
            .request(
                CALENDAR_GET_TIMESLOTS,
                CALENDAR_GET_TIMESLOTS_QUERY,
                TimeslotVars {
                    from: format_instant(from),
                    to: format_instant(to),
                    task_id: task.as_str(),
                },
            )
            .await?;

        slots_from_spans(
            data.student
                .get_name_less_student_timeslots_for_review
                .time_slots,
        )
    }

    async fn claim_slot(&self, answer: &AnswerHandle, slot: Slot, online: bool) -> Result<String> {
        let result: Result<BookingData> = self
            .request(
                CALENDAR_ADD_BOOKING,
                CALENDAR_ADD_BOOKING_QUERY,
                BookingVars {
                    answer_id: answer.as_str(),
                    start_time: format_instant(slot.start()),
                    is_online: online,
                    was_staff_slot_chosen: false,
                },
            )
            .await;

        match result {
            Ok(data) => Ok(data.student.add_booking.id),
            Err(e) => Err(classify_claim_error(e)),
        }
    }
}

/// Message fragments the service uses when a slot can no longer be booked.
const CONFLICT_MARKERS: &[&str] = &[
    "already",
    "busy",
    "occupied",
    "taken",
    "not available",
    "unavailable",
    "not found",
];

/// Separates lost booking races from genuine remote failures.
fn classify_claim_error(e: ClientError) -> ClientError {
    match e {
        ClientError::Remote(msg) => {
            let lower = msg.to_lowercase();
            if CONFLICT_MARKERS.iter().any(|m| lower.contains(m)) {
                ClientError::ClaimConflict(msg)
            } else {
                ClientError::Remote(msg)
            }
        }
        other => other,
    }
}

/// Render an instant the way the service expects it.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn decode_envelope<T>(envelope: GraphqlResponse<T>) -> Result<T> {
    if let Some(text) = envelope.error_text() {
        return Err(ClientError::Remote(text));
    }
    envelope
        .data
        .ok_or_else(|| ClientError::Decode("response carries no data".to_string()))
}

/// Ids arrive as strings or numbers depending on the operation.
fn id_to_string(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn goals_from_projects(projects: Vec<CurrentProject>) -> Vec<Goal> {
    projects
        .into_iter()
        .map(|project| {
            let status = project
                .goal_status
                .map(GoalStatus::from)
                .unwrap_or_default();
            let mut goal = Goal::new(
                id_to_string(project.goal_id).unwrap_or_default(),
                project.name,
                status,
            );
            if let Some(course) = id_to_string(project.local_course_id) {
                goal = goal.with_course(course);
            }
            goal
        })
        .collect()
}

fn goals_from_course(goals: Vec<LocalCourseGoal>) -> Vec<Goal> {
    goals
        .into_iter()
        .filter_map(|goal| {
            let id = id_to_string(goal.goal_id)?;
            Some(Goal::new(id, goal.goal_name, GoalStatus::from(goal.status)))
        })
        .collect()
}

fn task_from_module(module: ModuleInfo) -> Result<TaskHandle> {
    let task = module
        .current_task
        .map(|t| TaskHandle::from(t.task_id))
        .unwrap_or_else(|| TaskHandle::from(""));
    if task.is_empty() {
        return Err(ClientError::Decode("goal has no current task".to_string()));
    }
    Ok(task)
}

/// The answer to book for is the first attempt that has no result yet.
fn select_answer(goal_id: &GoalId, attempts: Vec<AttemptEvaluation>) -> Result<AnswerHandle> {
    attempts
        .into_iter()
        .find(|attempt| {
            attempt
                .attempt_result
                .as_ref()
                .map_or(true, serde_json::Value::is_null)
                && !attempt.student_answer_id.is_empty()
        })
        .map(|attempt| AnswerHandle::from(attempt.student_answer_id))
        .ok_or_else(|| ClientError::NoAnswerAvailable(goal_id.to_string()))
}

fn slots_from_spans(spans: Vec<TimeslotSpan>) -> Result<Vec<Slot>> {
    let mut slots = Vec::new();
    for span in spans {
        for start in span.valid_start_times {
            let instant = DateTime::parse_from_rfc3339(&start)
                .map_err(|e| ClientError::Decode(format!("parse time {:?}: {}", start, e)))?;
            slots.push(Slot::new(instant.with_timezone(&Utc)));
        }
    }
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    use crate::token::StaticToken;

    fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T> {
        let envelope: GraphqlResponse<T> = serde_json::from_value(value).unwrap();
        decode_envelope(envelope)
    }

    #[test]
    fn test_request_envelope_shape() {
        let body = GraphqlRequest {
            operation_name: CALENDAR_ADD_BOOKING,
            query: CALENDAR_ADD_BOOKING_QUERY,
            variables: BookingVars {
                answer_id: "a-1",
                start_time: "2026-10-20T09:45:00Z".to_string(),
                is_online: true,
                was_staff_slot_chosen: false,
            },
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["operationName"], "calendarAddBookingToEventSlot");
        assert_eq!(json["variables"]["answerId"], "a-1");
        assert_eq!(json["variables"]["isOnline"], true);
        assert_eq!(json["variables"]["wasStaffSlotChosen"], false);
    }

    #[test]
    fn test_queries_start_with_operation_name() {
        let pairs = [
            (GET_CREDENTIALS_BY_LOGIN, GET_CREDENTIALS_BY_LOGIN_QUERY),
            (GET_STUDENT_CURRENT_PROJECTS, GET_STUDENT_CURRENT_PROJECTS_QUERY),
            (GET_LOCAL_COURSE_GOALS, GET_LOCAL_COURSE_GOALS_QUERY),
            (GET_PROJECT_INFO_BY_STUDENT, GET_PROJECT_INFO_BY_STUDENT_QUERY),
            (
                GET_PROJECT_ATTEMPT_EVALUATIONS_INFO,
                GET_PROJECT_ATTEMPT_EVALUATIONS_INFO_QUERY,
            ),
            (CALENDAR_GET_TIMESLOTS, CALENDAR_GET_TIMESLOTS_QUERY),
            (CALENDAR_ADD_BOOKING, CALENDAR_ADD_BOOKING_QUERY),
        ];
        for (name, query) in pairs {
            let first_line = query.lines().next().unwrap();
            assert!(first_line.contains(name), "{} not in {}", name, first_line);
        }
    }

    #[test]
    fn test_claim_errors_classified() {
        let lost = classify_claim_error(ClientError::Remote(
            "Time slot is already occupied".to_string(),
        ));
        assert!(lost.is_conflict());

        let expired =
            classify_claim_error(ClientError::Remote("Unauthorized: token expired".to_string()));
        assert!(matches!(expired, ClientError::Remote(_)));

        let status = classify_claim_error(ClientError::Status(502));
        assert!(matches!(status, ClientError::Status(502)));
    }

    #[test]
    fn test_errors_are_joined() {
        let result: Result<BookingData> = decode(json!({
            "data": null,
            "errors": [{"message": "slot is busy"}, {"message": "try later"}]
        }));
        match result {
            Err(ClientError::Remote(msg)) => assert_eq!(msg, "slot is busy; try later"),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_data_is_decode_error() {
        let result: Result<BookingData> = decode(json!({ "data": null }));
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_slots_from_spans() {
        let data: TimeslotsData = decode(json!({
            "data": {"student": {"getNameLessStudentTimeslotsForReview": {
                "checkDuration": 30,
                "timeSlots": [
                    {"start": "x", "end": "y", "validStartTimes": ["2026-10-20T09:45:00Z", "2026-10-20T10:15:00Z"], "staffSlot": false},
                    {"start": "x", "end": "y", "validStartTimes": ["2026-10-20T13:30:00+03:00"], "staffSlot": false}
                ]
            }}}
        }))
        .unwrap();

        let slots = slots_from_spans(
            data.student
                .get_name_less_student_timeslots_for_review
                .time_slots,
        )
        .unwrap();

        assert_eq!(
            slots,
            vec![
                Slot::new(Utc.with_ymd_and_hms(2026, 10, 20, 9, 45, 0).unwrap()),
                Slot::new(Utc.with_ymd_and_hms(2026, 10, 20, 10, 15, 0).unwrap()),
                Slot::new(Utc.with_ymd_and_hms(2026, 10, 20, 10, 30, 0).unwrap()),
            ]
        );
    }

    #[test]
    fn test_no_spans_is_empty_not_error() {
        let slots = slots_from_spans(Vec::new()).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_bad_instant_is_decode_error() {
        let spans = vec![TimeslotSpan {
            valid_start_times: vec!["yesterday".to_string()],
        }];
        assert!(matches!(slots_from_spans(spans), Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_select_answer_skips_finished_attempts() {
        let attempts: AttemptsData = decode(json!({
            "data": {"school21": {"getProjectAttemptEvaluationsInfo": [
                {"studentAnswerId": "old", "attemptResult": {"finalPointProject": 100}},
                {"studentAnswerId": "current", "attemptResult": null}
            ]}}
        }))
        .unwrap();

        let answer = select_answer(
            &GoalId::from("42"),
            attempts.school21.get_project_attempt_evaluations_info,
        )
        .unwrap();
        assert_eq!(answer.as_str(), "current");
    }

    #[test]
    fn test_select_answer_none_available() {
        let attempts = vec![AttemptEvaluation {
            student_answer_id: "old".to_string(),
            attempt_result: Some(json!({"finalPointProject": 0})),
        }];
        let result = select_answer(&GoalId::from("42"), attempts);
        assert!(matches!(result, Err(ClientError::NoAnswerAvailable(id)) if id == "42"));
    }

    #[test]
    fn test_task_from_module() {
        let module = ModuleInfo {
            current_task: Some(CurrentTask {
                task_id: "t-9".to_string(),
            }),
        };
        assert_eq!(task_from_module(module).unwrap().as_str(), "t-9");

        let empty = ModuleInfo { current_task: None };
        assert!(task_from_module(empty).is_err());
    }

    #[test]
    fn test_goals_from_projects() {
        let data: CurrentProjectsData = decode(json!({
            "data": {"student": {"getStudentCurrentProjects": [
                {"goalId": "101", "name": "minishell", "goalStatus": "P2P_EVALUATIONS", "localCourseId": null},
                {"goalId": null, "name": "piscine", "goalStatus": null, "localCourseId": 77}
            ]}}
        }))
        .unwrap();

        let goals = goals_from_projects(data.student.get_student_current_projects);
        assert_eq!(goals.len(), 2);
        assert_eq!(goals[0].id.as_str(), "101");
        assert_eq!(goals[0].status, GoalStatus::P2pEvaluations);
        assert!(goals[0].course.is_none());
        assert_eq!(goals[1].status, GoalStatus::Unknown);
        assert_eq!(goals[1].course, Some(CourseId::from("77")));
    }

    #[test]
    fn test_goals_from_course_skips_missing_ids() {
        let goals = goals_from_course(vec![
            LocalCourseGoal {
                goal_id: Some(json!("5")),
                goal_name: "day 00".to_string(),
                status: "IN_PROGRESS".to_string(),
            },
            LocalCourseGoal {
                goal_id: None,
                goal_name: "broken".to_string(),
                status: "IN_PROGRESS".to_string(),
            },
        ]);
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].name, "day 00");
    }

    #[test]
    fn test_format_instant() {
        let instant = Utc.with_ymd_and_hms(2026, 10, 20, 9, 0, 0).unwrap();
        assert_eq!(format_instant(instant), "2026-10-20T09:00:00Z");
    }

    #[test]
    fn test_client_builder() {
        let tokens = Arc::new(StaticToken::new("t").unwrap());
        let client = GraphqlClient::new(tokens)
            .unwrap()
            .with_endpoint("http://localhost:9/graphql")
            .with_school("school-1");

        assert_eq!(client.endpoint(), "http://localhost:9/graphql");
        assert!(client
            .headers
            .iter()
            .any(|(name, value)| *name == "schoolid" && value == "school-1"));
    }
}
