//! GraphQL operations used by the adapter, with their variables and the
//! parts of the responses the adapter reads.

use serde::{Deserialize, Serialize};

pub const GET_CREDENTIALS_BY_LOGIN: &str = "getCredentialsByLogin";
pub const GET_CREDENTIALS_BY_LOGIN_QUERY: &str = r#"query getCredentialsByLogin($login: String!) {
  school21 {
    getStudentByLogin(login: $login) {
      studentId
      userId
      schoolId
      isActive
      isGraduate
    }
  }
}"#;

pub const GET_STUDENT_CURRENT_PROJECTS: &str = "getStudentCurrentProjects";
pub const GET_STUDENT_CURRENT_PROJECTS_QUERY: &str = r#"query getStudentCurrentProjects($userId: ID!) {
  student {
    getStudentCurrentProjects(userId: $userId) {
      goalId
      name
      goalStatus
      localCourseId
    }
  }
}"#;

pub const GET_LOCAL_COURSE_GOALS: &str = "getLocalCourseGoals";
pub const GET_LOCAL_COURSE_GOALS_QUERY: &str = r#"query getLocalCourseGoals($localCourseId: ID!) {
  course {
    getLocalCourseGoals(localCourseId: $localCourseId) {
      localCourseId
      courseName
      localCourseGoals {
        goalId
        goalName
        status
      }
    }
  }
}"#;

pub const GET_PROJECT_INFO_BY_STUDENT: &str = "getProjectInfoByStudent";
pub const GET_PROJECT_INFO_BY_STUDENT_QUERY: &str = r#"query getProjectInfoByStudent($goalId: ID!, $studentId: UUID!) {
  school21 {
    getModuleById(goalId: $goalId, studentId: $studentId) {
      id
      currentTask {
        id
        taskId
      }
    }
  }
}"#;

pub const GET_PROJECT_ATTEMPT_EVALUATIONS_INFO: &str = "getProjectAttemptEvaluationsInfoByStudent";
pub const GET_PROJECT_ATTEMPT_EVALUATIONS_INFO_QUERY: &str = r#"query getProjectAttemptEvaluationsInfoByStudent($goalId: ID!, $studentId: UUID!) {
  school21 {
    getProjectAttemptEvaluationsInfo(goalId: $goalId, studentId: $studentId) {
      studentAnswerId
      attemptResult {
        finalPointProject
        resultDate
      }
    }
  }
}"#;

pub const CALENDAR_GET_TIMESLOTS: &str = "calendarGetNameLessStudentTimeslotsForReview";
pub const CALENDAR_GET_TIMESLOTS_QUERY: &str = r#"query calendarGetNameLessStudentTimeslotsForReview($from: DateTime!, $taskId: ID!, $to: DateTime!) {
  student {
    getNameLessStudentTimeslotsForReview(from: $from, taskId: $taskId, to: $to) {
      checkDuration
      timeSlots {
        start
        end
        validStartTimes
        staffSlot
      }
    }
  }
}"#;

pub const CALENDAR_ADD_BOOKING: &str = "calendarAddBookingToEventSlot";
pub const CALENDAR_ADD_BOOKING_QUERY: &str = r#"mutation calendarAddBookingToEventSlot($answerId: ID!, $startTime: DateTime!, $wasStaffSlotChosen: Boolean!, $isOnline: Boolean) {
  student {
    addBookingP2PToEventSlot(
      answerId: $answerId
      startTime: $startTime
      wasStaffSlotChosen: $wasStaffSlotChosen
      isOnline: $isOnline
    ) {
      id
    }
  }
}"#;

/// Request envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest<'a, V> {
    pub operation_name: &'a str,
    pub query: &'a str,
    pub variables: V,
}

/// Response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphqlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlErrorEntry {
    #[serde(default)]
    pub message: String,
}

impl<T> GraphqlResponse<T> {
    /// Joins the error messages, if the service reported any.
    pub fn error_text(&self) -> Option<String> {
        let errors = self.errors.as_ref()?;
        if errors.is_empty() {
            return None;
        }
        Some(
            errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct LoginVars<'a> {
    pub login: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsData {
    pub school21: CredentialsSchool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsSchool {
    pub get_student_by_login: StudentByLogin,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentByLogin {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub student_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserVars<'a> {
    pub user_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentProjectsData {
    pub student: CurrentProjectsStudent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentProjectsStudent {
    #[serde(default)]
    pub get_student_current_projects: Vec<CurrentProject>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentProject {
    pub goal_id: Option<serde_json::Value>,
    #[serde(default)]
    pub name: String,
    pub goal_status: Option<String>,
    pub local_course_id: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseVars<'a> {
    pub local_course_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseGoalsData {
    pub course: CourseGoalsCourse,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseGoalsCourse {
    pub get_local_course_goals: LocalCourseGoals,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalCourseGoals {
    #[serde(default)]
    pub local_course_goals: Vec<LocalCourseGoal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalCourseGoal {
    pub goal_id: Option<serde_json::Value>,
    #[serde(default)]
    pub goal_name: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalStudentVars<'a> {
    pub goal_id: &'a str,
    pub student_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfoData {
    pub school21: ProjectInfoSchool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfoSchool {
    pub get_module_by_id: ModuleInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
    pub current_task: Option<CurrentTask>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentTask {
    #[serde(default)]
    pub task_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptsData {
    pub school21: AttemptsSchool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptsSchool {
    #[serde(default)]
    pub get_project_attempt_evaluations_info: Vec<AttemptEvaluation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptEvaluation {
    #[serde(default)]
    pub student_answer_id: String,
    pub attempt_result: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeslotVars<'a> {
    pub from: String,
    pub to: String,
    pub task_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeslotsData {
    pub student: TimeslotsStudent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeslotsStudent {
    pub get_name_less_student_timeslots_for_review: TimeslotsForReview,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeslotsForReview {
    #[serde(default)]
    pub time_slots: Vec<TimeslotSpan>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeslotSpan {
    #[serde(default)]
    pub valid_start_times: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingVars<'a> {
    pub answer_id: &'a str,
    pub start_time: String,
    pub is_online: bool,
    pub was_staff_slot_chosen: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingData {
    pub student: BookingStudent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStudent {
    #[serde(rename = "addBookingP2PToEventSlot")]
    pub add_booking: Booking,
}

#[derive(Debug, Deserialize)]
pub struct Booking {
    #[serde(default)]
    pub id: String,
}
