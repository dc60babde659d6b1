use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::InterviewStatus;

/// Request body for scheduling an interview.
#[derive(Debug, Deserialize)]
pub struct ScheduleInterviewRequest {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: InterviewStatus,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub feedback: String,
}
