//! HTTP adapter for lecture registration endpoints.

mod dto;
mod extract;
mod handlers;
mod routes;

pub use dto::{
    ErrorResponse, HistoryParams, RegisterRequest, RegistrationHistoryEntryResponse,
    RegistrationHistoryResponse, RegistrationResponse, ScheduleParams, ScheduleResponse,
    ScheduleSlotResponse, ScheduledSessionResponse,
};
pub use extract::{JsonBody, QueryParams};
pub use handlers::LectureHandlers;
pub use routes::lecture_routes;
