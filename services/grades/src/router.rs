use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use gradebook_core::health::healthz;
use gradebook_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    course::{assign_teacher, create_course, get_course, get_course_enrollments, get_my_courses},
    enrollment::{enroll, get_record, get_student_enrollments, set_grade, unenroll},
    feedback::{delete_feedback, put_student_feedback, put_teacher_feedback},
    health::readyz,
    user::{create_user, get_me},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Users
        .route("/users", post(create_user))
        .route("/users/@me", get(get_me))
        .route("/users/@me/courses", get(get_my_courses))
        .route("/users/{student_id}/enrollments", get(get_student_enrollments))
        // Courses
        .route("/courses", post(create_course))
        .route("/courses/{code}", get(get_course))
        .route("/courses/{code}/teacher", put(assign_teacher))
        .route("/courses/{code}/enrollments", get(get_course_enrollments))
        // Enrollments
        .route("/enrollments", post(enroll))
        .route("/enrollments/{code}/{student_id}", get(get_record))
        .route("/enrollments/{code}/{student_id}", delete(unenroll))
        .route("/enrollments/{code}/{student_id}/grade", put(set_grade))
        // Feedback
        .route(
            "/enrollments/{code}/{student_id}/feedback/teacher",
            put(put_teacher_feedback),
        )
        .route(
            "/enrollments/{code}/{student_id}/feedback/student",
            put(put_student_feedback),
        )
        .route(
            "/enrollments/{code}/{student_id}/feedback",
            delete(delete_feedback),
        )
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
