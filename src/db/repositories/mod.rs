mod attendance_repository;
mod class_repository;
mod enrollment_repository;
mod notification_repository;
mod user_repository;

pub use attendance_repository::AttendanceRepository;
pub use class_repository::ClassRepository;
pub use enrollment_repository::EnrollmentRepository;
pub use notification_repository::NotificationRepository;
pub use user_repository::UserRepository;
