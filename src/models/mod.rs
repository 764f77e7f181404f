pub mod announcement;
pub mod teacher;
