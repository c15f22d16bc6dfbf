mod class_name;
mod id;
mod presence;
mod record;
mod student;

pub use class_name::ClassName;
pub use id::EntityId;
pub use presence::{
    normalize_visitors, split_names, visitor_names, PresenceField, NO_VISITORS,
};
pub use record::{AttendanceRecord, NewRecord};
pub use student::Student;
