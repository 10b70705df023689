//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod employee;
pub mod payment;
pub mod schedule_slot;
pub mod setting;
pub mod student;
pub mod timetable_entry;

// Re-export specific types to avoid conflicts
pub use employee::{Column as EmployeeColumn, Entity as Employee, Model as EmployeeModel};
pub use payment::{Column as PaymentColumn, Entity as Payment, Model as PaymentModel};
pub use schedule_slot::{
    Column as ScheduleSlotColumn, Entity as ScheduleSlot, Model as ScheduleSlotModel,
};
pub use setting::{Column as SettingColumn, Entity as Setting, Model as SettingModel};
pub use student::{Column as StudentColumn, Entity as Student, Model as StudentModel};
pub use timetable_entry::{
    Column as TimetableEntryColumn, Entity as TimetableEntry, Model as TimetableEntryModel,
};
