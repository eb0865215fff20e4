pub mod company;
pub mod contact;
pub mod lead;
pub mod task;
pub mod user;

pub use company::Company;
pub use contact::Contact;
pub use lead::Lead;
pub use task::{Task, TaskWithContact};
pub use user::User;
