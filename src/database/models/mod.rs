pub mod comment;
pub mod project;
pub mod user;

pub use comment::{Comment, CommentDetail};
pub use project::{NewProject, Project, ProjectChanges, ProjectDetail};
pub use user::{AuthorSummary, NewUser, User};
