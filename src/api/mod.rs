pub mod format;
pub mod input;

pub use format::{AuthResponse, ErrorBody, MessageResponse, PublicUser};
pub use input::{CommentInput, InputError, ProjectInput, SigninInput, SignupInput, UpdateProjectInput};
