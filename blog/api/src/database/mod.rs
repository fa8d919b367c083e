mod comment;
mod group;
mod post;
mod user;

pub use comment::*;
pub use group::*;
pub use post::*;
pub use user::*;
