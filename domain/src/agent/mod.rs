//! Agent personas and the comment-stream mailbox

pub mod identity;
pub mod mailbox;
