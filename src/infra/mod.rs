mod guard;

pub use guard::{DeletionGuards, EntityGuard};
