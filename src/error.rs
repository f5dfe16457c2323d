use thiserror::Error;

pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_MISSING_DEPENDENCIES: i32 = 2;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("missing dependencies: {}", .0.join(", "))]
    MissingDependencies(Vec<String>),
}

/// Maps a failed run to the process exit code.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<IndexError>() {
        Some(IndexError::MissingDependencies(_)) => EXIT_MISSING_DEPENDENCIES,
        None => EXIT_FAILURE,
    }
}
