use std::backtrace::Backtrace;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// A constraint was posted over variables or constants that make no
    /// sense (e.g. an element index that is not a usable integer). This is a
    /// defect in the model builder, not a property of the problem instance,
    /// so it is never reported as infeasibility.
    #[error("malformed constraint: {0}")]
    MalformedConstraint(String),
    #[error("{0}")]
    Custom(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Inner: {inner}\n{backtrace}")]
    Inner {
        inner: Box<SolverError>,
        backtrace: Box<Backtrace>,
    },
}

impl From<SolverError> for Error {
    fn from(inner: SolverError) -> Self {
        Error::Inner {
            inner: Box::new(inner),
            backtrace: Box::new(std::backtrace::Backtrace::capture()),
        }
    }
}
