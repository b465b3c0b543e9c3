use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    CapacityExceeded,
    Parse,
    Internal,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: String) -> Self {
        Error { kind, context }
    }

    pub fn invalid_argument<S: Into<String>>(context: S) -> Self {
        Error::new(ErrorKind::InvalidArgument, context.into())
    }

    pub fn not_found<S: Into<String>>(context: S) -> Self {
        Error::new(ErrorKind::NotFound, context.into())
    }

    pub fn capacity_exceeded<S: Into<String>>(context: S) -> Self {
        Error::new(ErrorKind::CapacityExceeded, context.into())
    }

    pub fn internal<S: Into<String>>(context: S) -> Self {
        Error::new(ErrorKind::Internal, context.into())
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::Parse,
            context: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
