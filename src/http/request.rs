use std::fmt;

pub const MAX_METHOD_LEN: usize = 7;
pub const MAX_TARGET_LEN: usize = 1023;

/// Method and target taken from the start of the first read on a connection.
/// Headers and body are never looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub target: String,
}

impl HttpRequest {
    pub fn parse(buf: &[u8]) -> Result<Self, HttpRequestError> {
        let mut tokens = buf
            .split(|b| b.is_ascii_whitespace())
            .filter(|t| !t.is_empty());
        let method = tokens.next().ok_or(HttpRequestError::MissingMethod)?;
        let target = tokens.next().ok_or(HttpRequestError::MissingTarget)?;
        if method.len() > MAX_METHOD_LEN {
            return Err(HttpRequestError::MethodTooLong);
        }
        if target.len() > MAX_TARGET_LEN {
            return Err(HttpRequestError::TargetTooLong);
        }
        let method = std::str::from_utf8(method).map_err(|_| HttpRequestError::InvalidEncoding)?;
        let target = std::str::from_utf8(target).map_err(|_| HttpRequestError::InvalidEncoding)?;
        Ok(HttpRequest {
            method: method.to_string(),
            target: target.to_string(),
        })
    }

    pub fn is_head(&self) -> bool {
        self.method.eq_ignore_ascii_case("HEAD")
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum HttpRequestError {
    MissingMethod,
    MissingTarget,
    MethodTooLong,
    TargetTooLong,
    InvalidEncoding,
}

impl fmt::Display for HttpRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpRequestError::MissingMethod => write!(f, "request line has no method"),
            HttpRequestError::MissingTarget => write!(f, "request line has no target"),
            HttpRequestError::MethodTooLong => {
                write!(f, "method longer than {MAX_METHOD_LEN} bytes")
            }
            HttpRequestError::TargetTooLong => {
                write!(f, "target longer than {MAX_TARGET_LEN} bytes")
            }
            HttpRequestError::InvalidEncoding => write!(f, "request line is not valid UTF-8"),
        }
    }
}

impl std::error::Error for HttpRequestError {}
