#[derive(Debug)]
pub enum MatrixError {
    /// The native driver returned a null handle. The string names what was being created
    InvalidArgument(String),
    /// A pixel buffer is too short for the region it's supposed to cover
    OutOfBounds {
        required: usize,
        actual: usize,
    },
    InvalidOptions(String),
    InteriorNul(std::ffi::NulError),
    Io(std::io::Error),
    #[cfg(feature = "serde")]
    Config(toml::de::Error),
}

impl std::fmt::Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(what) => write!(f, "native driver refused to create {}", what),
            Self::OutOfBounds { required, actual } => write!(
                f,
                "pixel buffer holds {} pixels but {} are required",
                actual, required
            ),
            Self::InvalidOptions(msg) => write!(f, "invalid matrix options: {}", msg),
            Self::InteriorNul(_) => f.write_str("string contains a NUL byte"),
            Self::Io(_) => f.write_str("reading configuration failed"),
            #[cfg(feature = "serde")]
            Self::Config(_) => f.write_str("parsing configuration failed"),
        }
    }
}

impl std::error::Error for MatrixError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InteriorNul(e) => Some(e),
            Self::Io(e) => Some(e),
            #[cfg(feature = "serde")]
            Self::Config(e) => Some(e),
            Self::InvalidArgument(_) | Self::OutOfBounds { .. } | Self::InvalidOptions(_) => None,
        }
    }
}

impl From<std::ffi::NulError> for MatrixError {
    fn from(e: std::ffi::NulError) -> Self {
        Self::InteriorNul(e)
    }
}

impl From<std::io::Error> for MatrixError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(feature = "serde")]
impl From<toml::de::Error> for MatrixError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e)
    }
}

pub type Result<T, E = MatrixError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn out_of_bounds_message_names_both_sizes() {
        let e = MatrixError::OutOfBounds {
            required: 12,
            actual: 5,
        };
        assert_eq!(
            e.to_string(),
            "pixel buffer holds 5 pixels but 12 are required"
        );
        assert!(e.source().is_none());
    }

    #[test]
    fn nul_error_is_kept_as_source() {
        let nul = std::ffi::CString::new("a\0b").unwrap_err();
        let e = MatrixError::from(nul);
        assert!(matches!(e, MatrixError::InteriorNul(_)));
        assert!(e.source().is_some());
    }
}
