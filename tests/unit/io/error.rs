//! Tests for error formatting, sources and context enrichment

#[cfg(test)]
mod tests {
    use edgetile::io::error::{
        AlgorithmError, ErrorContext, Result, WithContext, invalid_parameter, invalid_tile,
    };
    use std::error::Error;
    use std::io;
    use std::path::PathBuf;

    // Tests missing complement messages name the side and its label
    // Verified by omitting the label from the message
    #[test]
    fn test_missing_complement_display() {
        let error = AlgorithmError::MissingComplement {
            tile: "T".to_string(),
            direction: "north".to_string(),
            label: "(\"a\")".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("'T'"));
        assert!(message.contains("north"));
        assert!(message.contains("(\"a\")"));
    }

    // Tests degenerate bounds messages report the axis and both bounds
    // Verified by swapping min and max in the format string
    #[test]
    fn test_degenerate_bounds_display() {
        let error = AlgorithmError::DegenerateBounds {
            axis: "y",
            min: 4,
            max: 1,
        };
        assert_eq!(
            error.to_string(),
            "Degenerate bounds on y axis: minimum 4 exceeds maximum 1"
        );
    }

    // Tests helper constructors fill every field
    // Verified by dropping the reason from the helper
    #[test]
    fn test_helper_constructors() {
        let error = invalid_parameter("attempts", &0, &"must be positive");
        assert_eq!(
            error.to_string(),
            "Invalid parameter 'attempts' = '0': must be positive"
        );

        let error = invalid_tile("blank", &"tile has no sides");
        assert!(matches!(
            error,
            AlgorithmError::InvalidTile { ref name, ref reason }
                if name == "blank" && reason == "tile has no sides"
        ));
    }

    // Tests only file system errors expose an underlying source
    // Verified by returning None for every variant
    #[test]
    fn test_error_source() {
        let io_error: AlgorithmError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(io_error.source().is_some());

        let other = AlgorithmError::UnknownTile {
            name: "x".to_string(),
        };
        assert!(other.source().is_none());
    }

    // Tests context replaces the placeholder path and operation of I/O errors
    // Verified by ignoring the context path
    #[test]
    fn test_with_context_file_system() {
        let failing: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let result: Result<()> = failing.with_context(ErrorContext {
            path: Some(PathBuf::from("out/grid.txt")),
            operation: Some("write grid"),
        });

        match result {
            Err(AlgorithmError::FileSystem {
                path, operation, ..
            }) => {
                assert_eq!(path, PathBuf::from("out/grid.txt"));
                assert_eq!(operation, "write grid");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    // Tests context leaves errors without file state unchanged
    // Verified by converting every error into a file system error
    #[test]
    fn test_with_context_other_errors() {
        let failing: Result<()> = Err(AlgorithmError::OutOfBounds { position: [7, -2] });
        let result = failing.with_context(ErrorContext {
            path: Some(PathBuf::from("ignored.txt")),
            operation: Some("pin"),
        });
        assert!(matches!(
            result,
            Err(AlgorithmError::OutOfBounds { position: [7, -2] })
        ));
    }

    // Tests unsolved runs say how the last attempt ended
    // Verified by ignoring the contradiction flag
    #[test]
    fn test_unsolved_display() {
        let error = AlgorithmError::Unsolved {
            attempts: 2,
            seed: 43,
            contradiction: true,
        };
        assert_eq!(
            error.to_string(),
            "No solution after 2 attempt(s); the last (seed 43) ended with a contradiction"
        );
    }
}
