//! Result type alias for coursepack
//!
//! This module provides a convenient Result type alias that uses
//! CoursePackError as the error type.

use super::errors::CoursePackError;

/// Result type alias for coursepack operations
///
/// This is a convenience type alias that uses `CoursePackError` as the error
/// type. Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use coursepack::domain::result::Result;
/// use coursepack::domain::errors::CoursePackError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(CoursePackError::Validation("Invalid snapshot".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, CoursePackError>;
