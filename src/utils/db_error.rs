//! Postgres error classification.

/// Name of the uniqueness constraint on `links.short_code`.
pub const SHORT_CODE_CONSTRAINT: &str = "links_short_code_key";

/// SQLSTATE raised when a called function does not exist.
const UNDEFINED_FUNCTION: &str = "42883";

/// Returns true if the error is a unique violation on the short code constraint.
pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(SHORT_CODE_CONSTRAINT))
}

/// Returns true if the error reports a missing stored function.
pub fn is_undefined_function(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == UNDEFINED_FUNCTION)
}
