use thiserror::Error;

#[derive(Error, Debug)]
#[allow(unused)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("Record not found")]
    NotFound,

    #[error("Duplicate record")]
    Duplicate,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Migration error: {0}")]
    MigrationError(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound,
            sqlx::Error::Database(db_err) => {
                // Unique violations and trigger-raised blocks are races the
                // application checks may have missed; both surface as
                // duplicates so callers see one conflict vocabulary.
                if db_err.is_unique_violation() || db_err.code().as_deref() == Some("P0001") {
                    DatabaseError::Duplicate
                } else {
                    DatabaseError::Sqlx(err)
                }
            }
            _ => DatabaseError::Sqlx(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let mapped = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(matches!(mapped, DatabaseError::NotFound));
    }

    #[test]
    fn other_errors_stay_wrapped() {
        let mapped = DatabaseError::from(sqlx::Error::PoolClosed);
        assert!(matches!(mapped, DatabaseError::Sqlx(_)));
    }
}
