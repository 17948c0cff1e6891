use libsql::errors::Error as TursoError;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Turso error: {0}")]
    Turso(#[from] TursoError),
    #[error("Memory error: {0}")]
    Memory(String),
    #[error("Corrupted row: {0}")]
    Corrupted(String),
    #[error("Dialogue storage error: {0}")]
    Dialogue(String),
}
