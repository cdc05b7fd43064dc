use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibrisError {
    #[error("{0}")]
    Validation(String),

    #[error("No book with ISBN '{0}' in the catalog")]
    BookNotFound(String),

    #[error("No member with ID {0}")]
    MemberNotFound(u32),

    #[error("A student with ID '{0}' already exists")]
    DuplicateStudentId(String),

    #[error("'{title}' (ISBN: {isbn}) is currently out of stock")]
    OutOfStock { title: String, isbn: String },

    #[error("{name} (ID: {member_id}) has reached their borrowing limit ({limit} books)")]
    BorrowingLimitReached {
        name: String,
        member_id: u32,
        limit: usize,
    },

    #[error("{name} (ID: {member_id}) currently has no books issued")]
    NothingBorrowed { name: String, member_id: u32 },

    #[error("ISBN '{isbn}' is not listed as issued to member {member_id}")]
    NotBorrowed { isbn: String, member_id: u32 },

    #[error("All copies of ISBN '{0}' are already on the shelf")]
    StockFull(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, LibrisError>;
