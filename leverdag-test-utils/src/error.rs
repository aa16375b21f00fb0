use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestError {
    #[error("Invalid test fixture: {0}")]
    InvalidFixture(String),
}
