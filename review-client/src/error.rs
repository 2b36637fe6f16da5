#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("reqwest `{0}`")]
    Reqwest(#[from] reqwest::Error),

    #[error("{status} `{message}`")]
    Status { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;
