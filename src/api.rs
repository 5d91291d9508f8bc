use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info};

use crate::topic::{LineCount, Topic};

/// The only failure text shown to the user, whatever went wrong.
pub const GENERIC_FAILURE_MESSAGE: &str = "Đã xảy ra lỗi khi tạo bài thơ. Vui lòng thử lại sau.";

const TERM_COLUMN: &str = "Từ / Cụm từ";
const CHU_NOM_COLUMN: &str = "Chữ Nôm";
const MEANING_COLUMN: &str = "Giải nghĩa – Thi pháp";
const CITATION_VIETNAMESE_COLUMN: &str = "Trích dẫn nguồn (Tiếng Việt)";
const CITATION_NOM_COLUMN: &str = "Trích dẫn nguồn (Chữ Nôm)";

/// Failure talking to the poem backend, for any endpoint.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Request to poem backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Poem backend returned HTTP {0}")]
    Status(StatusCode),

    #[error("Malformed poem backend response: {0}")]
    MalformedResponse(String),
}

impl BackendError {
    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    topic: &'a str,
    num_lines: u8,
}

/// Only `poem` is required; `keywords_used` may be absent, null, or shaped
/// differently without failing the request.
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    poem: Option<String>,
    #[serde(default)]
    keywords_used: Option<Value>,
}

/// A row of the glossary table the backend drew keywords from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordRecord {
    #[serde(rename = "Từ / Cụm từ", default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(rename = "Chữ Nôm", default, skip_serializing_if = "Option::is_none")]
    pub chu_nom: Option<String>,
    #[serde(rename = "Giải nghĩa – Thi pháp", default, skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    #[serde(
        rename = "Trích dẫn nguồn (Tiếng Việt)",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub citation_vietnamese: Option<String>,
    #[serde(
        rename = "Trích dẫn nguồn (Chữ Nôm)",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub citation_nom: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl KeywordRecord {
    /// Reads one table row. Non-string cells are kept as their JSON text;
    /// rows that are not objects are ignored.
    fn from_row(row: Value) -> Option<Self> {
        let Value::Object(mut columns) = row else {
            return None;
        };
        let mut take = |column: &str| columns.remove(column).and_then(cell_text);
        let term = take(TERM_COLUMN);
        let chu_nom = take(CHU_NOM_COLUMN);
        let meaning = take(MEANING_COLUMN);
        let citation_vietnamese = take(CITATION_VIETNAMESE_COLUMN);
        let citation_nom = take(CITATION_NOM_COLUMN);

        Some(Self {
            term,
            chu_nom,
            meaning,
            citation_vietnamese,
            citation_nom,
            extra: columns,
        })
    }
}

fn cell_text(cell: Value) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn keyword_records(keywords_used: Option<Value>) -> Vec<KeywordRecord> {
    match keywords_used {
        Some(Value::Array(rows)) => rows.into_iter().filter_map(KeywordRecord::from_row).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            debug!(value = %other, "Ignoring keywords_used that is not a list");
            Vec::new()
        }
    }
}

/// A successful generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPoem {
    pub text: String,
    pub keywords_used: Vec<KeywordRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

pub struct PoemClient {
    http: reqwest::Client,
    base_url: String,
}

impl PoemClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_http(builder.build()?, base_url))
    }

    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    pub async fn generate(
        &self,
        topic: &Topic,
        lines: LineCount,
    ) -> Result<GeneratedPoem, BackendError> {
        let request = GenerateRequest {
            topic: topic.as_str(),
            num_lines: lines.count(),
        };

        info!(topic = topic.as_str(), num_lines = lines.count(), "Requesting poem");
        let response = self
            .http
            .post(self.endpoint("api/generate"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }

        let payload: GenerateResponse = response.json().await?;
        let text = payload
            .poem
            .filter(|poem| !poem.is_empty())
            .ok_or_else(|| {
                BackendError::MalformedResponse("Không nhận được bài thơ từ máy chủ".to_owned())
            })?;
        let keywords_used = keyword_records(payload.keywords_used);

        debug!(
            chars = text.chars().count(),
            keywords = keywords_used.len(),
            "Received poem"
        );
        Ok(GeneratedPoem {
            text,
            keywords_used,
        })
    }

    pub async fn health(&self) -> Result<HealthStatus, BackendError> {
        info!("Checking poem backend health");
        let response = self.http.get(self.endpoint("health")).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }
        Ok(response.json().await?)
    }
}


/// One-shot HTTP responder and client setup shared by the tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::PoemClient;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Answers a single HTTP request with a canned response and hands back
    /// the raw request it received.
    pub(crate) async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        (format!("http://{address}"), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let read = socket.read(&mut chunk).await.unwrap();
            if read == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..read]);

            if let Some(header_end) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buffer[..header_end]).to_lowercase();
                let content_length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buffer.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }

    pub(crate) fn client(base_url: &str) -> PoemClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        PoemClient::with_http(http, base_url)
    }

    /// A base URL nothing listens on.
    pub(crate) async fn unreachable_base_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{address}")
    }
}
