use super::CloudinaryCredentials;
use crate::UploadError;
use bytes::Bytes;
use mediastore_models::ResourceKind;
use mediastore_utils::{join_key, sign_params};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

type Result<T> = std::result::Result<T, UploadError>;

/// Parameters of one upload call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub kind: ResourceKind,
    pub folder: Option<String>,
    pub public_id: Option<String>,
}

impl UploadRequest {
    /// Human-readable destination for logs and errors
    pub fn target(&self) -> String {
        let id = self.public_id.as_deref().unwrap_or("<assigned>");
        join_key(&[self.folder.as_deref().unwrap_or_default(), id])
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub secure_url: String,
    #[serde(default)]
    pub public_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DestroyResponse {
    pub result: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Wire-level operations of the media service.
///
/// `upload` resolves exactly once: an error, `Ok(None)` when the service
/// acknowledged the upload without a usable result, or the result itself.
#[async_trait::async_trait]
pub trait CloudinaryApi: Send + Sync + 'static {
    async fn upload(&self, request: UploadRequest, payload: Bytes) -> Result<Option<UploadResponse>>;

    async fn destroy(&self, public_id: &str, kind: ResourceKind) -> Result<DestroyResponse>;
}

/// REST transport: signed multipart uploads and signed destroy calls
pub struct HttpApi {
    credentials: Arc<CloudinaryCredentials>,
    base_url: String,
    client: reqwest::Client,
}

impl HttpApi {
    pub fn new(
        credentials: Arc<CloudinaryCredentials>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self, kind: ResourceKind, action: &str) -> String {
        format!(
            "{}/v1_1/{}/{}/{}",
            self.base_url,
            self.credentials.cloud_name(),
            kind.as_str(),
            action
        )
    }

    /// Adds timestamp, api key and signature to the call-specific params
    fn signed_params(
        &self,
        mut params: Vec<(&'static str, String)>,
        timestamp: i64,
    ) -> Vec<(&'static str, String)> {
        params.push(("timestamp", timestamp.to_string()));
        let signature = sign_params(&params, self.credentials.api_secret());
        params.push(("api_key", self.credentials.api_key().to_string()));
        params.push(("signature", signature));
        params
    }
}

#[async_trait::async_trait]
impl CloudinaryApi for HttpApi {
    async fn upload(&self, request: UploadRequest, payload: Bytes) -> Result<Option<UploadResponse>> {
        let target = request.target();
        let mut params = Vec::new();
        if let Some(folder) = &request.folder {
            params.push(("folder", folder.clone()));
        }
        if let Some(public_id) = &request.public_id {
            params.push(("public_id", public_id.clone()));
        }
        let params = self.signed_params(params, chrono::Utc::now().timestamp());

        let length = payload.len() as u64;
        let file_name = request
            .public_id
            .clone()
            .unwrap_or_else(|| "upload".to_string());
        let file_part = Part::stream_with_length(payload, length).file_name(file_name);

        let mut form = Form::new().part("file", file_part);
        for (key, value) in params {
            form = form.text(key, value);
        }

        let url = self.endpoint(request.kind, "upload");
        tracing::debug!("POST {} ({} bytes) -> {}", url, length, target);

        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_upload_body(&target, status, &body)
    }

    async fn destroy(&self, public_id: &str, kind: ResourceKind) -> Result<DestroyResponse> {
        let params = self.signed_params(
            vec![("public_id", public_id.to_string())],
            chrono::Utc::now().timestamp(),
        );

        let url = self.endpoint(kind, "destroy");
        tracing::debug!("POST {} -> {}", url, public_id);

        let response = self.client.post(&url).form(&params).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_destroy_body(public_id, status, &body)
    }
}

/// Interprets an upload response. A 2xx without a decodable result with a
/// secure URL is `Ok(None)`, never a silent success.
pub(crate) fn parse_upload_body(target: &str, status: u16, body: &str) -> Result<Option<UploadResponse>> {
    if !(200..300).contains(&status) {
        return Err(UploadError::rejected(target, status, error_message(status, body)));
    }

    if body.trim().is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<UploadResponse>(body) {
        Ok(response) if !response.secure_url.is_empty() => Ok(Some(response)),
        Ok(_) => Ok(None),
        Err(e) => {
            tracing::warn!("Undecodable upload response for {}: {}", target, e);
            Ok(None)
        }
    }
}

pub(crate) fn parse_destroy_body(public_id: &str, status: u16, body: &str) -> Result<DestroyResponse> {
    if !(200..300).contains(&status) {
        return Err(UploadError::rejected(public_id, status, error_message(status, body)));
    }

    serde_json::from_str::<DestroyResponse>(body).map_err(|e| {
        UploadError::rejected(public_id, status, format!("unreadable destroy response: {}", e))
    })
}

fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => format!("HTTP {}", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediastore_utils::string_to_sign;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// One HTTP request as seen by the fake service
    struct CapturedRequest {
        path: String,
        body: String,
    }

    /// Accepts a single request, answers with `status` and `reply`
    async fn serve_once(status: u16, reply: &'static str) -> (String, JoinHandle<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];

            let header_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before headers");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = find(&buf, b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let path = head.split_whitespace().nth(1).unwrap().to_string();
            let header = |name: &str| {
                head.lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
                    .map(|(_, value)| value.trim().to_string())
            };

            let body = if let Some(length) = header("content-length") {
                let length: usize = length.parse().unwrap();
                while buf.len() < header_end + length {
                    let n = socket.read(&mut chunk).await.unwrap();
                    assert!(n > 0, "connection closed before body");
                    buf.extend_from_slice(&chunk[..n]);
                }
                buf[header_end..header_end + length].to_vec()
            } else {
                while !buf.ends_with(b"0\r\n\r\n") {
                    let n = socket.read(&mut chunk).await.unwrap();
                    assert!(n > 0, "connection closed before last chunk");
                    buf.extend_from_slice(&chunk[..n]);
                }
                decode_chunked(&buf[header_end..])
            };

            let response = format!(
                "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reply.len(),
                reply
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            CapturedRequest {
                path,
                body: String::from_utf8_lossy(&body).to_string(),
            }
        });

        (base_url, handle)
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|window| window == needle)
    }

    fn decode_chunked(mut data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            let line_end = find(data, b"\r\n").unwrap();
            let size = usize::from_str_radix(
                std::str::from_utf8(&data[..line_end]).unwrap().trim(),
                16,
            )
            .unwrap();
            if size == 0 {
                return out;
            }
            let start = line_end + 2;
            out.extend_from_slice(&data[start..start + size]);
            data = &data[start + size + 2..];
        }
    }

    /// Value of a text field in a multipart body
    fn form_field(body: &str, name: &str) -> Option<String> {
        let marker = format!("name=\"{}\"\r\n\r\n", name);
        let start = body.find(&marker)? + marker.len();
        let end = body[start..].find("\r\n")?;
        Some(body[start..start + end].to_string())
    }

    fn local_api(base_url: &str) -> HttpApi {
        let credentials = CloudinaryCredentials::new("demo", "1234", "secret").unwrap();
        HttpApi::new(Arc::new(credentials), base_url, Duration::from_secs(5)).unwrap()
    }

    fn api() -> HttpApi {
        let credentials = CloudinaryCredentials::new("demo", "1234", "secret").unwrap();
        HttpApi::new(Arc::new(credentials), "https://api.cloudinary.com/", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint() {
        let api = api();
        assert_eq!(
            api.endpoint(ResourceKind::Image, "upload"),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
        assert_eq!(
            api.endpoint(ResourceKind::Raw, "destroy"),
            "https://api.cloudinary.com/v1_1/demo/raw/destroy"
        );
    }

    #[test]
    fn test_signed_params() {
        let params = api().signed_params(
            vec![("public_id", "u123".to_string()), ("folder", "avatars".to_string())],
            1700000000,
        );

        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
                .unwrap()
        };

        assert_eq!(get("api_key"), "1234");
        assert_eq!(get("timestamp"), "1700000000");
        assert_eq!(
            string_to_sign(&[
                ("public_id", "u123".to_string()),
                ("folder", "avatars".to_string()),
                ("timestamp", "1700000000".to_string()),
            ]),
            "folder=avatars&public_id=u123&timestamp=1700000000"
        );
        // api_key is not part of the signed string
        assert_eq!(
            get("signature"),
            mediastore_utils::compute_sha1_bytes(
                b"folder=avatars&public_id=u123&timestamp=1700000000secret"
            )
        );
    }

    #[test]
    fn test_request_target() {
        let request = UploadRequest {
            kind: ResourceKind::Image,
            folder: Some("avatars".to_string()),
            public_id: Some("u123".to_string()),
        };
        assert_eq!(request.target(), "avatars/u123");

        let request = UploadRequest {
            kind: ResourceKind::Image,
            folder: None,
            public_id: None,
        };
        assert_eq!(request.target(), "<assigned>");
    }

    #[test]
    fn test_parse_upload_success() {
        let body = r#"{"public_id":"avatars/u123","secure_url":"https://cdn/x.png","bytes":42}"#;
        let response = parse_upload_body("avatars/u123", 200, body).unwrap().unwrap();
        assert_eq!(response.secure_url, "https://cdn/x.png");
        assert_eq!(response.public_id.as_deref(), Some("avatars/u123"));
    }

    #[test]
    fn test_parse_upload_without_result() {
        assert!(parse_upload_body("t", 200, "").unwrap().is_none());
        assert!(parse_upload_body("t", 200, "{}").unwrap().is_none());
        assert!(parse_upload_body("t", 200, r#"{"secure_url":""}"#).unwrap().is_none());
        assert!(parse_upload_body("t", 200, "<html>").unwrap().is_none());
    }

    #[test]
    fn test_parse_upload_error_keeps_vendor_message() {
        let body = r#"{"error":{"message":"Invalid Signature 0a1b"}}"#;
        let err = parse_upload_body("avatars/u123", 401, body).unwrap_err();
        match err {
            UploadError::Rejected { target, status, message } => {
                assert_eq!(target, "avatars/u123");
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid Signature 0a1b");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = parse_upload_body("t", 502, "").unwrap_err();
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[test]
    fn test_parse_destroy() {
        assert_eq!(parse_destroy_body("u123", 200, r#"{"result":"ok"}"#).unwrap().result, "ok");
        assert_eq!(
            parse_destroy_body("u123", 200, r#"{"result":"not found"}"#).unwrap().result,
            "not found"
        );
        assert!(parse_destroy_body("u123", 200, "garbage").is_err());
        assert!(matches!(
            parse_destroy_body("u123", 403, r#"{"error":{"message":"denied"}}"#),
            Err(UploadError::Rejected { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn test_upload_sends_signed_multipart_form() {
        let (base_url, server) = serve_once(
            200,
            r#"{"public_id":"avatars/u123","secure_url":"https://cdn/avatars/u123.png"}"#,
        )
        .await;

        let request = UploadRequest {
            kind: ResourceKind::Image,
            folder: Some("avatars".to_string()),
            public_id: Some("u123".to_string()),
        };
        let response = local_api(&base_url)
            .upload(request, Bytes::from_static(b"PNGDATA"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(response.secure_url, "https://cdn/avatars/u123.png");
        assert_eq!(response.public_id.as_deref(), Some("avatars/u123"));

        let captured = server.await.unwrap();
        assert_eq!(captured.path, "/v1_1/demo/image/upload");

        let body = &captured.body;
        assert_eq!(form_field(body, "folder").as_deref(), Some("avatars"));
        assert_eq!(form_field(body, "public_id").as_deref(), Some("u123"));
        assert_eq!(form_field(body, "api_key").as_deref(), Some("1234"));
        assert!(body.contains("name=\"file\"; filename=\"u123\""));
        assert!(body.contains("PNGDATA"));

        let timestamp = form_field(body, "timestamp").unwrap();
        let expected = sign_params(
            &[
                ("folder", "avatars".to_string()),
                ("public_id", "u123".to_string()),
                ("timestamp", timestamp),
            ],
            "secret",
        );
        assert_eq!(form_field(body, "signature"), Some(expected));
    }

    #[tokio::test]
    async fn test_upload_rejection_keeps_vendor_message() {
        let (base_url, server) =
            serve_once(401, r#"{"error":{"message":"Invalid Signature 0a1b"}}"#).await;

        let request = UploadRequest {
            kind: ResourceKind::Raw,
            folder: None,
            public_id: Some("resume.pdf".to_string()),
        };
        let err = local_api(&base_url)
            .upload(request, Bytes::from_static(b"%PDF"))
            .await
            .unwrap_err();

        match err {
            UploadError::Rejected { target, status, message } => {
                assert_eq!(target, "resume.pdf");
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid Signature 0a1b");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let captured = server.await.unwrap();
        assert_eq!(captured.path, "/v1_1/demo/raw/upload");
        assert!(form_field(&captured.body, "folder").is_none());
    }

    #[tokio::test]
    async fn test_destroy_posts_signed_form_to_kind_endpoint() {
        let (base_url, server) = serve_once(200, r#"{"result":"ok"}"#).await;

        let response = local_api(&base_url)
            .destroy("resume.pdf", ResourceKind::Raw)
            .await
            .unwrap();
        assert_eq!(response.result, "ok");

        let captured = server.await.unwrap();
        assert_eq!(captured.path, "/v1_1/demo/raw/destroy");

        let fields: std::collections::HashMap<&str, &str> = captured
            .body
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .collect();
        assert_eq!(fields.get("public_id"), Some(&"resume.pdf"));
        assert_eq!(fields.get("api_key"), Some(&"1234"));

        let timestamp = fields["timestamp"].to_string();
        let expected = sign_params(
            &[("public_id", "resume.pdf".to_string()), ("timestamp", timestamp)],
            "secret",
        );
        assert_eq!(fields.get("signature"), Some(&expected.as_str()));
    }
}
