/*!
 * Tests for provider construction and the Google client over HTTP
 */

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use pdfswahili::app_config::{TranslationConfig, TranslationProvider};
use pdfswahili::errors::ProviderError;
use pdfswahili::providers::google::Google;
use pdfswahili::providers::mock::{MockBehavior, MockProvider};
use pdfswahili::providers::{create_provider, Provider};

/// Serve a single canned HTTP response on a random local port and return the
/// base URL. The request is read in full before answering.
async fn serve_once(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buffer = [0u8; 4096];
        loop {
            let read = socket.read(&mut buffer).await.unwrap();
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buffer[..read]);
            if request_complete(&request) {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
    });

    format!("http://{}", address)
}

fn request_complete(request: &[u8]) -> bool {
    let text = String::from_utf8_lossy(request);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    request.len() >= header_end + 4 + content_length
}

#[test]
fn test_createProvider_shouldBuildEveryConfiguredType() {
    let expected = [
        (TranslationProvider::Google, "google"),
        (TranslationProvider::Ollama, "ollama"),
        (TranslationProvider::OpenAI, "openai"),
        (TranslationProvider::Anthropic, "anthropic"),
        (TranslationProvider::LMStudio, "lmstudio"),
    ];

    for (provider_type, name) in expected {
        let config = TranslationConfig {
            provider: provider_type,
            ..TranslationConfig::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), name);
    }
}

#[test]
fn test_createProvider_withInvalidEndpoint_shouldFail() {
    let mut config = TranslationConfig {
        provider: TranslationProvider::Ollama,
        ..TranslationConfig::default()
    };
    config.active_provider_config_mut().endpoint = "   ".to_string();

    assert!(create_provider(&config).is_err());
}

#[test]
fn test_googleParseResponse_shouldJoinSegments() {
    let body = r#"[[["Habari ","Hello ",null,null,1],["dunia","world",null,null,1]],null,"en"]"#;
    assert_eq!(Google::parse_response(body).unwrap(), "Habari dunia");
}

#[tokio::test]
async fn test_google_withSuccessfulResponse_shouldReturnTranslation() {
    let endpoint = serve_once("200 OK", r#"[[["Habari dunia","Hello world",null,null,1]],null,"en"]"#).await;
    let google = Google::new(&endpoint, Duration::from_secs(5)).unwrap();

    let translated = google.translate_chunk("Hello world", "en", "sw").await.unwrap();

    assert_eq!(translated, "Habari dunia");
}

#[tokio::test]
async fn test_google_withServerError_shouldBeTransient() {
    let endpoint = serve_once("503 Service Unavailable", r#"{"error":"busy"}"#).await;
    let google = Google::new(&endpoint, Duration::from_secs(5)).unwrap();

    let error = google.translate_chunk("Hello", "en", "sw").await.unwrap_err();

    assert!(matches!(error, ProviderError::ApiError { status_code: 503, .. }));
    assert!(error.is_transient());
}

#[tokio::test]
async fn test_google_withForbidden_shouldBePermanent() {
    let endpoint = serve_once("403 Forbidden", r#"{"error":"blocked"}"#).await;
    let google = Google::new(&endpoint, Duration::from_secs(5)).unwrap();

    let error = google.translate_chunk("Hello", "en", "sw").await.unwrap_err();

    assert!(matches!(error, ProviderError::AuthenticationError(_)));
    assert!(!error.is_transient());
}

#[tokio::test]
async fn test_google_withUnreachableServer_shouldBeTransient() {
    // bind then drop to get a port with nothing listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let google = Google::new(&format!("http://{}", address), Duration::from_secs(2)).unwrap();
    let error = google.translate_chunk("Hello", "en", "sw").await.unwrap_err();

    assert!(error.is_transient(), "unexpected error {:?}", error);
}

#[tokio::test]
async fn test_google_withInvalidTarget_shouldNotSendRequest() {
    let google = Google::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();

    let error = google.translate_chunk("Hello", "en", "zz").await.unwrap_err();

    assert!(matches!(error, ProviderError::UnsupportedLanguage(_)));
}

#[tokio::test]
async fn test_mockProvider_emptyBehavior_shouldReturnTransientError() {
    let provider = MockProvider::new(MockBehavior::Empty);

    let error = provider.translate_chunk("Hello", "en", "sw").await.unwrap_err();

    assert!(matches!(error, ProviderError::ParseError(_)));
    assert!(error.is_transient());
}

#[tokio::test]
async fn test_mockProvider_slowBehavior_shouldDelayResponse() {
    let provider = MockProvider::slow(20);
    let start = std::time::Instant::now();

    let translated = provider.translate_chunk("Hello", "en", "sw").await.unwrap();

    assert_eq!(translated, MockProvider::translated("Hello", "sw"));
    assert!(start.elapsed() >= Duration::from_millis(20));
}
