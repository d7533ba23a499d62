use std::io::Write;
use std::path::PathBuf;
use std::sync::Once;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;
use watermark_engine::{
    Gateway, GatewayError, GatewayReply, GatewaySettings, Operation, ReqwestGateway, UploadField,
    UploadRequest,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(watermark_logging::initialize_for_tests);
}

fn audio_fixture(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

fn gateway_for(base_url: String) -> ReqwestGateway {
    ReqwestGateway::new(GatewaySettings {
        base_url,
        ..GatewaySettings::default()
    })
    .unwrap()
}

fn request(operation: Operation, audio: PathBuf, message: Option<&str>) -> UploadRequest {
    let mut fields = vec![UploadField::File {
        name: "audio".to_string(),
        file_name: "song.wav".to_string(),
        path: audio,
    }];
    if let Some(message) = message {
        fields.push(UploadField::Text {
            name: "watermark".to_string(),
            value: message.to_string(),
        });
    }
    UploadRequest {
        submission_id: 1,
        operation,
        fields,
    }
}

#[tokio::test]
async fn embed_posts_multipart_and_decodes_filename() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embed"))
        .and(body_string_contains("name=\"watermark\""))
        .and(body_string_contains("top secret"))
        .and(body_string_contains("filename=\"song.wav\""))
        .and(body_string_contains("RIFF-bytes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"download_filename":"sealed_song.wav"}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let audio = audio_fixture(b"RIFF-bytes");
    let gateway = gateway_for(server.uri());
    let reply = gateway
        .submit(&request(
            Operation::Embed,
            audio.path().to_path_buf(),
            Some("top secret"),
        ))
        .await
        .expect("embed ok");

    assert_eq!(
        reply,
        GatewayReply::Embedded {
            download_filename: "sealed_song.wav".to_string()
        }
    );
}

#[tokio::test]
async fn detect_returns_sentinel_verbatim() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"watermark":"[No Watermark Found]"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let audio = audio_fixture(b"clean");
    let gateway = gateway_for(server.uri());
    let reply = gateway
        .submit(&request(Operation::Detect, audio.path().to_path_buf(), None))
        .await
        .unwrap();

    assert_eq!(
        reply,
        GatewayReply::Detected {
            watermark: "[No Watermark Found]".to_string()
        }
    );
}

#[tokio::test]
async fn error_status_carries_server_text() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect"))
        .respond_with(
            ResponseTemplate::new(400).set_body_raw(r#"{"error":"bad file"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let audio = audio_fixture(b"junk");
    let gateway = gateway_for(server.uri());
    let reply = gateway
        .submit(&request(Operation::Detect, audio.path().to_path_buf(), None))
        .await
        .unwrap();

    assert_eq!(
        reply,
        GatewayReply::Rejected {
            status: 400,
            error: "bad file".to_string()
        }
    );
}

#[tokio::test]
async fn base_url_prefix_is_kept() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/watermark/detect"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"watermark":"hi"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let audio = audio_fixture(b"sealed");
    let gateway = gateway_for(format!("{}/watermark/", server.uri()));
    let reply = gateway
        .submit(&request(Operation::Detect, audio.path().to_path_buf(), None))
        .await
        .unwrap();

    assert_eq!(
        reply,
        GatewayReply::Detected {
            watermark: "hi".to_string()
        }
    );
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    init_logging();
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let audio = audio_fixture(b"x");
    let gateway = gateway_for(format!("http://{addr}"));
    let err = gateway
        .submit(&request(Operation::Embed, audio.path().to_path_buf(), Some("m")))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Transport(_)), "{err:?}");
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn missing_file_fails_before_sending() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let gateway = gateway_for(server.uri());
    let err = gateway
        .submit(&request(
            Operation::Detect,
            PathBuf::from("/definitely/not/here.wav"),
            None,
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::FileAccess { .. }));
}

#[tokio::test]
async fn oversized_upload_is_refused_locally() {
    init_logging();
    let server = MockServer::start().await;
    let audio = audio_fixture(b"0123456789");
    let gateway = ReqwestGateway::new(GatewaySettings {
        base_url: server.uri(),
        max_upload_bytes: 4,
        ..GatewaySettings::default()
    })
    .unwrap();

    let err = gateway
        .submit(&request(Operation::Detect, audio.path().to_path_buf(), None))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        GatewayError::TooLarge {
            max_bytes: 4,
            actual: 10
        }
    );
}

#[tokio::test]
async fn download_fetches_bytes_and_checks_status() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/sealed_song.wav"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"WAVDATA".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/download/gone.wav"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let gateway = gateway_for(server.uri());
    let bytes = gateway.download("sealed_song.wav").await.unwrap();
    assert_eq!(&bytes[..], b"WAVDATA");

    let err = gateway.download("gone.wav").await.unwrap_err();
    assert_eq!(err, GatewayError::HttpStatus(404));
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ReqwestGateway::new(GatewaySettings {
        base_url: "not a url".to_string(),
        ..GatewaySettings::default()
    })
    .unwrap_err();
    assert!(matches!(err, GatewayError::InvalidUrl(_)));
}
