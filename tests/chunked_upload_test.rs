//! Chunked upload behaviour against a scripted transport

mod support {
    pub mod mock_transport;
}

use std::io::Write;
use std::sync::{Arc, Mutex};

use appwrite_core::response::deserialize;
use appwrite_core::{
    AppwriteError, Boundary, Client, ClientConfig, HttpMethod, InputFile, Params, UploadProgress,
    UploadRequest,
};
use serde::Deserialize;
use serde_json::json;
use support::mock_transport::{MockTransport, count, json_response};

const CHUNK: usize = 10;
const BUCKET_FILES: &str = "/storage/buckets/photos/files";

#[derive(Debug, Deserialize)]
struct FileDoc {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "chunksUploaded")]
    chunks_uploaded: i64,
}

fn client(transport: Arc<MockTransport>) -> Client {
    let config = ClientConfig::builder()
        .endpoint("https://cloud.example.com/v1")
        .chunk_size(CHUNK)
        .boundary(Boundary::new("testboundary0000"))
        .build()
        .unwrap();
    Client::with_transport(config, transport)
}

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| b'a' + (i % 26) as u8).collect()
}

/// Answers chunk POSTs like the server: `$id` plus a running chunk count.
fn chunk_server(lookup_status: u16) -> Arc<MockTransport> {
    MockTransport::new(move |req| {
        if req.method == HttpMethod::Get {
            return Ok(match lookup_status {
                200 => json_response(200, json!({"$id": "abc", "chunksTotal": 3, "chunksUploaded": 2})),
                status => json_response(
                    status,
                    json!({"message": "File not found", "type": "storage_file_not_found"}),
                ),
            });
        }
        let range = req.header("content-range").unwrap_or_default().to_string();
        let start: usize = range
            .trim_start_matches("bytes ")
            .split('-')
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        Ok(json_response(
            201,
            json!({"$id": "abc", "chunksTotal": 3, "chunksUploaded": start / CHUNK + 1}),
        ))
    })
}

fn upload_params(data: Vec<u8>) -> Params {
    Params::new()
        .with("fileId", "abc")
        .with("file", InputFile::from_bytes(data, "photo.jpg", "image/jpeg"))
        .with("permissions", vec!["read(\"any\")"])
}

#[tokio::test]
async fn two_and_a_half_chunks_issue_three_ranged_requests() {
    let transport = chunk_server(404);
    let progress = Arc::new(Mutex::new(Vec::<UploadProgress>::new()));
    let sink = progress.clone();

    let request = UploadRequest::new(BUCKET_FILES, upload_params(payload(25)), "file")
        .on_progress(move |p| sink.lock().unwrap().push(p));
    let doc: FileDoc = client(transport.clone())
        .chunked_upload(request, deserialize)
        .await
        .unwrap();
    assert_eq!(doc.id, "abc");
    assert_eq!(doc.chunks_uploaded, 3);

    let posts: Vec<_> = transport
        .requests()
        .into_iter()
        .filter(|r| r.method == HttpMethod::Post)
        .collect();
    assert_eq!(posts.len(), 3);
    let ranges: Vec<_> = posts.iter().map(|r| r.header("content-range").unwrap()).collect();
    assert_eq!(ranges, vec!["bytes 0-9/25", "bytes 10-19/25", "bytes 20-24/25"]);

    // Chunks after the first are tied to the created resource.
    assert!(posts[0].header("x-appwrite-id").is_none());
    assert_eq!(posts[1].header("x-appwrite-id"), Some("abc"));
    assert_eq!(posts[2].header("x-appwrite-id"), Some("abc"));

    // Chunked requests never declare a total length.
    assert!(posts.iter().all(|r| r.header("content-length").is_none()));

    let data = payload(25);
    for (post, slice) in posts.iter().zip([&data[0..10], &data[10..20], &data[20..25]]) {
        assert_eq!(count(&post.body, slice), 1);
        assert_eq!(count(&post.body, b"filename=\"photo.jpg\""), 1);
        assert_eq!(count(&post.body, b"name=\"permissions[]\""), 1);
    }

    let progress = progress.lock().unwrap();
    let percents: Vec<f64> = progress.iter().map(|p| p.progress).collect();
    assert_eq!(percents, vec![40.0, 80.0, 100.0]);
    let uploaded: Vec<usize> = progress.iter().map(|p| p.size_uploaded).collect();
    assert_eq!(uploaded, vec![10, 20, 25]);
    assert!(progress.iter().all(|p| p.id == "abc" && p.chunks_total == 3));
}

#[tokio::test]
async fn resumes_from_server_reported_chunks() {
    let transport = chunk_server(200);
    let request =
        UploadRequest::new(BUCKET_FILES, upload_params(payload(25)), "file").id_param("fileId");
    client(transport.clone())
        .chunked_upload(request, Ok)
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, HttpMethod::Get);
    assert_eq!(
        requests[0].url,
        "https://cloud.example.com/v1/storage/buckets/photos/files/abc"
    );
    assert_eq!(requests[1].header("content-range"), Some("bytes 20-24/25"));
}

#[tokio::test]
async fn fully_uploaded_resource_sends_no_chunks() {
    let transport = MockTransport::new(|req| {
        assert_eq!(req.method, HttpMethod::Get);
        Ok(json_response(200, json!({"$id": "abc", "chunksTotal": 3, "chunksUploaded": 3})))
    });
    let progress_calls = Arc::new(Mutex::new(0usize));
    let sink = progress_calls.clone();
    let request = UploadRequest::new(BUCKET_FILES, upload_params(payload(25)), "file")
        .id_param("fileId")
        .on_progress(move |_| *sink.lock().unwrap() += 1);

    let map = client(transport.clone())
        .chunked_upload(request, Ok)
        .await
        .unwrap();
    assert!(map.is_empty());
    assert_eq!(transport.requests().len(), 1);
    assert_eq!(*progress_calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn missing_resource_on_lookup_starts_from_zero() {
    let transport = chunk_server(404);
    let request =
        UploadRequest::new(BUCKET_FILES, upload_params(payload(25)), "file").id_param("fileId");
    let result = client(transport.clone()).chunked_upload(request, Ok).await;
    assert!(result.is_ok());

    let requests = transport.requests();
    assert_eq!(requests.len(), 4);
    assert_eq!(requests[0].method, HttpMethod::Get);
    assert_eq!(requests[1].header("content-range"), Some("bytes 0-9/25"));
}

#[tokio::test]
async fn exact_multiple_of_chunk_size_ends_at_full_progress() {
    let transport = chunk_server(404);
    let progress = Arc::new(Mutex::new(Vec::<f64>::new()));
    let sink = progress.clone();
    let request = UploadRequest::new(BUCKET_FILES, upload_params(payload(20)), "file")
        .on_progress(move |p| sink.lock().unwrap().push(p.progress));
    client(transport.clone())
        .chunked_upload(request, Ok)
        .await
        .unwrap();

    let ranges: Vec<_> = transport
        .requests()
        .iter()
        .map(|r| r.header("content-range").unwrap().to_string())
        .collect();
    assert_eq!(ranges, vec!["bytes 0-9/20", "bytes 10-19/20"]);
    assert_eq!(*progress.lock().unwrap(), vec![50.0, 100.0]);
}

#[tokio::test]
async fn small_file_is_sent_as_one_plain_request() {
    let transport = MockTransport::new(|_| Ok(json_response(201, json!({"$id": "small"}))));
    let progress_calls = Arc::new(Mutex::new(0usize));
    let sink = progress_calls.clone();
    let request = UploadRequest::new(BUCKET_FILES, upload_params(payload(9)), "file")
        .id_param("fileId")
        .on_progress(move |_| *sink.lock().unwrap() += 1);

    let map = client(transport.clone())
        .chunked_upload(request, Ok)
        .await
        .unwrap();
    assert_eq!(map["$id"], "small");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].header("content-range").is_none());
    assert!(requests[0].header("content-length").is_some());
    assert_eq!(*progress_calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn failing_chunk_propagates_and_stops() {
    let transport = MockTransport::new(|req| {
        if req.header("content-range") == Some("bytes 10-19/25") {
            return Ok(json_response(503, json!({"message": "Storage busy", "type": "general_unknown"})));
        }
        Ok(json_response(201, json!({"$id": "abc", "chunksUploaded": 1})))
    });
    let request = UploadRequest::new(BUCKET_FILES, upload_params(payload(25)), "file");
    let err = client(transport.clone())
        .chunked_upload(request, Ok)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(503));
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn transport_failure_on_lookup_is_swallowed() {
    let transport = MockTransport::new(|req| {
        if req.method == HttpMethod::Get {
            return Err(AppwriteError::Transport("connection reset".into()));
        }
        Ok(json_response(201, json!({"$id": "abc"})))
    });
    let request =
        UploadRequest::new(BUCKET_FILES, upload_params(payload(15)), "file").id_param("fileId");
    client(transport.clone())
        .chunked_upload(request, Ok)
        .await
        .unwrap();
    assert_eq!(transport.requests().len(), 3);
}

#[tokio::test]
async fn path_sourced_file_is_read_before_upload() {
    let mut tmp = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    tmp.write_all(&payload(12)).unwrap();

    let transport = chunk_server(404);
    let params = Params::new().with("file", InputFile::from_path(tmp.path()));
    let request = UploadRequest::new(BUCKET_FILES, params, "file");
    client(transport.clone())
        .chunked_upload(request, Ok)
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(count(&requests[0].body, b"Content-Disposition: form-data; name=\"file\"; filename=\""), 1);
    assert_eq!(requests[1].header("content-range"), Some("bytes 10-11/12"));
}

#[tokio::test]
async fn unreadable_path_aborts_before_any_request() {
    let transport = chunk_server(404);
    let params = Params::new().with("file", InputFile::from_path("/no/such/upload.bin"));
    let err = client(transport.clone())
        .chunked_upload(UploadRequest::new(BUCKET_FILES, params, "file"), Ok)
        .await
        .unwrap_err();
    assert!(matches!(err, AppwriteError::Io { .. }));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn non_file_parameter_is_rejected() {
    let transport = chunk_server(404);
    let params = Params::new().with("file", "not a file");
    let err = client(transport.clone())
        .chunked_upload(UploadRequest::new(BUCKET_FILES, params, "file"), Ok)
        .await
        .unwrap_err();
    assert!(matches!(err, AppwriteError::InvalidParameter(_)));
    assert!(transport.requests().is_empty());
}
