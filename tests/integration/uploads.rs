//! Chunked uploads and batch uploads through the files client.

use crate::common::{init_tracing, MemoryFiles};
use std::io::Write;
use std::sync::{Arc, Mutex};
use xai_sdk::files::{BatchFile, BatchUploadOptions, UploadOptions};
use xai_sdk::{Error, FilesClient, Progress, UploadSource};

#[tokio::test]
async fn test_path_upload_is_framed_in_order() {
    init_tracing();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let payload: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    file.write_all(&payload).unwrap();

    let transport = Arc::new(MemoryFiles::default());
    let client = FilesClient::new(transport.clone()).with_frame_size(4096);

    let reports = Arc::new(Mutex::new(Vec::new()));
    let sink = reports.clone();
    let meta = client
        .upload(
            UploadSource::path(file.path()),
            UploadOptions::new().on_progress(Progress::by_total(move |done, total| {
                sink.lock().unwrap().push((done, total));
            })),
        )
        .await
        .unwrap();

    assert_eq!(meta.size, 10_000);
    let expected_name = file.path().file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(meta.filename, expected_name);

    let uploads = transport.uploads.lock().unwrap();
    let (_, body, frames) = &uploads[0];
    assert_eq!(body, &payload);
    assert_eq!(*frames, 3);
    assert_eq!(
        *reports.lock().unwrap(),
        vec![(4096, Some(10_000)), (8192, Some(10_000)), (10_000, Some(10_000))]
    );
}

#[tokio::test]
async fn test_bytes_upload_needs_a_name() {
    let client = FilesClient::new(Arc::new(MemoryFiles::default()));
    let err = client
        .upload(UploadSource::bytes(&b"hello"[..]), UploadOptions::new())
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let meta = client
        .upload(
            UploadSource::bytes(&b"hello"[..]),
            UploadOptions::new().filename("greeting.txt"),
        )
        .await
        .unwrap();
    assert_eq!(meta.filename, "greeting.txt");
    assert_eq!(meta.size, 5);
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let client = FilesClient::new(Arc::new(MemoryFiles::default()));
    let err = client
        .upload(UploadSource::path("/definitely/not/here.bin"), UploadOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn test_batch_upload_records_each_file() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let mut files: Vec<BatchFile> = Vec::new();
    for i in 0..4 {
        let path = dir.path().join(format!("doc-{}.txt", i));
        std::fs::write(&path, format!("document {}", i)).unwrap();
        files.push(path.into());
    }
    files.insert(
        2,
        BatchFile::Bytes {
            name: "reject-me.bin".to_string(),
            data: bytes::Bytes::from_static(b"nope"),
        },
    );
    files.push(dir.path().join("missing.txt").into());

    let transport = Arc::new(MemoryFiles::default());
    let client = FilesClient::new(transport.clone());

    let completed = Arc::new(Mutex::new(Vec::new()));
    let sink = completed.clone();
    let ledger = client
        .batch_upload(
            files,
            BatchUploadOptions::new()
                .batch_size(2)
                .on_file_complete(move |i, _, result| sink.lock().unwrap().push((i, result.is_ok()))),
        )
        .await
        .unwrap();

    assert_eq!(ledger.len(), 6);
    assert_eq!(ledger.success_count(), 4);
    assert_eq!(ledger.failure_count(), 2);
    assert!(matches!(ledger.get(2), Some(Err(Error::Remote { status: 413, .. }))));
    assert!(matches!(ledger.get(5), Some(Err(Error::NotFound { .. }))));
    let names: Vec<String> = ledger.successes().map(|(_, m)| m.filename.clone()).collect();
    assert_eq!(names, vec!["doc-0.txt", "doc-1.txt", "doc-2.txt", "doc-3.txt"]);

    let mut completed = completed.lock().unwrap().clone();
    assert_eq!(completed.len(), 6);
    completed.sort();
    assert_eq!(completed[2], (2, false));
    assert_eq!(transport.uploads.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn test_empty_batch_is_rejected() {
    let client = FilesClient::new(Arc::new(MemoryFiles::default()));
    let err = client
        .batch_upload(Vec::<BatchFile>::new(), BatchUploadOptions::new())
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_uploaded_file_can_be_read_back_and_deleted() {
    init_tracing();
    let client = FilesClient::new(Arc::new(MemoryFiles::default()));
    let payload: Vec<u8> = (0..5_000u32).map(|i| (i % 97) as u8).collect();
    let meta = client
        .upload(
            UploadSource::bytes(payload.clone()),
            UploadOptions::new().filename("table.bin"),
        )
        .await
        .unwrap();

    let fetched = client.get(&meta.id).await.unwrap();
    assert_eq!(fetched.filename, "table.bin");
    assert_eq!(fetched.size, 5_000);
    assert_eq!(client.content(&meta.id).await.unwrap().to_vec(), payload);

    assert!(client.delete(&meta.id).await.unwrap().deleted);
    assert!(matches!(
        client.content(&meta.id).await,
        Err(Error::Remote { status: 404, .. })
    ));
}
