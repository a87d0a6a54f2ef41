//! Integration tests: capture and touch sessions over a real TCP
//! connection on localhost, with a fake device-side helper on the
//! other end.

use std::time::Duration;

use minicast_core::{
    BANNER_SIZE, CancellationToken, CaptureBanner, CaptureConfig, CaptureStream, FrameSink,
    MinicastError, Quirks, TouchConfig, TouchSession, Viewport,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

// ── Helpers ──────────────────────────────────────────────────────

/// Bind on an OS-assigned port and connect a client to it.
async fn connected_pair() -> (TcpStream, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let client = tokio::spawn(async move { TcpStream::connect(addr).await.unwrap() });
    let (server, _) = listener.accept().await.unwrap();
    (server, client.await.unwrap())
}

fn device_banner() -> CaptureBanner {
    CaptureBanner {
        version: 1,
        banner_length: BANNER_SIZE as u8,
        pid: 31337,
        real_width: 1080,
        real_height: 1920,
        virtual_width: 540,
        virtual_height: 960,
        orientation: 90,
        quirks: Quirks::DUMB | Quirks::ALWAYS_UPRIGHT,
    }
}

fn capture_stream_bytes(frames: &[Vec<u8>]) -> Vec<u8> {
    let mut data = device_banner().encode().to_vec();
    for frame in frames {
        data.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        data.extend_from_slice(frame);
    }
    data
}

// ── Capture ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_capture_over_tcp_with_odd_writes() {
    let (mut device, client) = connected_pair().await;

    let frames: Vec<Vec<u8>> = vec![
        vec![0xAB; 5000],
        Vec::new(),
        (0..=255u8).collect(),
        b"tail".to_vec(),
    ];
    let data = capture_stream_bytes(&frames);

    let writer = tokio::spawn(async move {
        // Uneven write sizes so field and frame boundaries straddle reads.
        let mut offset = 0;
        let mut step = 1;
        while offset < data.len() {
            let end = (offset + step).min(data.len());
            device.write_all(&data[offset..end]).await.unwrap();
            device.flush().await.unwrap();
            offset = end;
            step = step % 97 + 13;
            tokio::task::yield_now().await;
        }
        device.shutdown().await.unwrap();
    });

    let sink = FrameSink::new();
    let config = CaptureConfig {
        read_buffer_size: 333,
        ..Default::default()
    };
    let mut stream = CaptureStream::new(client, sink.clone(), &config).unwrap();
    let summary = tokio::time::timeout(Duration::from_secs(5), stream.run(CancellationToken::new()))
        .await
        .expect("timeout")
        .unwrap();
    writer.await.unwrap();

    assert_eq!(summary.frames, frames.len() as u64);
    assert_eq!(summary.discarded, 0);
    assert_eq!(stream.banner(), Some(&device_banner()));

    let received = sink.drain();
    assert_eq!(received.len(), frames.len());
    for (got, want) in received.iter().zip(&frames) {
        assert_eq!(&got[..], &want[..]);
    }

    stream.close().await;
    stream.close().await;
}

#[tokio::test]
async fn test_capture_notices_reach_subscriber() {
    let (mut device, client) = connected_pair().await;
    let data = capture_stream_bytes(&[b"one".to_vec(), b"three".to_vec()]);

    let sink = FrameSink::new();
    let mut notices = sink.subscribe();

    let mut stream = CaptureStream::new(client, sink.clone(), &CaptureConfig::default()).unwrap();
    let runner = tokio::spawn(async move { stream.run(CancellationToken::new()).await });

    device.write_all(&data).await.unwrap();
    device.shutdown().await.unwrap();

    let first = tokio::time::timeout(Duration::from_secs(5), notices.recv())
        .await
        .expect("timeout")
        .unwrap();
    let second = notices.recv().await.unwrap();
    assert_eq!((first.sequence, first.len), (1, 3));
    assert_eq!((second.sequence, second.len), (2, 5));

    let summary = runner.await.unwrap().unwrap();
    assert_eq!(summary.frames, 2);
}

#[tokio::test]
async fn test_capture_truncated_by_peer() {
    let (mut device, client) = connected_pair().await;
    let mut data = capture_stream_bytes(&[b"whole".to_vec()]);
    data.extend_from_slice(&100u32.to_le_bytes());
    data.extend_from_slice(&[1, 2, 3]);

    device.write_all(&data).await.unwrap();
    drop(device);

    let sink = FrameSink::new();
    let mut stream = CaptureStream::new(client, sink.clone(), &CaptureConfig::default()).unwrap();
    let summary = tokio::time::timeout(Duration::from_secs(5), stream.run(CancellationToken::new()))
        .await
        .expect("timeout")
        .unwrap();

    assert_eq!(summary.frames, 1);
    assert_eq!(summary.discarded, 3);
    assert_eq!(sink.try_dequeue().unwrap(), "whole");
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_capture_cancellation_between_reads() {
    let (mut device, client) = connected_pair().await;
    let cancel = CancellationToken::new();

    let sink = FrameSink::new();
    let mut notices = sink.subscribe();
    let mut stream = CaptureStream::new(client, sink, &CaptureConfig::default()).unwrap();
    let runner = {
        let cancel = cancel.clone();
        tokio::spawn(async move { stream.run(cancel).await })
    };

    device
        .write_all(&capture_stream_bytes(&[b"frame".to_vec()]))
        .await
        .unwrap();
    notices.recv().await.unwrap();

    // The loop is parked in a read; cancel, then unblock it with one
    // more chunk so the token is observed on the next cycle.
    cancel.cancel();
    device.write_all(&[0]).await.unwrap();

    let summary = tokio::time::timeout(Duration::from_secs(5), runner)
        .await
        .expect("timeout")
        .unwrap()
        .unwrap();
    assert!(summary.cancelled);
    assert_eq!(summary.frames, 1);
}

// ── Touch ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_touch_session_round_trip() {
    let (mut device, client) = connected_pair().await;

    device
        .write_all(b"v 1\n^ 10 32767 32767 2048\n$ 999\n")
        .await
        .unwrap();

    let viewport = Viewport::new(1000, 2000).unwrap();
    let mut session = TouchSession::connect(client, viewport, &TouchConfig::default())
        .await
        .unwrap();
    assert_eq!(session.banner().pid, 999);

    session.set_pointer(500, 1000);
    session.tap_down().await.unwrap();
    session.set_pointer(1000, 2000);
    session.swipe().await.unwrap();
    session.tap_up().await.unwrap();
    session.close().await;
    session.close().await;

    let mut received = String::new();
    tokio::time::timeout(Duration::from_secs(5), device.read_to_string(&mut received))
        .await
        .expect("timeout")
        .unwrap();
    assert_eq!(
        received,
        "d 0 16383 16383 50\nc\nm 0 32767 32767 50\nc\nu 0\nc\n"
    );
}

#[tokio::test]
async fn test_touch_peer_hangs_up_before_banner() {
    let (device, client) = connected_pair().await;
    drop(device);

    let viewport = Viewport::new(10, 10).unwrap();
    let result = TouchSession::connect(client, viewport, &TouchConfig::default()).await;
    assert!(matches!(result, Err(MinicastError::ConnectionClosed)));
}
