#![cfg(feature = "async")]

use rustydom::{parse_async, parse_reader, parse_with_options, Error, ParseOptions, StreamingParser};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

/// Async reader that hands out a few bytes per poll and yields in between
struct Trickle {
    data: Vec<u8>,
    pos: usize,
    step: usize,
    ready: bool,
}

impl Trickle {
    fn new(data: &[u8], step: usize) -> Self {
        Trickle { data: data.to_vec(), pos: 0, step, ready: false }
    }
}

impl AsyncRead for Trickle {
    fn poll_read(mut self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<std::io::Result<()>> {
        if !self.ready {
            self.ready = true;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }
        self.ready = false;
        let end = (self.pos + self.step).min(self.data.len()).min(self.pos + buf.remaining());
        let start = self.pos;
        buf.put_slice(&self.data[start..end]);
        self.pos = end;
        Poll::Ready(Ok(()))
    }
}

const DOCUMENT: &str = "<?xml version=\"1.0\"?>\n<root xmlns=\"urn:r\" xmlns:x=\"urn:x\">\
                        <x:item n=\"1\">caf\u{e9} &amp; cr\u{e8}me</x:item>\
                        <!-- \u{2603} --><item n=\"2\"/></root>\n";

#[tokio::test]
async fn test_async_matches_sync() {
    let options = ParseOptions::new().with_position_tracking(true);
    let expected = parse_with_options(DOCUMENT, &options).unwrap();
    let doc = parse_async(Trickle::new(DOCUMENT.as_bytes(), 5), &options).await.unwrap();

    assert_eq!(doc.node_count(), expected.node_count());
    for (a, b) in doc.descendants(doc.root()).zip(expected.descendants(expected.root())) {
        assert_eq!(doc.node_name(a), expected.node_name(b));
        assert_eq!(doc.namespace_uri(a), expected.namespace_uri(b));
        assert_eq!(doc.data(a), expected.data(b));
        assert_eq!(doc.position(a), expected.position(b));
        assert_eq!(doc.close_position(a), expected.close_position(b));
    }

    let root = doc.document_element().unwrap();
    let item = doc.first_child(root).unwrap();
    assert_eq!(doc.namespace_uri(item), Some("urn:x"));
    assert_eq!(doc.text_content(item), "caf\u{e9} & cr\u{e8}me");
}

#[tokio::test]
async fn test_async_from_slice() {
    let doc = parse_async(&b"<a><b/></a>"[..], &ParseOptions::default()).await.unwrap();
    let a = doc.document_element().unwrap();
    assert_eq!(doc.child_element_count(a), 1);
}

#[tokio::test]
async fn test_async_error_rejects() {
    let err = parse_async(Trickle::new(b"<root>&nope;</root>", 2), &ParseOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UndefinedEntity { .. }));

    let err = parse_async(Trickle::new(b"skeet", 2), &ParseOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TextOutsideRoot { .. }));
}

#[tokio::test]
async fn test_async_utf16() {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in "<a>\u{1F600}</a>".encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    let doc = parse_async(Trickle::new(&bytes, 3), &ParseOptions::default()).await.unwrap();
    let a = doc.document_element().unwrap();
    assert_eq!(doc.text_content(a), "\u{1F600}");
}

#[test]
fn test_reader_matches_sync() {
    let expected = rustydom::parse(DOCUMENT).unwrap();
    let doc = parse_reader(DOCUMENT.as_bytes(), &ParseOptions::default()).unwrap();
    assert_eq!(doc.node_count(), expected.node_count());
}

#[test]
fn test_byte_at_a_time() {
    let options = ParseOptions::new().with_position_tracking(true);
    let mut parser = StreamingParser::new(&options);
    for byte in DOCUMENT.as_bytes() {
        parser.feed(std::slice::from_ref(byte)).unwrap();
    }
    let doc = parser.finish().unwrap();

    let expected = parse_with_options(DOCUMENT, &options).unwrap();
    let positions: Vec<_> = doc.descendants(doc.root()).map(|id| doc.position(id)).collect();
    let expected_positions: Vec<_> = expected.descendants(expected.root()).map(|id| expected.position(id)).collect();
    assert_eq!(positions, expected_positions);
}

#[test]
fn test_invalid_utf8() {
    let err = parse_reader(&b"<a>\xFF\xFE\xFD</a>"[..], &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Encoding(_)));
}
