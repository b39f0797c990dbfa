//! Diagnostic output tests.
//!
//! Warnings are human-readable lines on the diagnostic stream, never part
//! of the programmatic contract; these tests only pin down when they are
//! and are not emitted.

use parking_lot::Mutex;
use serde_json::json;
use std::io;
use std::sync::Arc;
use topichub::{ConfigPatch, HubOptions, TopicHub};

#[derive(Clone)]
struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a capturing subscriber installed and return everything it
/// logged.
fn captured<F: FnOnce()>(f: F) -> String {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer = CaptureWriter(buffer.clone());
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = buffer.lock().clone();
    String::from_utf8(bytes).unwrap()
}

fn dev_hub() -> TopicHub {
    TopicHub::with_options(HubOptions {
        dev_warnings: true,
        equality: None,
    })
}

#[test]
fn test_suppressed_publish_warns_exactly_once() {
    let hub = dev_hub();
    let _sub = hub.subscribe("counter", json!(1), |_| {}).unwrap();

    let output = captured(|| {
        hub.publish("counter", json!(1)).unwrap();
    });

    assert_eq!(output.matches("unchanged state").count(), 1);
    assert!(output.contains("counter"));
}

#[test]
fn test_each_suppressed_publish_warns_again() {
    let hub = dev_hub();
    let _sub = hub.subscribe("t", json!(1), |_| {}).unwrap();

    let output = captured(|| {
        hub.publish("t", json!(1)).unwrap();
        hub.publish("t", json!(1)).unwrap();
    });

    assert_eq!(output.matches("unchanged state").count(), 2);
}

#[test]
fn test_global_flag_silences_suppression_warning() {
    let hub = dev_hub();
    hub.configure(ConfigPatch {
        suppress_dupe_state_warning: Some(true),
        ..Default::default()
    });
    let _sub = hub.subscribe("t", json!(1), |_| {}).unwrap();

    let output = captured(|| {
        hub.publish("t", json!(1)).unwrap();
    });

    assert!(!output.contains("unchanged state"));
    // The publish was still suppressed, just quietly.
    assert_eq!(hub.stats().suppressed_count, 1);
}

#[test]
fn test_no_suppression_warning_outside_dev_mode() {
    let hub = TopicHub::with_options(HubOptions {
        dev_warnings: false,
        equality: None,
    });
    let _sub = hub.subscribe("t", json!(1), |_| {}).unwrap();

    let output = captured(|| {
        hub.publish("t", json!(1)).unwrap();
    });

    assert!(!output.contains("unchanged state"));
    assert_eq!(hub.stats().suppressed_count, 1);
}

#[test]
fn test_delivered_publish_does_not_warn() {
    let hub = dev_hub();
    let _sub = hub.subscribe("t", json!(1), |_| {}).unwrap();

    let output = captured(|| {
        hub.publish("t", json!(2)).unwrap();
    });

    assert!(!output.contains("unchanged state"));
}

#[test]
fn test_delete_topic_always_warns() {
    let hub = dev_hub();
    let sub = hub.subscribe("doomed", json!(0), |_| {}).unwrap();
    sub.unsubscribe();

    // Deletion warns even with no live subscribers left to sever.
    let output = captured(|| {
        assert!(hub.delete_topic("doomed"));
    });

    assert_eq!(output.matches("topic deleted").count(), 1);
    assert!(output.contains("doomed"));
}

#[test]
fn test_delete_topic_warning_carries_severed_count() {
    let hub = dev_hub();
    let _a = hub.subscribe("shared", json!(0), |_| {}).unwrap();
    let _b = hub.subscribe("shared", json!(0), |_| {}).unwrap();

    let output = captured(|| {
        assert!(hub.delete_topic("shared"));
    });

    assert!(output.contains("topic deleted"));
    assert!(output.contains("severed=2"));
}
