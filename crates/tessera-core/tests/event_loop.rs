//! Integration tests for the event loop with producer threads.

use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use tessera_core::logging::targets;
use tessera_core::{ControlFlow, EventLoop, MouseEvent, TesseraEvent};
use tracing_subscriber::EnvFilter;

/// Collects formatted log lines.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_events_from_producer_thread() {
    let mut event_loop = EventLoop::new();
    let sender = event_loop.sender();

    let producer = thread::spawn(move || {
        sender.send(TesseraEvent::Input(b"abc".to_vec())).unwrap();
        sender
            .send(TesseraEvent::Mouse {
                event: MouseEvent::LeftDown,
                x: 3,
                y: 4,
            })
            .unwrap();
        sender.send(TesseraEvent::Quit).unwrap();
    });
    producer.join().unwrap();

    let mut seen = Vec::new();
    event_loop
        .run(|_, event| {
            seen.push(event);
            ControlFlow::Continue
        })
        .unwrap();

    // Quit outranks everything and ends the loop before the rest is seen.
    assert!(seen.is_empty());
}

#[test]
fn test_handler_stops_loop() {
    let mut event_loop = EventLoop::new();
    let sender = event_loop.sender();

    let producer = thread::spawn(move || {
        for byte in b"xyz" {
            sender.send(TesseraEvent::Input(vec![*byte])).unwrap();
            thread::sleep(Duration::from_millis(2));
        }
    });

    let mut seen = Vec::new();
    event_loop
        .run(|_, event| {
            seen.push(event);
            if seen.len() == 3 {
                ControlFlow::Exit
            } else {
                ControlFlow::Continue
            }
        })
        .unwrap();
    producer.join().unwrap();

    assert_eq!(
        seen,
        vec![
            TesseraEvent::Input(b"x".to_vec()),
            TesseraEvent::Input(b"y".to_vec()),
            TesseraEvent::Input(b"z".to_vec()),
        ]
    );
}

#[test]
fn test_handler_can_arm_timers() {
    let mut event_loop = EventLoop::new();
    event_loop.post(TesseraEvent::WakeUp);

    let mut timer = None;
    let mut fired = false;
    event_loop
        .run(|event_loop, event| match event {
            TesseraEvent::WakeUp => {
                timer = Some(event_loop.start_timer(Duration::from_millis(5)));
                ControlFlow::Continue
            }
            TesseraEvent::Timer { id } => {
                fired = Some(id) == timer;
                ControlFlow::Exit
            }
            _ => ControlFlow::Continue,
        })
        .unwrap();

    assert!(fired);
}

#[test]
fn test_sender_fails_after_loop_dropped() {
    let event_loop = EventLoop::new();
    let sender = event_loop.sender();
    drop(event_loop);
    assert!(sender.send(TesseraEvent::WakeUp).is_err());
}

#[test]
fn test_loop_logs_under_its_target() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("{}=debug", targets::EVENT_LOOP)))
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut event_loop = EventLoop::new();
        event_loop.post(TesseraEvent::Quit);
        event_loop.run(|_, _| ControlFlow::Continue).unwrap();
    });

    let text = logs.contents();
    assert!(text.contains(targets::EVENT_LOOP));
    assert!(text.contains("event loop started"));
    assert!(text.contains("quit requested"));
}
