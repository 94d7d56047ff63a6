//! Driving a [`WindowManager`] from an [`EventLoop`].

use std::time::Duration;

use tessera_core::logging::{span_names, targets};
use tessera_core::{ControlFlow, EventLoop, EventSender, Result, TesseraEvent, TimerId};
use tessera_render::{Backend, Size};

use crate::wm::WindowManager;

/// Couples the event loop, the window manager and a rendering backend.
///
/// Producer threads (terminal reader, child watcher) post
/// [`TesseraEvent`]s through [`sender`](Self::sender); each event is applied
/// to the window manager and a fresh frame is presented.
///
/// ```
/// use tessera::Toolkit;
/// use tessera::runtime::Runtime;
/// use tessera::wm::WindowManager;
/// use tessera_core::TesseraEvent;
/// use tessera_render::{MemoryBackend, Size};
///
/// let backend = MemoryBackend::new(Size::new(40, 10));
/// let wm = WindowManager::new(Toolkit::default(), Size::new(40, 10));
/// let mut runtime = Runtime::new(wm, backend.clone());
///
/// runtime.sender().send(TesseraEvent::Input(b"x".to_vec())).unwrap();
/// runtime.sender().send(TesseraEvent::Quit).unwrap();
/// runtime.run().unwrap();
/// assert_eq!(backend.frame_count(), 1);
/// ```
pub struct Runtime<B: Backend> {
    event_loop: EventLoop,
    wm: WindowManager,
    backend: B,
    escape_timer: Option<TimerId>,
}

impl<B: Backend> std::fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("wm", &self.wm)
            .field("escape_timer", &self.escape_timer)
            .finish()
    }
}

impl<B: Backend> Runtime<B> {
    pub fn new(wm: WindowManager, backend: B) -> Self {
        Self {
            event_loop: EventLoop::new(),
            wm,
            backend,
            escape_timer: None,
        }
    }

    /// A handle other threads use to post events.
    pub fn sender(&self) -> EventSender {
        self.event_loop.sender()
    }

    pub fn wm(&self) -> &WindowManager {
        &self.wm
    }

    pub fn wm_mut(&mut self) -> &mut WindowManager {
        &mut self.wm
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether the escape-delay timer is armed.
    pub fn escape_pending(&self) -> bool {
        self.escape_timer.is_some()
    }

    /// Run until [`TesseraEvent::Quit`] arrives.
    ///
    /// Fails if the runtime has already been run to completion.
    pub fn run(&mut self) -> Result<()> {
        let Runtime {
            event_loop,
            wm,
            backend,
            escape_timer,
        } = self;
        event_loop.run(|lp, event| handle_event(lp, wm, backend, escape_timer, event))?;
        tracing::debug!(target: targets::EVENT_LOOP, "runtime stopped");
        Ok(())
    }

    /// Wait up to `timeout` for one event and handle it.
    ///
    /// Returns `None` if nothing arrived in time.
    pub fn step(&mut self, timeout: Option<Duration>) -> Option<ControlFlow> {
        let event = self.event_loop.next_event(timeout)?;
        if event == TesseraEvent::Quit {
            return Some(ControlFlow::Exit);
        }
        Some(handle_event(
            &mut self.event_loop,
            &mut self.wm,
            &mut self.backend,
            &mut self.escape_timer,
            event,
        ))
    }
}

fn handle_event<B: Backend>(
    event_loop: &mut EventLoop,
    wm: &mut WindowManager,
    backend: &mut B,
    escape_timer: &mut Option<TimerId>,
    event: TesseraEvent,
) -> ControlFlow {
    let _span = tracing::trace_span!(target: targets::EVENT_LOOP, span_names::EVENT_LOOP).entered();
    match event {
        TesseraEvent::Input(bytes) => {
            wm.process_input(&bytes);
            rearm_escape_timer(event_loop, wm, escape_timer);
        }
        TesseraEvent::Timer { id } if *escape_timer == Some(id) => {
            *escape_timer = None;
            wm.flush_input();
        }
        TesseraEvent::Timer { id } => {
            tracing::trace!(target: targets::EVENT_LOOP, ?id, "unhandled timer");
        }
        TesseraEvent::Mouse { event, x, y } => {
            if wm.toolkit().config().general().mouse {
                wm.process_click(event, x, y);
            }
        }
        TesseraEvent::Resize { width, height } => wm.set_screen_size(Size::new(width, height)),
        TesseraEvent::ChildExited { pid, status } => {
            wm.child_exited(pid, status);
        }
        TesseraEvent::Quit => return ControlFlow::Exit,
        TesseraEvent::WakeUp => {}
    }

    if let Err(err) = wm.present(backend) {
        tracing::warn!(target: targets::EVENT_LOOP, %err, "failed to present frame");
    }
    ControlFlow::Continue
}

/// Hold an ambiguous key prefix for at most the configured escape delay.
fn rearm_escape_timer(event_loop: &mut EventLoop, wm: &WindowManager, escape_timer: &mut Option<TimerId>) {
    if let Some(timer) = escape_timer.take() {
        // The timer may already have fired and been consumed.
        let _ = event_loop.stop_timer(timer);
    }
    if wm.has_pending_input() {
        let delay = wm.toolkit().config().general().escape_delay;
        *escape_timer = Some(event_loop.start_timer(delay));
    }
}

#[cfg(test)]
mod tests {
    use tessera_render::MemoryBackend;
    use tessera_style::StyleConfig;

    use super::*;
    use crate::toolkit::Toolkit;
    use crate::wm::InputMode;

    fn runtime(escape_delay_ms: u64) -> (Runtime<MemoryBackend>, MemoryBackend) {
        let backend = MemoryBackend::new(Size::new(40, 12));
        let config = StyleConfig::from_str(&format!("[general]\nescape_delay_ms = {escape_delay_ms}\n")).unwrap();
        let mut wm = WindowManager::new(Toolkit::init(config), Size::new(40, 12));
        let window = wm.tree_mut().new_window("Main");
        wm.new_window(window).unwrap();
        (Runtime::new(wm, backend.clone()), backend)
    }

    #[test]
    fn test_lone_escape_is_flushed_by_timer() {
        let (mut rt, backend) = runtime(5);
        rt.wm_mut().start_move();
        rt.sender().send(TesseraEvent::Input(b"\x1b".to_vec())).unwrap();

        assert_eq!(rt.step(Some(Duration::from_secs(1))), Some(ControlFlow::Continue));
        assert!(rt.escape_pending());
        assert!(matches!(rt.wm().mode(), InputMode::Move { .. }));

        assert_eq!(rt.step(Some(Duration::from_secs(1))), Some(ControlFlow::Continue));
        assert!(!rt.escape_pending());
        assert!(rt.wm().mode().is_normal());
        assert_eq!(backend.frame_count(), 2);
    }

    #[test]
    fn test_complete_sequence_cancels_timer() {
        let (mut rt, _) = runtime(60_000);
        rt.sender().send(TesseraEvent::Input(b"\x1b".to_vec())).unwrap();
        rt.step(Some(Duration::from_secs(1)));
        assert!(rt.escape_pending());
        rt.sender().send(TesseraEvent::Input(b"m".to_vec())).unwrap();
        rt.step(Some(Duration::from_secs(1)));
        assert!(!rt.escape_pending());
        assert!(matches!(rt.wm().mode(), InputMode::Move { .. }));
    }

    #[test]
    fn test_child_exit_and_resize_events() {
        let (mut rt, backend) = runtime(25);
        rt.wm_mut().wait_on_child(3);
        let sender = rt.sender();
        sender.send(TesseraEvent::ChildExited { pid: 3, status: 0 }).unwrap();
        sender.send(TesseraEvent::Resize { width: 20, height: 6 }).unwrap();
        sender.send(TesseraEvent::Quit).unwrap();
        rt.run().unwrap();

        assert!(rt.wm().mode().is_normal());
        assert_eq!(rt.wm().screen_size(), Size::new(20, 6));
        assert_eq!(backend.last_frame().unwrap().size(), Size::new(20, 6));
    }

    #[test]
    fn test_step_reports_quit() {
        let (mut rt, _) = runtime(25);
        rt.sender().send(TesseraEvent::Quit).unwrap();
        assert_eq!(rt.step(Some(Duration::from_millis(10))), Some(ControlFlow::Exit));
        assert_eq!(rt.step(Some(Duration::from_millis(10))), None);
    }
}
