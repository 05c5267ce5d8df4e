//! Test doubles shared by the unit tests.

extern crate std;

use core::cell::RefCell;
use core::convert::Infallible;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
use s107_proto::Segment;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

/// Something that happened on a mock line or mock delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    High,
    Low,
    StatusHigh,
    StatusLow,
    WaitUs(u32),
}

/// Shared, ordered record of line and delay activity.
#[derive(Clone, Default)]
pub struct Trace(Rc<RefCell<Vec<Event>>>);

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self) -> MockLine {
        MockLine {
            trace: self.clone(),
            status: false,
        }
    }

    pub fn status(&self) -> MockLine {
        MockLine {
            trace: self.clone(),
            status: true,
        }
    }

    pub fn delay(&self) -> MockDelay {
        MockDelay(self.clone())
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    /// Total time spent in delays.
    pub fn elapsed_us(&self) -> u32 {
        self.0
            .borrow()
            .iter()
            .map(|e| match e {
                Event::WaitUs(us) => *us,
                _ => 0,
            })
            .sum()
    }

    /// Rebuild the waveform from carrier line events.
    ///
    /// Every high edge must be followed by `hold_us`, a low edge and
    /// `hold_us` again; anything else is a protocol hold.
    pub fn segments(&self, hold_us: u32) -> Vec<Segment> {
        let events: Vec<Event> = self
            .events()
            .into_iter()
            .filter(|e| !matches!(e, Event::StatusHigh | Event::StatusLow))
            .collect();

        let mut out = Vec::new();
        let mut cycles = 0;
        let mut i = 0;
        while i < events.len() {
            match events[i] {
                Event::High => {
                    assert_eq!(
                        events[i + 1..i + 4],
                        [Event::WaitUs(hold_us), Event::Low, Event::WaitUs(hold_us)],
                        "malformed carrier cycle at event {i}"
                    );
                    cycles += 1;
                    i += 4;
                }
                Event::WaitUs(micros) => {
                    if cycles > 0 {
                        out.push(Segment::Burst { cycles });
                        cycles = 0;
                    }
                    out.push(Segment::Hold { micros });
                    i += 1;
                }
                _ => i += 1,
            }
        }
        if cycles > 0 {
            out.push(Segment::Burst { cycles });
        }
        out
    }
}

pub struct MockLine {
    trace: Trace,
    status: bool,
}

impl embedded_hal::digital::ErrorType for MockLine {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for MockLine {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.trace.push(if self.status {
            Event::StatusLow
        } else {
            Event::Low
        });
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.trace.push(if self.status {
            Event::StatusHigh
        } else {
            Event::High
        });
        Ok(())
    }
}

pub struct MockDelay(Trace);

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.push(Event::WaitUs(ns / 1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.push(Event::WaitUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.push(Event::WaitUs(ms * 1_000));
    }
}

/// Async delay that completes immediately and records what was asked.
#[derive(Clone, Default)]
pub struct MockIdle(pub Rc<RefCell<Vec<u32>>>);

impl embedded_hal_async::delay::DelayNs for MockIdle {
    async fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().push(ns / 1_000);
    }

    async fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().push(us);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().push(ms * 1_000);
    }
}

#[derive(Default)]
pub struct SerialState {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub flushes: usize,
}

/// In-memory byte channel. Bytes queued in `rx` are what the host sent.
#[derive(Clone, Default)]
pub struct MockSerial(pub Rc<RefCell<SerialState>>);

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host_sends(&self, bytes: &[u8]) {
        self.0.borrow_mut().rx.extend(bytes.iter().copied());
    }

    pub fn pending(&self) -> usize {
        self.0.borrow().rx.len()
    }

    pub fn written(&self) -> Vec<u8> {
        self.0.borrow().tx.clone()
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = embedded_io::ErrorKind;
}

impl embedded_io::ReadReady for MockSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        let state = self.0.borrow();
        if state.fail_reads {
            return Err(embedded_io::ErrorKind::InvalidData);
        }
        Ok(!state.rx.is_empty())
    }
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut state = self.0.borrow_mut();
        let mut n = 0;
        while n < buf.len() {
            match state.rx.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

impl embedded_io_async::Write for MockSerial {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let mut state = self.0.borrow_mut();
        if state.fail_writes {
            return Err(embedded_io::ErrorKind::Other);
        }
        state.tx.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().flushes += 1;
        Ok(())
    }
}

/// Run a future to completion. Mocks never return `Pending`.
pub fn block_on<F: Future>(mut f: F) -> F::Output {
    fn noop_raw_waker() -> RawWaker {
        fn noop(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            noop_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
        RawWaker::new(core::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
    let mut cx = Context::from_waker(&waker);

    // SAFETY: f is not moved after pinning
    let mut f = unsafe { Pin::new_unchecked(&mut f) };

    match f.as_mut().poll(&mut cx) {
        Poll::Ready(result) => result,
        Poll::Pending => panic!("Mock future returned Pending unexpectedly"),
    }
}
