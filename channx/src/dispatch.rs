//! The dispatch loop that moves values from input to output.

use std::iter;
use std::ops::ControlFlow;

use crossbeam::channel::{Receiver, RecvError, Select, SendError, Sender, TryRecvError, TrySendError};
use tracing::{debug, trace};
use zkit_buffer::RingBuffer;

/// Owns the ring buffer and both channel ends that are private to the
/// channel: the input receiver and the output sender.
///
/// Runs on its own thread until the close signal fires or every output
/// receiver is gone.
pub(crate) struct Dispatcher<T> {
    // Declared before `output` so the input is released first on exit.
    input: Receiver<T>,
    output: Sender<T>,
    close: Receiver<()>,
    buffer: RingBuffer<T>,
    drop_closed_buffer_data: bool,
}

enum Exit<T> {
    /// Close was signalled. Carries a value taken from the input that
    /// could not be buffered yet.
    Closed(Option<T>),
    /// Every output receiver was dropped.
    Abandoned,
}

enum Ready<T> {
    Input(Result<T, RecvError>),
    Sent(Result<(), SendError<T>>),
    Closed,
}

impl<T> Dispatcher<T> {
    pub(crate) fn new(
        input: Receiver<T>,
        output: Sender<T>,
        close: Receiver<()>,
        buffer: RingBuffer<T>,
        drop_closed_buffer_data: bool,
    ) -> Self {
        Self {
            input,
            output,
            close,
            buffer,
            drop_closed_buffer_data,
        }
    }

    pub(crate) fn run(mut self) {
        debug!(
            init_buffer = self.buffer.cap(),
            drop_closed_buffer_data = self.drop_closed_buffer_data,
            "channx: dispatcher started"
        );

        let exit = loop {
            let flow = if self.buffer.is_empty() {
                self.wait_input()
            } else {
                self.drain_step()
            };
            if let ControlFlow::Break(exit) = flow {
                break exit;
            }
        };

        match exit {
            Exit::Closed(pending) => self.terminate(pending),
            Exit::Abandoned => {
                debug!(dropped = self.buffer.len(), "channx: all receivers dropped, dispatcher stopped");
            }
        }
    }

    // Buffer is empty: wait for input or close.
    fn wait_input(&mut self) -> ControlFlow<Exit<T>> {
        let ready = {
            let mut sel = Select::new();
            let recv_in = sel.recv(&self.input);
            sel.recv(&self.close);

            let oper = sel.select();
            if oper.index() == recv_in {
                Ready::Input(oper.recv(&self.input))
            } else {
                let _ = oper.recv(&self.close);
                Ready::Closed
            }
        };
        self.handle(ready)
    }

    // Buffer has a head: race input, delivering the head, and close.
    fn drain_step(&mut self) -> ControlFlow<Exit<T>> {
        let ready = {
            let mut sel = Select::new();
            let recv_in = sel.recv(&self.input);
            let send_out = sel.send(&self.output);
            sel.recv(&self.close);

            let oper = sel.select();
            match oper.index() {
                i if i == recv_in => Ready::Input(oper.recv(&self.input)),
                i if i == send_out => {
                    let head = self.buffer.pop().expect("drain step without a buffered head");
                    Ready::Sent(oper.send(&self.output, head))
                }
                _ => {
                    let _ = oper.recv(&self.close);
                    Ready::Closed
                }
            }
        };
        self.handle(ready)
    }

    fn handle(&mut self, ready: Ready<T>) -> ControlFlow<Exit<T>> {
        match ready {
            Ready::Input(Ok(value)) => self.admit(value),
            Ready::Input(Err(RecvError)) => self.input_disconnected(),
            Ready::Sent(Ok(())) => {
                self.shrink_if_drained();
                ControlFlow::Continue(())
            }
            Ready::Sent(Err(_)) => ControlFlow::Break(Exit::Abandoned),
            Ready::Closed => ControlFlow::Break(Exit::Closed(None)),
        }
    }

    // Fast path straight to the output while nothing is queued ahead of
    // the value, otherwise into the buffer.
    fn admit(&mut self, value: T) -> ControlFlow<Exit<T>> {
        let value = if self.buffer.is_empty() {
            match self.output.try_send(value) {
                Ok(()) => return ControlFlow::Continue(()),
                Err(TrySendError::Full(value)) => value,
                Err(TrySendError::Disconnected(_)) => return ControlFlow::Break(Exit::Abandoned),
            }
        } else {
            value
        };
        self.must_put(value)
    }

    // Puts value into the buffer. A capped, full buffer first has to hand
    // its head to the output, which blocks until a consumer makes room or
    // close is signalled.
    fn must_put(&mut self, value: T) -> ControlFlow<Exit<T>> {
        let cap = self.buffer.cap();
        let value = match self.buffer.put(value) {
            Ok(()) => {
                if self.buffer.cap() > cap {
                    trace!(from = cap, to = self.buffer.cap(), "channx: ring buffer grew");
                }
                return ControlFlow::Continue(());
            }
            Err(value) => value,
        };

        let forced = {
            let mut sel = Select::new();
            let send_out = sel.send(&self.output);
            sel.recv(&self.close);

            let oper = sel.select();
            if oper.index() == send_out {
                let head = self.buffer.pop().expect("full ring buffer without a head");
                Some(oper.send(&self.output, head))
            } else {
                let _ = oper.recv(&self.close);
                None
            }
        };

        match forced {
            Some(Ok(())) => {
                let admitted = self.buffer.put(value);
                debug_assert!(admitted.is_ok(), "put rejected right after a pop");
                ControlFlow::Continue(())
            }
            Some(Err(_)) => ControlFlow::Break(Exit::Abandoned),
            None => ControlFlow::Break(Exit::Closed(Some(value))),
        }
    }

    fn shrink_if_drained(&mut self) {
        if self.buffer.need_reset() {
            let cap = self.buffer.cap();
            self.buffer.reset();
            trace!(from = cap, to = self.buffer.cap(), "channx: ring buffer shrunk");
        }
    }

    // The ChannX handle keeps a sender alive and signals close before
    // releasing it, so a disconnected input without a close signal means
    // the input was torn down from outside.
    fn input_disconnected(&self) -> ControlFlow<Exit<T>> {
        match self.close.try_recv() {
            Err(TryRecvError::Disconnected) => ControlFlow::Break(Exit::Closed(None)),
            _ => panic!("channx: input channel can not be closed"),
        }
    }

    // The input is drained until it is empty, including values sent while
    // the flush waits on the output. It is released when self is dropped.
    fn terminate(mut self, pending: Option<T>) {
        if self.drop_closed_buffer_data {
            let dropped = self.buffer.len() + usize::from(pending.is_some()) + self.input.len();
            self.buffer.reset();
            debug!(dropped, "channx: closed, buffered data dropped");
            return;
        }

        let mut flushed = 0usize;
        let queued = iter::from_fn(|| self.buffer.pop())
            .chain(pending)
            .chain(self.input.try_iter());
        for value in queued {
            if self.output.send(value).is_err() {
                debug!(flushed, "channx: all receivers dropped while flushing");
                return;
            }
            flushed += 1;
        }

        self.buffer.reset();
        debug!(flushed, "channx: closed, buffered data flushed");
    }
}
