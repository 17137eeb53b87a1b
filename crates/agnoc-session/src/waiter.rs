//! Single-shot response waiters keyed by opcode name.
//!
//! The protocol carries no transaction id, so a waiter is resolved by the
//! next packet of its opname, first registered first served.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use agnoc_protocol::{OpName, Packet};
use tokio::sync::oneshot;

use crate::error::SessionError;

/// Resolves with the next packet of `opname`, or fails with
/// [`SessionError::Cancelled`] when the registry drops it.
#[derive(Debug)]
pub struct Waiter {
    opname: OpName,
    rx: oneshot::Receiver<Packet>,
}

impl Waiter {
    pub fn opname(&self) -> OpName {
        self.opname
    }
}

impl Future for Waiter {
    type Output = Result<Packet, SessionError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.map_err(|_| SessionError::Cancelled))
    }
}

#[derive(Debug, Default)]
pub struct WaiterRegistry {
    pending: HashMap<OpName, VecDeque<oneshot::Sender<Packet>>>,
}

impl WaiterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a waiter for `opname`, first dropping any whose receiver is
    /// already gone.
    pub fn register(&mut self, opname: OpName) -> Waiter {
        let (tx, rx) = oneshot::channel();
        let queue = self.pending.entry(opname).or_default();
        queue.retain(|waiting| !waiting.is_closed());
        queue.push_back(tx);
        Waiter { opname, rx }
    }

    /// Hand `packet` to the oldest live waiter for its opname.
    ///
    /// Waiters whose receiving side is gone (timed out, dropped) are skipped.
    /// Returns `true` if a waiter took the packet.
    pub fn resolve(&mut self, packet: &Packet) -> bool {
        let Some(opname) = packet.opname() else {
            return false;
        };
        let Some(queue) = self.pending.get_mut(&opname) else {
            return false;
        };

        let mut delivered = false;
        while let Some(tx) = queue.pop_front() {
            if tx.send(packet.clone()).is_ok() {
                delivered = true;
                break;
            }
        }

        if queue.is_empty() {
            self.pending.remove(&opname);
        }
        delivered
    }

    /// Fail every pending waiter with `Cancelled`.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn pending(&self, opname: OpName) -> usize {
        self.pending.get(&opname).map_or(0, VecDeque::len)
    }

    pub fn len(&self) -> usize {
        self.pending.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
