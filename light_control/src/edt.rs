use alloc::vec;
use alloc::vec::Vec;

use no_std_compat::cell::{Cell, RefCell};
use no_std_compat::cmp::Ordering::Equal;

/// Upper bound on pending messages, the traffic light never needs more than one
pub const QUEUE_LIMIT: usize = 10;

#[derive(Clone, Debug, Eq, PartialEq, Copy)]
pub struct Msg<T: Sized> {
    pub when: u64,
    pub order: u32,
    pub payload: T,
}

/// Event dispatch timeline. Time is virtual and only moves with [EDT::elapse].
pub struct EDT<T> {
    now: Cell<u64>,
    queue: RefCell<Vec<Msg<T>>>,
}

impl<T: Copy> EDT<T> {
    pub fn create() -> EDT<T> {
        EDT {
            now: Cell::new(0),
            queue: RefCell::new(vec![]),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Copy)]
pub enum Event<T> {
    Execute { msg: T },
    Wait { ms: u32 },
    Halt,
}

impl<T: Copy> EDT<T> {
    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Moves the clock forward
    pub fn elapse(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    /// Takes the head of the queue if it is due, otherwise tells how long to wait for it
    pub fn poll(&self) -> Event<T> {
        match self.peek_head() {
            Some(head) if head.when <= self.now.get() => {
                let position = self
                    .queue
                    .borrow()
                    .iter()
                    .position(|it| it.when == head.when && it.order == head.order);
                if let Some(position) = position {
                    self.queue.borrow_mut().remove(position);
                }
                Event::Execute { msg: head.payload }
            }
            Some(head) => Event::Wait {
                ms: wait_until(head.when, self.now.get()),
            },
            None => Event::Halt,
        }
    }

    /// Milliseconds until the head is due, None if nothing is scheduled
    pub fn next_due(&self) -> Option<u32> {
        self.peek_head()
            .map(|head| wait_until(head.when, self.now.get()))
    }

    /// Advances the time by the given value and feeds messages to the handler
    pub fn advance_time_by(&self, time: u32, handler: &dyn Fn(T)) {
        let target = self.now.get().saturating_add(time as u64);
        loop {
            match self.poll() {
                Event::Execute { msg } => {
                    handler(msg);
                }
                Event::Wait { ms } => {
                    if self.now.get().saturating_add(ms as u64) > target {
                        self.now.set(target);
                        break;
                    }
                    self.elapse(ms as u64);
                }
                Event::Halt => {
                    self.now.set(target);
                    break;
                }
            }
        }
    }

    fn peek_head(&self) -> Option<Msg<T>> {
        self.queue
            .borrow()
            .iter()
            .min_by(|lhs, rhs| {
                let by_when = lhs.when.cmp(&rhs.when);
                match by_when {
                    Equal => lhs.order.cmp(&rhs.order),
                    _ => by_when,
                }
            })
            .cloned()
    }

    pub fn schedule(&self, delay: u32, payload: T) {
        let when = self.now.get().saturating_add(delay as u64);

        let order = self
            .queue
            .borrow()
            .iter()
            .filter(|message| message.when == when)
            .map(|it| it.order + 1)
            .max()
            .unwrap_or(0);

        self.queue.borrow_mut().push(Msg {
            when,
            order,
            payload,
        });

        debug_assert!(self.queue.borrow().len() < QUEUE_LIMIT);
    }

    pub fn remove<F>(&self, mut predicate: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.queue.borrow_mut().retain(|it| !predicate(&it.payload));
    }

    pub fn queue_len(&self) -> usize {
        self.queue.borrow().len()
    }
}

/// Delays are u32, so a deadline is never more than u32::MAX ahead of the clock
fn wait_until(when: u64, now: u64) -> u32 {
    when.saturating_sub(now).min(u32::MAX as u64) as u32
}
