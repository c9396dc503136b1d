use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;

use crate::engine::ListTask;
use crate::extension::ExtensionId;
use crate::{Channel, CompletionEvent, PointerEvent, Target};

/// Completion handle for scheduled work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ticket(pub(crate) u64);

/// How the scheduler aligns work with the host's paint cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchedulerMode {
    /// Mutations and direct events are held until [`crate::FastList::frame`].
    FrameAligned,
    /// Mutations run at the call; direct events are delivered as they arrive.
    #[default]
    Immediate,
}

/// A unit of deferred work, executed by the list controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Task {
    List(ListTask),
    Extension { ext: ExtensionId, step: u32 },
}

/// What a running task waits on before its ticket resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Await {
    pub target: Target,
    pub event: CompletionEvent,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Job {
    pub ticket: Ticket,
    pub task: Task,
    pub wait: Option<Await>,
}

#[derive(Clone, Copy, Debug)]
struct Wait {
    ticket: Ticket,
    on: Await,
    deadline_ms: u64,
}

#[derive(Clone, Debug)]
struct Join {
    after: Vec<Ticket>,
    job: Job,
}

/// Latest undelivered event of a direct channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DirectEvent {
    Scroll(u64),
    PointerMove(PointerEvent),
}

/// Serializes list work into phases.
///
/// - mutation: state/style writes, run in call order (batched per frame when frame-aligned);
/// - transition / feedback: a mutation followed by a wait on a completion event, bounded by the
///   transition timeout;
/// - direct channels: high-frequency events (scroll, pointer move) that are dropped while
///   detached and coalesced to the latest value per frame when frame-aligned.
///
/// Every operation returns a [`Ticket`]; joins fan tickets in.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    mode: SchedulerMode,
    next_ticket: u64,
    outstanding: BTreeSet<Ticket>,
    queue: VecDeque<Job>,
    joins: Vec<Join>,
    waits: Vec<Wait>,
    attached: [bool; Channel::COUNT],
    direct: [Option<DirectEvent>; Channel::COUNT],
}

impl Scheduler {
    pub fn new(mode: SchedulerMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn frame_aligned() -> Self {
        Self::new(SchedulerMode::FrameAligned)
    }

    /// The fallback used when the host supplies no frame clock.
    pub fn immediate() -> Self {
        Self::new(SchedulerMode::Immediate)
    }

    pub fn mode(&self) -> SchedulerMode {
        self.mode
    }

    pub fn is_resolved(&self, ticket: Ticket) -> bool {
        ticket.0 < self.next_ticket && !self.outstanding.contains(&ticket)
    }

    /// Tickets not resolved yet.
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    /// Waits on completion events currently armed.
    pub fn waiting(&self) -> usize {
        self.waits.len()
    }

    pub fn is_attached(&self, channel: Channel) -> bool {
        self.attached[channel.idx()]
    }

    /// A ticket that is already resolved.
    pub(crate) fn resolved(&mut self) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        ticket
    }

    fn issue(&mut self) -> Ticket {
        let ticket = self.resolved();
        self.outstanding.insert(ticket);
        ticket
    }

    pub(crate) fn mutation(&mut self, task: Task) -> Ticket {
        self.schedule(&[], task, None)
    }

    /// Runs `task`, then waits for `event` on `target`.
    pub(crate) fn transition(
        &mut self,
        task: Task,
        target: Target,
        event: CompletionEvent,
    ) -> Ticket {
        self.schedule(&[], task, Some(Await { target, event }))
    }

    /// Same contract as [`Self::transition`], for cosmetic state toggles.
    pub(crate) fn feedback(
        &mut self,
        task: Task,
        target: Target,
        event: CompletionEvent,
    ) -> Ticket {
        self.transition(task, target, event)
    }

    /// Queues `task` once every ticket in `after` resolved.
    pub(crate) fn join(&mut self, after: &[Ticket], task: Task) -> Ticket {
        self.schedule(after, task, None)
    }

    pub(crate) fn schedule(&mut self, after: &[Ticket], task: Task, wait: Option<Await>) -> Ticket {
        let ticket = self.issue();
        let job = Job { ticket, task, wait };
        let after: Vec<Ticket> = after
            .iter()
            .copied()
            .filter(|t| !self.is_resolved(*t))
            .collect();
        if after.is_empty() {
            self.queue.push_back(job);
        } else {
            self.joins.push(Join { after, job });
        }
        ticket
    }

    /// Pops the next job allowed to run now.
    pub(crate) fn next_job(&mut self, in_frame: bool) -> Option<Job> {
        if self.mode == SchedulerMode::FrameAligned && !in_frame {
            return None;
        }
        self.queue.pop_front()
    }

    /// Marks a job as executed: arms its wait, or resolves its ticket.
    pub(crate) fn finish(&mut self, job: Job, now_ms: u64, timeout_ms: u64) {
        match job.wait {
            Some(on) => self.waits.push(Wait {
                ticket: job.ticket,
                on,
                deadline_ms: now_ms.saturating_add(timeout_ms),
            }),
            None => self.resolve(job.ticket),
        }
    }

    /// Resolves every wait armed on `target` for `event`. Returns whether any matched.
    pub(crate) fn complete(&mut self, target: Target, event: CompletionEvent) -> bool {
        let on = Await { target, event };
        let mut hit = Vec::new();
        self.waits.retain(|w| {
            let matched = w.on == on;
            if matched {
                hit.push(w.ticket);
            }
            !matched
        });
        let any = !hit.is_empty();
        for ticket in hit {
            self.resolve(ticket);
        }
        any
    }

    /// Resolves waits whose deadline passed. Returns how many expired.
    pub(crate) fn expire(&mut self, now_ms: u64) -> usize {
        let mut hit = Vec::new();
        self.waits.retain(|w| {
            let expired = w.deadline_ms <= now_ms;
            if expired {
                hit.push(w.ticket);
            }
            !expired
        });
        let n = hit.len();
        for ticket in hit {
            self.resolve(ticket);
        }
        n
    }

    fn resolve(&mut self, ticket: Ticket) {
        if !self.outstanding.remove(&ticket) {
            return;
        }
        let mut i = 0;
        while i < self.joins.len() {
            let join = &mut self.joins[i];
            join.after.retain(|t| *t != ticket);
            if join.after.is_empty() {
                let join = self.joins.remove(i);
                self.queue.push_back(join.job);
            } else {
                i += 1;
            }
        }
    }

    pub(crate) fn attach_direct(&mut self, channel: Channel) {
        self.attached[channel.idx()] = true;
    }

    pub(crate) fn detach_direct(&mut self, channel: Channel) {
        self.attached[channel.idx()] = false;
        self.direct[channel.idx()] = None;
    }

    /// Accepts an event for a direct channel.
    ///
    /// Returns the event when it must be delivered right away; frame-aligned schedulers keep
    /// the latest one until the next frame. Events on detached channels are dropped.
    pub(crate) fn push_direct(
        &mut self,
        channel: Channel,
        event: DirectEvent,
    ) -> Option<DirectEvent> {
        if !self.is_attached(channel) {
            return None;
        }
        match self.mode {
            SchedulerMode::Immediate => Some(event),
            SchedulerMode::FrameAligned => {
                self.direct[channel.idx()] = Some(event);
                None
            }
        }
    }

    pub(crate) fn take_direct(&mut self, channel: Channel) -> Option<DirectEvent> {
        self.direct[channel.idx()].take()
    }

    /// Drops all pending work and listeners. Outstanding tickets never resolve.
    pub(crate) fn clear(&mut self) {
        self.queue.clear();
        self.joins.clear();
        self.waits.clear();
        self.attached = [false; Channel::COUNT];
        self.direct = [None; Channel::COUNT];
    }
}
