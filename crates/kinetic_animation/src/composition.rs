//! Composition trees
//!
//! An [`Animation`] is a description: timing and spring leaves bound to
//! scalars, grouped with `Sequence` and `Parallel`, plus `Delay`, `Set` and
//! `Loop` for the declarative transitions. Submitting it to a scheduler turns
//! it into a run tree that is polled once per frame and dropped when it
//! settles.
//!
//! Ordering rules:
//! - a `Sequence` member starts only after the previous member completed
//! - a `Parallel` group issues every member in the same frame
//! - a leaf whose scalar was taken over by another driver (or jumped) is
//!   interrupted, which ends the enclosing sequence / group as not finished

use crate::scheduler::{CompositionId, ScalarId, SchedulerHandle};
use crate::scalar::ScalarArena;
use crate::spring::SpringConfig;
use crate::timing::TimingConfig;
use std::collections::VecDeque;

/// A node of a composition tree
#[derive(Clone, Debug, PartialEq)]
pub enum Animation {
    /// Interpolate `scalar` to `target` over a fixed duration
    Timing {
        scalar: ScalarId,
        target: f32,
        config: TimingConfig,
    },
    /// Spring `scalar` towards `target`; settle time is up to the physics
    Spring {
        scalar: ScalarId,
        target: f32,
        config: SpringConfig,
    },
    /// Run members one after another
    Sequence(Vec<Animation>),
    /// Run members together
    Parallel(Vec<Animation>),
    /// Wait for the given number of milliseconds
    Delay(f32),
    /// Jump `scalar` to `value` instantly
    Set { scalar: ScalarId, value: f32 },
    /// Repeat `animation`; `None` repeats forever
    Loop {
        animation: Box<Animation>,
        iterations: Option<u32>,
    },
}

impl Animation {
    pub fn sequence(members: impl IntoIterator<Item = Animation>) -> Self {
        Animation::Sequence(members.into_iter().collect())
    }

    pub fn parallel(members: impl IntoIterator<Item = Animation>) -> Self {
        Animation::Parallel(members.into_iter().collect())
    }

    pub fn delay(ms: f32) -> Self {
        Animation::Delay(ms)
    }

    pub fn repeat(self, iterations: Option<u32>) -> Self {
        Animation::Loop {
            animation: Box::new(self),
            iterations,
        }
    }

    /// Submit to the scheduler; see [`SchedulerHandle::start`]
    pub fn start(self, handle: &SchedulerHandle) -> Option<CompositionId> {
        handle.start(self)
    }

    /// Number of timing/spring leaves in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            Animation::Timing { .. } | Animation::Spring { .. } => 1,
            Animation::Sequence(members) | Animation::Parallel(members) => {
                members.iter().map(Animation::leaf_count).sum()
            }
            Animation::Delay(_) | Animation::Set { .. } => 0,
            Animation::Loop { animation, .. } => animation.leaf_count(),
        }
    }
}

/// Outcome of polling a run node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Progress {
    Running,
    Finished,
    Interrupted,
}

/// Live state of a submitted composition
#[derive(Debug)]
pub(crate) enum RunNode {
    Leaf {
        scalar: ScalarId,
        token: u64,
    },
    Settled(Progress),
    Sequence {
        current: Box<RunNode>,
        pending: VecDeque<Animation>,
    },
    Parallel(Vec<RunNode>),
    Delay {
        remaining_ms: f32,
    },
    Loop {
        template: Animation,
        remaining: Option<u32>,
        current: Box<RunNode>,
    },
}

impl RunNode {
    /// Issue the initial drivers of `animation`
    pub(crate) fn launch(animation: Animation, scalars: &mut ScalarArena) -> RunNode {
        match animation {
            Animation::Timing {
                scalar,
                target,
                config,
            } => match scalars.begin_timing(scalar, target, config) {
                Some(token) => RunNode::Leaf { scalar, token },
                None => RunNode::Settled(Progress::Interrupted),
            },
            Animation::Spring {
                scalar,
                target,
                config,
            } => match scalars.begin_spring(scalar, target, config) {
                Some(token) => RunNode::Leaf { scalar, token },
                None => RunNode::Settled(Progress::Interrupted),
            },
            Animation::Set { scalar, value } => {
                if scalars.jump(scalar, value) {
                    RunNode::Settled(Progress::Finished)
                } else {
                    RunNode::Settled(Progress::Interrupted)
                }
            }
            Animation::Delay(ms) if ms <= 0.0 => RunNode::Settled(Progress::Finished),
            Animation::Delay(ms) => RunNode::Delay { remaining_ms: ms },
            Animation::Parallel(members) => RunNode::Parallel(
                members
                    .into_iter()
                    .map(|member| RunNode::launch(member, scalars))
                    .collect(),
            ),
            Animation::Sequence(members) => {
                let mut pending: VecDeque<Animation> = members.into();
                match pending.pop_front() {
                    Some(first) => {
                        let current = RunNode::launch(first, scalars);
                        RunNode::advance_sequence(current, pending, scalars)
                    }
                    None => RunNode::Settled(Progress::Finished),
                }
            }
            Animation::Loop {
                iterations: Some(0),
                ..
            } => RunNode::Settled(Progress::Finished),
            Animation::Loop {
                animation,
                iterations,
            } => {
                let template = *animation;
                let current = RunNode::launch(template.clone(), scalars);
                RunNode::Loop {
                    template,
                    remaining: iterations,
                    current: Box::new(current),
                }
            }
        }
    }

    /// Move past members that completed without needing a frame
    fn advance_sequence(
        mut current: RunNode,
        mut pending: VecDeque<Animation>,
        scalars: &mut ScalarArena,
    ) -> RunNode {
        loop {
            match current {
                RunNode::Settled(Progress::Finished) => match pending.pop_front() {
                    Some(next) => current = RunNode::launch(next, scalars),
                    None => return RunNode::Settled(Progress::Finished),
                },
                RunNode::Settled(Progress::Interrupted) => {
                    return RunNode::Settled(Progress::Interrupted)
                }
                running => {
                    return RunNode::Sequence {
                        current: Box::new(running),
                        pending,
                    }
                }
            }
        }
    }

    /// Poll once per frame, after scalars were stepped by `dt_ms`
    pub(crate) fn poll(&mut self, dt_ms: f32, scalars: &mut ScalarArena) -> Progress {
        let progress = match self {
            RunNode::Leaf { scalar, token } => scalars.status(*scalar, *token),
            RunNode::Settled(progress) => *progress,
            RunNode::Delay { remaining_ms } => {
                *remaining_ms -= dt_ms;
                if *remaining_ms <= 0.0 {
                    Progress::Finished
                } else {
                    Progress::Running
                }
            }
            RunNode::Parallel(members) => {
                let mut all_finished = true;
                let mut interrupted = false;
                for member in members.iter_mut() {
                    match member.poll(dt_ms, scalars) {
                        Progress::Running => all_finished = false,
                        Progress::Finished => {}
                        Progress::Interrupted => interrupted = true,
                    }
                }
                if interrupted {
                    Progress::Interrupted
                } else if all_finished {
                    Progress::Finished
                } else {
                    Progress::Running
                }
            }
            RunNode::Sequence { current, pending } => match current.poll(dt_ms, scalars) {
                Progress::Finished => {
                    let pending = std::mem::take(pending);
                    *self = RunNode::advance_sequence(
                        RunNode::Settled(Progress::Finished),
                        pending,
                        scalars,
                    );
                    match self {
                        RunNode::Settled(progress) => *progress,
                        _ => Progress::Running,
                    }
                }
                other => other,
            },
            RunNode::Loop {
                template,
                remaining,
                current,
            } => match current.poll(dt_ms, scalars) {
                Progress::Finished => {
                    let exhausted = match remaining {
                        Some(count) => {
                            *count = count.saturating_sub(1);
                            *count == 0
                        }
                        None => false,
                    };
                    if exhausted {
                        Progress::Finished
                    } else {
                        // At most one relaunch per frame, so a loop of instant
                        // steps cannot spin inside a single poll
                        **current = RunNode::launch(template.clone(), scalars);
                        Progress::Running
                    }
                }
                other => other,
            },
        };

        if progress != Progress::Running {
            *self = RunNode::Settled(progress);
        }
        progress
    }
}
