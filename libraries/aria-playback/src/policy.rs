//! Track advance policy
//!
//! Pure index computations for "next" and "previous" under shuffle and
//! repeat settings. The caller supplies the RNG so shuffle order is
//! reproducible in tests. Replaying the current track under
//! [`RepeatMode::One`] is handled by the event bridge, not here.

use crate::types::{RepeatMode, SkipTrigger};
use rand::Rng;
use std::time::Duration;

/// Outcome of a next/previous computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Move the current position to this index and start playing it
    To(usize),

    /// Seek the current track back to the start; the position does not move
    RestartCurrent,

    /// Nothing to play; playback halts and the position stays put
    Stop,
}

/// Compute the index of the next track to play
///
/// At the end of the queue, playback wraps when repeat-all is on, or when
/// the skip was an explicit user action: the "next" button always advances,
/// looping or not. Only natural completion with repeat off stops.
pub fn next_index(
    queue_len: usize,
    current: Option<usize>,
    shuffle: bool,
    repeat: RepeatMode,
    trigger: SkipTrigger,
    rng: &mut impl Rng,
) -> Advance {
    if queue_len == 0 {
        return Advance::Stop;
    }

    if shuffle {
        return Advance::To(shuffled_pick(queue_len, current, rng));
    }

    let candidate = current.map_or(0, |i| i + 1);
    if candidate < queue_len {
        Advance::To(candidate)
    } else if repeat == RepeatMode::All || trigger == SkipTrigger::Manual {
        Advance::To(0)
    } else {
        Advance::Stop
    }
}

/// Compute the index of the previous track to play
///
/// More than `restart_threshold` into the current track, "previous" means
/// "back to the start of this song" rather than "back one song", the way
/// physical transport controls behave. Below the threshold the position
/// moves back, wrapping unconditionally at the front of the queue. The
/// wrap is deliberately more permissive than [`next_index`]'s stop at the
/// end; the asymmetry is intended.
pub fn previous_index(
    queue_len: usize,
    current: Option<usize>,
    elapsed: Duration,
    restart_threshold: Duration,
    shuffle: bool,
    rng: &mut impl Rng,
) -> Advance {
    if queue_len == 0 {
        return Advance::Stop;
    }

    if current.is_some() && elapsed > restart_threshold {
        return Advance::RestartCurrent;
    }

    if shuffle {
        return Advance::To(shuffled_pick(queue_len, current, rng));
    }

    match current {
        Some(i) if i > 0 => Advance::To(i - 1),
        _ => Advance::To(queue_len - 1),
    }
}

/// Draw a random index distinct from the current one
///
/// Repeats of a track two plays apart are allowed; only an immediate
/// repeat is excluded.
fn shuffled_pick(queue_len: usize, current: Option<usize>, rng: &mut impl Rng) -> usize {
    if queue_len == 1 {
        return 0;
    }

    loop {
        let candidate = rng.gen_range(0..queue_len);
        if Some(candidate) != current {
            return candidate;
        }
    }
}
