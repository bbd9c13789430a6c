//! Deterministic subspec assignment for a task's machine list.

use crate::models::SubspecId;

/// Assigns the subspec a producer on `host` publishes the task stream under.
///
/// Without a host (the unfiltered, aggregated view) the stream is always the
/// direct one, independent of how many machines the task lists. With a host,
/// the machine list is scanned in order: a miss yields `None` and the caller
/// skips node emission for this task; a hit on a multi-machine task yields the
/// 1-based position, so a merger can route the streams by origin; a hit on a
/// single-machine task needs no merge and stays on the direct stream.
pub fn assign(machines: &[String], host: Option<&str>) -> Option<SubspecId> {
    let Some(host) = host else {
        return Some(SubspecId::DIRECT);
    };

    let position = machines.iter().position(|machine| machine == host)?;
    if machines.len() > 1 {
        Some(SubspecId(position as u32 + 1))
    } else {
        Some(SubspecId::DIRECT)
    }
}
