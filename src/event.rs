//! Retransmit records and the raw-line grammar
//!
//! The kernel shares one trace buffer across every enabled event, and
//! the line layout is a kernel implementation detail. Every assumption
//! about that layout is confined to this module, so a format change in
//! a future kernel only lands here, not in the polling or reporting
//! logic.
//!
//! A buffer line looks like:
//!
//! ```text
//! curl-1543  [001] ..s.  5017.312814: tcp_retransmit_skb: sport=44062 \
//!     dport=443 saddr=10.0.0.5 daddr=93.184.216.34 saddrv6=::ffff:10.0.0.5 \
//!     daddrv6=::ffff:93.184.216.34 state=ESTABLISHED
//! ```
//!
//! The grammar is split-then-key-extract: peel the `comm-pid` token off
//! the front, then scan the remainder for the required `key=value`
//! fields. Unrelated events and malformed lines are skipped, never
//! raised.

use chrono::{DateTime, Local};

use crate::domain::Pid;

/// Marker that makes a buffer line one of ours.
const EVENT_MARKER: &str = "tcp_retransmit_skb:";

/// One parsed retransmission, in kernel emission order.
///
/// Immutable once constructed; discarded after printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetransmitRecord {
    pub task: String,
    /// Absent when the event fired from interrupt/softirq context and
    /// no usable task PID exists.
    pub pid: Option<Pid>,
    pub laddr: String,
    pub lport: u16,
    pub raddr: String,
    pub rport: u16,
    pub state: String,
    pub observed_at: DateTime<Local>,
}

/// Parse one raw buffer line.
///
/// Returns `None` both for lines belonging to other events (the buffer
/// is shared) and for lines missing any of the required fields; one bad
/// line never aborts the session. Only the IPv4 address pair is read;
/// the `saddrv6`/`daddrv6` fields present on the line are ignored.
pub fn parse_line(line: &str, observed_at: DateTime<Local>) -> Option<RetransmitRecord> {
    if !line.contains(EVENT_MARKER) {
        return None;
    }

    let (task_token, rest) = line.trim_start().split_once(char::is_whitespace)?;
    let (task, pid) = split_task_pid(task_token);

    let mut sport = None;
    let mut dport = None;
    let mut saddr = None;
    let mut daddr = None;
    let mut state = None;
    for token in rest.split_whitespace() {
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        match key {
            "sport" => sport = value.parse::<u16>().ok(),
            "dport" => dport = value.parse::<u16>().ok(),
            "saddr" => saddr = Some(value),
            "daddr" => daddr = Some(value),
            // The kernel spells the state both ways across versions.
            "state" => state = Some(value.strip_prefix("TCP_").unwrap_or(value)),
            _ => {}
        }
    }

    Some(RetransmitRecord {
        task: task.to_string(),
        pid,
        laddr: saddr?.to_string(),
        lport: sport?,
        raddr: daddr?.to_string(),
        rport: dport?,
        state: state?.to_string(),
        observed_at,
    })
}

/// Split a `comm-pid` token on the last hyphen.
///
/// Task names may themselves contain hyphens; the PID is always the
/// final component. A token without a numeric PID, or with PID 0, came
/// from a context with no usable task (idle, interrupt, softirq) and
/// maps to an absent PID.
fn split_task_pid(token: &str) -> (&str, Option<Pid>) {
    if let Some((task, pid_str)) = token.rsplit_once('-') {
        match pid_str.parse::<u32>() {
            Ok(0) => return (task, None),
            Ok(pid) => return (task, Some(Pid(pid))),
            Err(_) => {}
        }
    }
    (token, None)
}
