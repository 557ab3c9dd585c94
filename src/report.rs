//! Fixed-width table output

use std::io::{self, Write};

use crate::event::RetransmitRecord;

/// Renders accepted records as one aligned row each.
///
/// Generic over the writer so rows are assertable in tests; in the
/// binary it wraps stdout.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Emit the column header. Called once, before the first batch.
    ///
    /// # Errors
    /// Propagates writer failures (e.g. a closed pipe).
    pub fn header(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "{:<8} {:<6} {:<20} {:<2} {:<20} {}",
            "TIME", "PID", "LADDR:LPORT", "--", "RADDR:RPORT", "STATE"
        )
    }

    /// Emit one record row. The `R>` marker reads local → remote.
    ///
    /// # Errors
    /// Propagates writer failures (e.g. a closed pipe).
    pub fn emit(&mut self, record: &RetransmitRecord) -> io::Result<()> {
        let pid = record.pid.map_or_else(String::new, |p| p.to_string());
        let local = format!("{}:{}", record.laddr, record.lport);
        let remote = format!("{}:{}", record.raddr, record.rport);
        writeln!(
            self.out,
            "{:<8} {:<6} {:<20} {:<2} {:<20} {}",
            record.observed_at.format("%H:%M:%S"),
            pid,
            local,
            "R>",
            remote,
            record.state
        )
    }

    /// Flush the writer after a batch.
    ///
    /// # Errors
    /// Propagates writer failures.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Pid;
    use chrono::Local;

    fn sample(pid: Option<Pid>) -> RetransmitRecord {
        RetransmitRecord {
            task: "curl".to_string(),
            pid,
            laddr: "10.0.0.1".to_string(),
            lport: 80,
            raddr: "10.0.0.2".to_string(),
            rport: 54321,
            state: "ESTABLISHED".to_string(),
            observed_at: Local::now(),
        }
    }

    fn render(record: &RetransmitRecord) -> String {
        let mut out = Vec::new();
        Reporter::new(&mut out).emit(record).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_header_columns() {
        let mut out = Vec::new();
        Reporter::new(&mut out).header().unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "TIME     PID    LADDR:LPORT          -- RADDR:RPORT          STATE\n"
        );
    }

    #[test]
    fn test_row_layout() {
        let record = sample(Some(Pid(1543)));
        let line = render(&record);

        let time = record.observed_at.format("%H:%M:%S").to_string();
        assert_eq!(
            line,
            format!("{time} 1543   10.0.0.1:80          R> 10.0.0.2:54321       ESTABLISHED\n")
        );
    }

    #[test]
    fn test_absent_pid_renders_blank() {
        let line = render(&sample(None));
        let time_width = "HH:MM:SS".len();
        // Six spaces of PID column, then the local endpoint.
        assert_eq!(&line[time_width..time_width + 8], "        ");
        assert!(line.contains(" R> "));
    }
}
