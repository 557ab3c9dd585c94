//! CLI argument definitions

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "retrans",
    about = "Trace kernel TCP retransmissions as they happen",
    after_help = "\
EXAMPLES:
    sudo retrans                    Watch retransmissions until interrupted
    sudo retrans --duration 60      Watch for one minute, then tear down
    sudo retrans --interval 5       Drain the trace buffer every 5 seconds"
)]
pub struct Args {
    /// Also trace tail loss probes (accepted for compatibility; not supported)
    #[arg(short = 'l', long)]
    pub loss_probes: bool,

    /// Print kernel stack traces per event (accepted for compatibility; not supported)
    #[arg(short = 's', long)]
    pub stacks: bool,

    /// Seconds between trace buffer drains
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Stop after N seconds (0 = unlimited)
    #[arg(long, default_value = "0")]
    pub duration: u64,
}
